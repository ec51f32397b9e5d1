//! ULR Console - operator console for the Diameter ULR simulator
//!
//! Watches the simulator's Diameter client and server, and sends Update
//! Location Requests through the client.

pub mod config;
pub mod console;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod gateway;
pub mod io;
pub mod notification;
pub mod status;
pub mod view;

pub use config::{load_config, Config};
pub use console::Console;
pub use error::{ConsoleError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::gateway::HttpGateway;
use crate::io::ReqwestHttpClient;

/// Build a console talking to the configured simulator over HTTP
pub fn build_console(config: &Config) -> Console {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let gateway = HttpGateway::new(&config.gateway.base_url, http);
    Console::new(Arc::new(gateway))
}

/// Run the console with the given configuration.
///
/// With the dashboard disabled this fetches status once, logs the view and
/// returns. Otherwise it serves the dashboard until ctrl-c.
pub async fn run(config: Config) -> Result<()> {
    let console = Arc::new(build_console(&config));
    console.start().await;

    if !config.dashboard.enabled {
        tracing::info!("Console view:\n{}", console.view().await);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        ConsoleError::Dashboard(format!(
            "Failed to bind dashboard to port {}: {}",
            config.dashboard.port, e
        ))
    })?;
    tracing::info!("Dashboard listening on http://{}", addr);

    let router = dashboard::build_router(Arc::clone(&console));
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("Console stopped");
    Ok(())
}
