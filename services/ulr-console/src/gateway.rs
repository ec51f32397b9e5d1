//! Remote gateway to the simulator's REST endpoints
//!
//! Normalizes the two status response shapes the simulator has shipped
//! over time into a single [`Status`], and submits Update Location Requests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::form::RequestPayload;
use crate::io::HttpClient;
use crate::ConsoleError;

const SEND_ULR_PATH: &str = "/diameter/client/sendULR";

/// A remote component whose liveness the console tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Client,
    Server,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Client, Source::Server];

    pub fn status_path(&self) -> &'static str {
        match self {
            Source::Client => "/diameter/client/status",
            Source::Server => "/diameter/server/status",
        }
    }

    /// Heading shown above the source's status card
    pub fn title(&self) -> &'static str {
        match self {
            Source::Client => "Client Status",
            Source::Server => "Server Status",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Client => write!(f, "client"),
            Source::Server => write!(f, "server"),
        }
    }
}

/// Last known liveness of one remote component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub is_running: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// The status body shapes the simulator is known to return.
///
/// Variants are tried in order, so a body carrying both `isRunning`/`message`
/// and `status` resolves to `Current`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Current {
        #[serde(rename = "isRunning")]
        is_running: bool,
        message: String,
        #[serde(default)]
        details: Option<String>,
    },
    Legacy {
        status: String,
    },
}

impl RawStatus {
    fn into_status(self) -> Option<Status> {
        match self {
            RawStatus::Current {
                is_running,
                message,
                details,
            } => Some(Status {
                is_running,
                message,
                details: details.filter(|d| !d.is_empty()),
            }),
            // Literal substring match: "not running" counts as running.
            RawStatus::Legacy { status } if !status.is_empty() => Some(Status {
                is_running: status.contains("running"),
                message: status,
                details: None,
            }),
            RawStatus::Legacy { .. } => None,
        }
    }
}

/// Normalize a raw status response body
pub fn parse_status(body: &str) -> crate::Result<Status> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        tracing::debug!("Status body is not JSON: {}", e);
        ConsoleError::Format
    })?;

    serde_json::from_value::<RawStatus>(value)
        .ok()
        .and_then(RawStatus::into_status)
        .ok_or(ConsoleError::Format)
}

/// Operations the console performs against the simulator
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Gateway: Send + Sync {
    /// Fetch and normalize the status of one source
    async fn fetch_status(&self, source: Source) -> crate::Result<Status>;

    /// Submit an Update Location Request, returning the response body untouched
    async fn submit(&self, payload: &RequestPayload) -> crate::Result<serde_json::Value>;
}

/// Gateway backed by the simulator's HTTP API
pub struct HttpGateway {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpGateway {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created HttpGateway at {}", base_url);
        Self { base_url, http }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_status(&self, source: Source) -> crate::Result<Status> {
        let url = format!("{}{}", self.base_url, source.status_path());
        let response = self.http.get(&url).await?;

        if !response.is_success() {
            tracing::debug!(
                "Non-success status response from {}: status={}",
                source,
                response.status
            );
            return Err(ConsoleError::Transport(response.status));
        }

        let status = parse_status(&response.body)?;
        tracing::debug!("{} status: {:?}", source, status);
        Ok(status)
    }

    async fn submit(&self, payload: &RequestPayload) -> crate::Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, SEND_ULR_PATH);
        let body = serde_json::to_value(payload)?;
        let response = self.http.post_json(&url, &body).await?;

        if !response.is_success() {
            tracing::debug!("sendULR rejected: status={}", response.status);
            return Err(ConsoleError::Transport(response.status));
        }

        if response.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&response.body)
            .unwrap_or(serde_json::Value::String(response.body)))
    }
}
