//! Per-source status fetching and loading/error tracking

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinSet;

use crate::gateway::{Gateway, Source, Status};
use crate::ConsoleError;

/// Loading/error/value triple for one asynchronously fetched value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub value: Option<T>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            value: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, value: T) {
        self.loading = false;
        self.error = None;
        self.value = Some(value);
    }

    /// Record a failure. The previous value, if any, is kept.
    pub fn fail(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }
}

pub type StatusMap = BTreeMap<Source, FetchState<Status>>;

/// Thread-safe handle to the per-source status map
pub type StateHandle = Arc<RwLock<StatusMap>>;

pub fn new_state_handle(sources: &[Source]) -> StateHandle {
    Arc::new(RwLock::new(
        sources
            .iter()
            .map(|source| (*source, FetchState::default()))
            .collect(),
    ))
}

/// Text shown in place of a status card when its fetch failed
pub fn describe_error(err: &ConsoleError) -> String {
    match err {
        ConsoleError::Transport(_) | ConsoleError::Network(_) | ConsoleError::Format => {
            err.to_string()
        }
        _ => "Unknown error occurred".to_string(),
    }
}

/// Fetches status for every registered source, each independently
#[derive(Clone)]
pub struct StatusMonitor {
    gateway: Arc<dyn Gateway>,
    states: StateHandle,
}

impl std::fmt::Debug for StatusMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusMonitor").finish_non_exhaustive()
    }
}

impl StatusMonitor {
    pub fn new(gateway: Arc<dyn Gateway>, sources: &[Source]) -> Self {
        Self {
            gateway,
            states: new_state_handle(sources),
        }
    }

    pub async fn sources(&self) -> Vec<Source> {
        self.states.read().await.keys().copied().collect()
    }

    /// Fetch one source and record the outcome in its state
    pub async fn refresh(&self, source: Source) {
        match self.states.write().await.get_mut(&source) {
            Some(state) => state.start(),
            None => {
                tracing::warn!("Refresh requested for unregistered source '{}'", source);
                return;
            }
        }
        self.complete(source).await;
    }

    /// Fetch a source already marked loading and record the outcome
    async fn complete(&self, source: Source) {
        let result = self.gateway.fetch_status(source).await;

        let mut states = self.states.write().await;
        let Some(state) = states.get_mut(&source) else {
            return;
        };
        match result {
            Ok(status) => {
                tracing::debug!(
                    "{} status refreshed: running={}",
                    source,
                    status.is_running
                );
                state.succeed(status);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {} status: {}", source, e);
                state.fail(describe_error(&e));
            }
        }
    }

    /// Mark every source loading under a single write guard. With
    /// `exclusive`, nothing is marked and `None` is returned if any source
    /// is already loading.
    async fn begin_all(&self, exclusive: bool) -> Option<Vec<Source>> {
        let mut states = self.states.write().await;
        if exclusive && states.values().any(|s| s.loading) {
            return None;
        }
        states.values_mut().for_each(FetchState::start);
        Some(states.keys().copied().collect())
    }

    async fn complete_all(&self, sources: Vec<Source>) {
        let mut tasks = JoinSet::new();
        for source in sources {
            let monitor = self.clone();
            tasks.spawn(async move { monitor.complete(source).await });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Status refresh task failed: {}", e);
            }
        }
    }

    /// Refresh every source concurrently and wait for all of them
    pub async fn refresh_all(&self) {
        if let Some(sources) = self.begin_all(false).await {
            self.complete_all(sources).await;
        }
    }

    /// Like [`refresh_all`](Self::refresh_all), but does nothing and returns
    /// false if any source is still loading. The check and the loading marks
    /// happen atomically, so concurrent callers never overlap.
    pub async fn try_refresh_all(&self) -> bool {
        match self.begin_all(true).await {
            Some(sources) => {
                self.complete_all(sources).await;
                true
            }
            None => false,
        }
    }

    /// True while any source has a fetch outstanding
    pub async fn is_loading(&self) -> bool {
        self.states.read().await.values().any(|s| s.loading)
    }

    pub async fn get(&self, source: Source) -> Option<FetchState<Status>> {
        self.states.read().await.get(&source).cloned()
    }

    pub async fn snapshot(&self) -> StatusMap {
        self.states.read().await.clone()
    }
}
