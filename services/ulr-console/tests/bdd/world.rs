//! BDD test world for the ULR console

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cucumber::World;
use ulr_console::console::{Console, SubmitReport};
use ulr_console::form::{FormController, RequestPayload, Submission};
use ulr_console::gateway::{Gateway, Source, Status};
use ulr_console::io::{HttpClient, HttpResponse};
use ulr_console::ConsoleError;

#[derive(Debug, Default, World)]
pub struct ConsoleWorld {
    // Status normalization
    pub status_response: Option<HttpResponse>,
    pub status_result: Option<ulr_console::Result<Status>>,

    // Form testing
    pub form: Option<FormController>,
    pub submission: Option<Submission>,

    // Console testing
    pub simulator: Option<Arc<SimulatedGateway>>,
    pub console: Option<Arc<Console>>,
    pub report: Option<SubmitReport>,
}

impl ConsoleWorld {
    pub fn simulator(&mut self) -> Arc<SimulatedGateway> {
        Arc::clone(
            self.simulator
                .get_or_insert_with(|| Arc::new(SimulatedGateway::default())),
        )
    }

    pub fn console(&self) -> Arc<Console> {
        Arc::clone(self.console.as_ref().expect("console not set"))
    }
}

/// HTTP client answering every request with the same response
pub struct FixedHttpClient {
    pub response: HttpResponse,
}

#[async_trait::async_trait]
impl HttpClient for FixedHttpClient {
    async fn get(&self, _url: &str) -> ulr_console::Result<HttpResponse> {
        Ok(self.response.clone())
    }

    async fn post_json(
        &self,
        _url: &str,
        _body: &serde_json::Value,
    ) -> ulr_console::Result<HttpResponse> {
        Ok(self.response.clone())
    }
}

/// In-memory stand-in for the simulator with scriptable answers.
///
/// Status answers are either a status or an HTTP error code. Submissions
/// succeed unless a rejection code is set.
#[derive(Debug, Default)]
pub struct SimulatedGateway {
    statuses: Mutex<BTreeMap<Source, Result<Status, u16>>>,
    submit_rejection: Mutex<Option<u16>>,
    submits: AtomicUsize,
    fetches: Mutex<BTreeMap<Source, usize>>,
}

impl SimulatedGateway {
    pub fn set_status(&self, source: Source, status: Result<Status, u16>) {
        self.statuses.lock().unwrap().insert(source, status);
    }

    pub fn reject_submissions(&self, code: Option<u16>) {
        *self.submit_rejection.lock().unwrap() = code;
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self, source: Source) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(&source)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl Gateway for SimulatedGateway {
    async fn fetch_status(&self, source: Source) -> ulr_console::Result<Status> {
        *self.fetches.lock().unwrap().entry(source).or_default() += 1;
        match self.statuses.lock().unwrap().get(&source).cloned() {
            Some(Ok(status)) => Ok(status),
            Some(Err(code)) => Err(ConsoleError::Transport(code)),
            None => Err(ConsoleError::Network("connection refused".to_string())),
        }
    }

    async fn submit(&self, _payload: &RequestPayload) -> ulr_console::Result<serde_json::Value> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        match *self.submit_rejection.lock().unwrap() {
            Some(code) => Err(ConsoleError::Transport(code)),
            None => Ok(serde_json::json!({"result": "ok"})),
        }
    }
}
