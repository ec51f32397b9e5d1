//! Console: wires operator actions to the form, status monitor and notifications

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::form::{Field, FormController, ValidationErrors};
use crate::gateway::{Gateway, Source};
use crate::notification::{NotificationController, NotificationKind};
use crate::status::StatusMonitor;
use crate::view::{FormView, StatusCard, ViewState};

pub const SUCCESS_MESSAGE: &str = "ULR sent successfully";

/// What happened to a submit action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitReport {
    /// The simulator accepted the request
    Sent,
    /// The request reached the network but failed
    Failed { message: String },
    /// Local validation rejected the form; nothing was sent
    Invalid { errors: ValidationErrors },
    /// Another submission is still in flight
    Busy,
}

impl SubmitReport {
    /// Only submissions that reached the network trigger a status refresh
    pub fn reached_network(&self) -> bool {
        matches!(self, SubmitReport::Sent | SubmitReport::Failed { .. })
    }
}

/// Clears the in-flight flag when the submission ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        (!flag.swap(true, Ordering::SeqCst)).then_some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The operator console
pub struct Console {
    gateway: Arc<dyn Gateway>,
    form: RwLock<FormController>,
    monitor: StatusMonitor,
    notifications: NotificationController,
    submitting: AtomicBool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("monitor", &self.monitor)
            .field("notifications", &self.notifications)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Console tracking both the Diameter client and server
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            monitor: StatusMonitor::new(Arc::clone(&gateway), &Source::ALL),
            gateway,
            form: RwLock::new(FormController::new()),
            notifications: NotificationController::new(),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn notifications(&self) -> &NotificationController {
        &self.notifications
    }

    /// Initial status fetch for every source
    pub async fn start(&self) {
        tracing::info!("Console starting, fetching initial status");
        self.monitor.refresh_all().await;
    }

    /// Manual refresh. Returns false without fetching while any source is
    /// still loading.
    pub async fn refresh(&self) -> bool {
        let started = self.monitor.try_refresh_all().await;
        if !started {
            tracing::debug!("Refresh ignored: a status fetch is already in flight");
        }
        started
    }

    pub async fn edit(&self, field: Field, value: &str) {
        self.form.write().await.edit(field, value);
    }

    pub fn dismiss_notification(&self) {
        self.notifications.dismiss();
    }

    /// Validate and send the form, then report the outcome through a
    /// notification and refresh status if the request reached the network.
    pub async fn submit(&self) -> SubmitReport {
        let report = {
            let Some(_in_flight) = InFlight::acquire(&self.submitting) else {
                tracing::debug!("Submit ignored: a submission is already in flight");
                return SubmitReport::Busy;
            };
            self.send().await
        };

        if report.reached_network() {
            self.monitor.refresh_all().await;
        }
        report
    }

    async fn send(&self) -> SubmitReport {
        // The form lock is released before the network call so edits and
        // view snapshots are not blocked by an outstanding submission.
        let prepared = self.form.write().await.prepare();
        let payload = match prepared {
            Ok(payload) => payload,
            Err(errors) => return SubmitReport::Invalid { errors },
        };

        tracing::info!(
            "Sending ULR for IMSI {} (PLMN {})",
            payload.imsi,
            payload.plmn_id
        );
        match self.gateway.submit(&payload).await {
            Ok(response) => {
                tracing::debug!("sendULR response: {}", response);
                self.notifications
                    .show(SUCCESS_MESSAGE, NotificationKind::Success);
                SubmitReport::Sent
            }
            Err(e) => {
                tracing::warn!("Failed to send ULR: {}", e);
                let message = e.to_string();
                self.notifications
                    .show(message.clone(), NotificationKind::Error);
                SubmitReport::Failed { message }
            }
        }
    }

    /// Snapshot everything the page renders
    pub async fn view(&self) -> ViewState {
        let statuses = self.monitor.snapshot().await;
        let form = self.form.read().await;

        ViewState {
            cards: statuses
                .iter()
                .map(|(source, state)| StatusCard::new(*source, state))
                .collect(),
            form: FormView {
                values: form.values().clone(),
                errors: form.errors().clone(),
                submitting: self.submitting.load(Ordering::SeqCst),
            },
            refresh_enabled: statuses.values().all(|s| !s.loading),
            notification: self.notifications.current(),
        }
    }
}
