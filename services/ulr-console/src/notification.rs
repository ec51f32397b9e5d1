//! Single-slot, auto-expiring submission feedback

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// How long a notification stays up unless dismissed or replaced
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Outcome message for the last submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug)]
struct Pending {
    id: u64,
    notification: Notification,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<Pending>,
    next_id: u64,
}

/// Holds at most one notification and expires it after [`NOTIFICATION_TTL`].
///
/// Every `show` cancels the previous expiry timer, so an old timer can never
/// clear a newer notification.
#[derive(Debug, Clone, Default)]
pub struct NotificationController {
    slot: Arc<Mutex<Slot>>,
}

impl NotificationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is showing and restart the expiry timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) {
        let notification = Notification {
            message: message.into(),
            kind,
        };
        let cancel = CancellationToken::new();

        let id = {
            let mut slot = lock(&self.slot);
            if let Some(previous) = slot.pending.take() {
                previous.cancel.cancel();
            }
            slot.next_id += 1;
            let id = slot.next_id;
            tracing::debug!("Showing {:?} notification: {}", kind, notification.message);
            slot.pending = Some(Pending {
                id,
                notification,
                cancel: cancel.clone(),
            });
            id
        };

        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(NOTIFICATION_TTL) => {
                    let mut slot = lock(&slot);
                    if slot.pending.as_ref().is_some_and(|p| p.id == id) {
                        slot.pending = None;
                        tracing::debug!("Notification {} expired", id);
                    }
                }
                _ = cancel.cancelled() => {}
            }
        });
    }

    /// Clear the notification now and cancel its timer
    pub fn dismiss(&self) {
        if let Some(pending) = lock(&self.slot).pending.take() {
            pending.cancel.cancel();
            tracing::debug!("Notification {} dismissed", pending.id);
        }
    }

    pub fn current(&self) -> Option<Notification> {
        lock(&self.slot)
            .pending
            .as_ref()
            .map(|p| p.notification.clone())
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
