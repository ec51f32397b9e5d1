//! Derived, render-ready snapshot of the console

use std::fmt;

use serde::Serialize;

use crate::form::{Field, RequestPayload, ValidationErrors};
use crate::gateway::{Source, Status};
use crate::notification::{Notification, NotificationKind};
use crate::status::FetchState;

/// One status card per source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCard {
    pub source: Source,
    pub title: String,
    pub loading: bool,
    pub error: Option<String>,
    pub status: Option<Status>,
}

impl StatusCard {
    pub fn new(source: Source, state: &FetchState<Status>) -> Self {
        Self {
            source,
            title: source.title().to_string(),
            loading: state.loading,
            error: state.error.clone(),
            status: state.value.clone(),
        }
    }

    /// The single line the card shows: loading beats error beats status
    pub fn headline(&self) -> String {
        if self.loading {
            "Loading status...".to_string()
        } else if let Some(error) = &self.error {
            error.clone()
        } else {
            self.status
                .as_ref()
                .map(|s| s.message.clone())
                .unwrap_or_else(|| "Status unknown".to_string())
        }
    }

    pub fn is_running(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.is_running)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub values: RequestPayload,
    pub errors: ValidationErrors,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub cards: Vec<StatusCard>,
    pub form: FormView,
    pub refresh_enabled: bool,
    pub notification: Option<Notification>,
}

impl ViewState {
    pub fn card(&self, source: Source) -> Option<&StatusCard> {
        self.cards.iter().find(|c| c.source == source)
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            let marker = if card.loading || card.error.is_some() {
                "?"
            } else if card.is_running() {
                "+"
            } else {
                "-"
            };
            writeln!(f, "[{}] {}: {}", marker, card.title, card.headline())?;
            if let Some(details) = card.status.as_ref().and_then(|s| s.details.as_ref()) {
                writeln!(f, "    {}", details)?;
            }
        }

        let values = &self.form.values;
        for (field, value) in Field::ALL.iter().zip([
            values.imsi.clone(),
            values.plmn_id.clone(),
            values.rat_type.to_string(),
            values.ulr_flags.to_string(),
        ]) {
            write!(f, "{}: {}", field.label(), value)?;
            if let Some(error) = self.form.errors.get(*field) {
                write!(f, "  ! {}", error)?;
            }
            writeln!(f)?;
        }

        if let Some(notification) = &self.notification {
            let tag = match notification.kind {
                NotificationKind::Success => "ok",
                NotificationKind::Error => "error",
            };
            writeln!(f, "({}) {}", tag, notification.message)?;
        }
        Ok(())
    }
}
