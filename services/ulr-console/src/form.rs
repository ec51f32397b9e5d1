//! Update Location Request form state and validation

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gateway::Gateway;

/// Body of a `sendULR` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub imsi: String,
    pub plmn_id: String,
    pub rat_type: i64,
    pub ulr_flags: i64,
}

/// Baseline values so the form is submittable without any input
impl Default for RequestPayload {
    fn default() -> Self {
        Self {
            imsi: "310150123456789".to_string(),
            plmn_id: "310150".to_string(),
            rat_type: 1004,
            ulr_flags: 16777216,
        }
    }
}

/// An editable form field, named as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "imsi")]
    Imsi,
    #[serde(rename = "plmnId")]
    PlmnId,
    #[serde(rename = "ratType")]
    RatType,
    #[serde(rename = "ulrFlags")]
    UlrFlags,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Imsi, Field::PlmnId, Field::RatType, Field::UlrFlags];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Imsi => "imsi",
            Field::PlmnId => "plmnId",
            Field::RatType => "ratType",
            Field::UlrFlags => "ulrFlags",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Field::Imsi => "IMSI (International Mobile Subscriber Identity)",
            Field::PlmnId => "PLMN ID (Hexadecimal)",
            Field::RatType => "RAT Type",
            Field::UlrFlags => "ULR Flags",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = crate::ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| crate::ConsoleError::InvalidField(s.to_string()))
    }
}

/// Field-scoped validation failures; empty means the payload is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

/// Run every rule against the payload. Rules never short-circuit each other.
pub fn validate(payload: &RequestPayload) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if payload.imsi.trim().is_empty() {
        errors.insert(Field::Imsi, "IMSI is required");
    }

    if payload.plmn_id.trim().is_empty() {
        errors.insert(Field::PlmnId, "PLMN ID is required");
    } else if !payload.plmn_id.chars().all(|c| c.is_ascii_hexdigit()) {
        errors.insert(Field::PlmnId, "PLMN ID must be a valid hexadecimal string");
    }

    if !is_wire_integer(payload.rat_type) {
        errors.insert(Field::RatType, "RAT Type must be a valid integer");
    }

    if !is_wire_integer(payload.ulr_flags) {
        errors.insert(Field::UlrFlags, "ULR Flags must be a valid integer");
    }

    errors
}

/// The simulator reads integer fields as 32-bit signed ints
fn is_wire_integer(value: i64) -> bool {
    (0..=i64::from(i32::MAX)).contains(&value)
}

/// Parse the leading integer of `input` the way a browser number box does:
/// leading whitespace and an optional sign, then digits up to the first
/// non-digit. Anything without digits yields 0.
pub fn parse_int_lenient(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return 0;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Outcome of asking the form to submit
#[derive(Debug)]
pub enum Submission {
    /// Validation failed locally; nothing was sent
    Rejected(ValidationErrors),
    /// The request reached the gateway
    Completed(crate::Result<serde_json::Value>),
}

/// Owns the editable field values and the latest validation result
#[derive(Debug, Clone, Default)]
pub struct FormController {
    values: RequestPayload,
    errors: ValidationErrors,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &RequestPayload {
        &self.values
    }

    /// Errors from the most recent validation pass
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Update a single field. Integer fields coerce unparseable input to 0;
    /// nothing is validated until submit.
    pub fn edit(&mut self, field: Field, value: &str) {
        match field {
            Field::Imsi => self.values.imsi = value.to_string(),
            Field::PlmnId => self.values.plmn_id = value.to_string(),
            Field::RatType => self.values.rat_type = parse_int_lenient(value),
            Field::UlrFlags => self.values.ulr_flags = parse_int_lenient(value),
        }
        tracing::debug!("Form field {} edited", field);
    }

    /// Recompute the error set from scratch
    pub fn validate(&mut self) -> &ValidationErrors {
        self.errors = validate(&self.values);
        &self.errors
    }

    /// Validate and hand out a snapshot of the payload ready to send
    pub fn prepare(&mut self) -> std::result::Result<RequestPayload, ValidationErrors> {
        if self.validate().is_empty() {
            Ok(self.values.clone())
        } else {
            tracing::debug!("Form rejected: {} invalid field(s)", self.errors.len());
            Err(self.errors.clone())
        }
    }

    /// Validate, then send the payload through `gateway` if it is valid.
    ///
    /// This borrows the form for the whole network call. A form shared
    /// behind a lock should instead call [`prepare`](Self::prepare), release
    /// the lock, and send the returned payload itself, as `Console` does.
    pub async fn submit(&mut self, gateway: &dyn Gateway) -> Submission {
        match self.prepare() {
            Ok(payload) => Submission::Completed(gateway.submit(&payload).await),
            Err(errors) => Submission::Rejected(errors),
        }
    }
}
