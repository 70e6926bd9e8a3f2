use oig_common::bounded_note;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    db_types::NewOrder,
    traits::{OrderCreationError, StorageError},
};

/// The most error descriptions a single run keeps. Errors beyond this are still counted.
pub const MAX_ERROR_DETAILS: usize = 50;
/// Error descriptions are truncated to this many characters.
pub const MAX_ERROR_NOTE_LENGTH: usize = 256;

//--------------------------------------     SyncRunResult     ---------------------------------------------------------
/// The summary of one sync run, inbound delivery or import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRunResult {
    pub total_received: usize,
    pub created: usize,
    /// Records that were already in the dedup ledger, and so were skipped. No fields are reconciled.
    pub updated: usize,
    pub errors: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_details: Vec<String>,
}

impl SyncRunResult {
    pub fn new(total_received: usize) -> Self {
        Self { total_received, ..Default::default() }
    }

    /// A run that aborted before any record was processed.
    pub fn failed<S: AsRef<str>>(reason: S) -> Self {
        let mut result = Self::default();
        result.record_error(reason);
        result
    }

    pub fn record_created(&mut self) {
        self.created += 1;
    }

    pub fn record_updated(&mut self) {
        self.updated += 1;
    }

    pub fn record_error<S: AsRef<str>>(&mut self, note: S) {
        self.errors += 1;
        if self.error_details.len() < MAX_ERROR_DETAILS {
            self.error_details.push(bounded_note(note.as_ref(), MAX_ERROR_NOTE_LENGTH));
        }
    }
}

//--------------------------------------    RecordRejected     ---------------------------------------------------------
/// A single record could not be ingested. The rest of the batch carries on.
#[derive(Debug, Clone, Error)]
pub enum RecordRejected {
    #[error("Item {index} is not a valid order. {reason}")]
    Invalid { index: usize, reason: String },
    #[error("Order {external_id} could not be created. {source}")]
    Creation { external_id: String, source: OrderCreationError },
    #[error("Order {external_id} could not be checked against the ledger. {source}")]
    Ledger { external_id: String, source: StorageError },
}

//--------------------------------------  ExternalOrderRecord  ---------------------------------------------------------
/// One order as supplied by an external system, after normalization.
///
/// Every field except `external_id` is optional at the source. Missing and `null` strings become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalOrderRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub external_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub client_name: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
}

impl ExternalOrderRecord {
    pub fn has_external_id(&self) -> bool {
        !self.external_id.trim().is_empty()
    }

    /// The creation request sent to the order domain for this record.
    pub fn to_new_order(&self) -> NewOrder {
        NewOrder {
            client_name: self.client_name.clone(),
            client_phone: non_blank(&self.client_phone),
            client_email: non_blank(&self.client_email),
            address: self.address.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            branch: non_blank(&self.branch),
        }
    }
}

fn non_blank(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()).map(String::from)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Some sources send numeric ids.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("external_id must be a string or a number, not {other}"))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_details_are_bounded() {
        let mut result = SyncRunResult::new(100);
        let long_note = "x".repeat(1000);
        for _ in 0..75 {
            result.record_error(&long_note);
        }
        assert_eq!(result.errors, 75);
        assert_eq!(result.error_details.len(), MAX_ERROR_DETAILS);
        assert!(result.error_details.iter().all(|n| n.chars().count() <= MAX_ERROR_NOTE_LENGTH));
    }

    #[test]
    fn failed_runs_have_one_error_and_no_records() {
        let result = SyncRunResult::failed("Fetch failed");
        assert_eq!(result.total_received, 0);
        assert_eq!(result.errors, 1);
        assert_eq!(result.error_details, vec!["Fetch failed".to_string()]);
    }

    #[test]
    fn empty_error_details_are_omitted() {
        let json = serde_json::to_value(SyncRunResult::new(2)).unwrap();
        assert_eq!(json, serde_json::json!({"total_received": 2, "created": 0, "updated": 0, "errors": 0}));
    }

    #[test]
    fn records_tolerate_missing_and_null_fields() {
        let record: ExternalOrderRecord =
            serde_json::from_str(r#"{"external_id": 1042, "client_name": null, "latitude": -33.4}"#).unwrap();
        assert_eq!(record.external_id, "1042");
        assert_eq!(record.client_name, "");
        assert_eq!(record.address, "");
        assert_eq!(record.latitude, Some(-33.4));
        assert!(record.has_external_id());
    }

    #[test]
    fn new_orders_drop_blank_contact_fields() {
        let record = ExternalOrderRecord {
            external_id: "A1".into(),
            client_name: "X".into(),
            client_phone: Some("  ".into()),
            client_email: Some("x@example.com".into()),
            address: "1 Main St".into(),
            ..Default::default()
        };
        let order = record.to_new_order();
        assert_eq!(order.client_phone, None);
        assert_eq!(order.client_email.as_deref(), Some("x@example.com"));
        assert_eq!(order.address, "1 Main St");
    }
}
