//! Turns the response bodies of external systems into [`ExternalOrderRecord`]s.
//!
//! Pull sources answer in one of two shapes: a bare array of orders, or an object wrapping the array under one of
//! [`WRAPPER_KEYS`]. The shapes are tried in order and the first match wins.
//!
//! Records are decoded one at a time, so a single bad record is rejected on its own without affecting the rest of the
//! batch.
use log::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::oie_api::sync_objects::{ExternalOrderRecord, RecordRejected};

/// Keys that may wrap the order array, in priority order.
pub const WRAPPER_KEYS: [&str; 3] = ["orders", "data", "items"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("The body is not valid JSON. {0}")]
    InvalidJson(String),
    #[error("The body does not contain any usable orders. {0}")]
    MalformedPayload(String),
}

/// The records decoded from one body, plus those that were rejected.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// The number of items in the source array, good or bad.
    pub received: usize,
    pub records: Vec<ExternalOrderRecord>,
    pub rejected: Vec<RecordRejected>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResponseShape {
    Bare(Vec<Value>),
    Wrapped(Map<String, Value>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InboundShape {
    Batch(Vec<Value>),
    Single(Map<String, Value>),
}

/// Normalizes the body of a pull response.
///
/// Fails with [`NormalizationError::MalformedPayload`] when the body matches neither shape, the array is empty, or
/// not a single item in it is a well-formed order.
pub fn normalize(body: &[u8]) -> Result<NormalizedBatch, NormalizationError> {
    let shape = serde_json::from_slice::<ResponseShape>(body)
        .map_err(|_| NormalizationError::MalformedPayload("Expected an array or an object".to_string()))?;
    let items = match shape {
        ResponseShape::Bare(items) => items,
        ResponseShape::Wrapped(mut map) => unwrap_orders(&mut map).ok_or_else(|| {
            NormalizationError::MalformedPayload(format!("None of {WRAPPER_KEYS:?} holds a non-empty array"))
        })?,
    };
    if items.is_empty() {
        return Err(NormalizationError::MalformedPayload("The order array is empty".to_string()));
    }
    let batch = decode_items(items, |_, _| {});
    if batch.records.is_empty() {
        return Err(NormalizationError::MalformedPayload(format!(
            "None of the {} items is a well-formed order",
            batch.received
        )));
    }
    trace!("🔄️ Normalized {} of {} items", batch.records.len(), batch.received);
    Ok(batch)
}

/// Normalizes the body of an inbound webhook: an array of orders, or a single order object.
///
/// An empty array is a valid, empty batch. A single object with no `external_id` is a batch of one rejected record.
pub fn normalize_inbound(body: &[u8]) -> Result<NormalizedBatch, NormalizationError> {
    let items = match serde_json::from_slice::<InboundShape>(body) {
        Ok(InboundShape::Batch(items)) => items,
        Ok(InboundShape::Single(order)) => vec![Value::Object(order)],
        Err(e) => return Err(NormalizationError::InvalidJson(e.to_string())),
    };
    Ok(decode_items(items, |_, _| {}))
}

/// Normalizes a bulk import: an array of orders. Records without an `external_id` get one generated from `batch_tag`
/// and their position in the array.
pub fn normalize_import(body: &[u8], batch_tag: &str) -> Result<NormalizedBatch, NormalizationError> {
    let items = serde_json::from_slice::<Vec<Value>>(body)
        .map_err(|e| NormalizationError::InvalidJson(format!("Expected an array of orders. {e}")))?;
    Ok(decode_items(items, |index, record| {
        if !record.has_external_id() {
            record.external_id = format!("import-{batch_tag}-{index}");
        }
    }))
}

fn unwrap_orders(map: &mut Map<String, Value>) -> Option<Vec<Value>> {
    WRAPPER_KEYS.iter().find_map(|key| match map.remove(*key) {
        Some(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => None,
    })
}

fn decode_items<F>(items: Vec<Value>, mut assign_id: F) -> NormalizedBatch
where F: FnMut(usize, &mut ExternalOrderRecord) {
    let mut batch = NormalizedBatch { received: items.len(), ..Default::default() };
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            batch.rejected.push(RecordRejected::Invalid { index, reason: "Not an object".to_string() });
            continue;
        }
        match serde_json::from_value::<ExternalOrderRecord>(item) {
            Ok(mut record) => {
                assign_id(index, &mut record);
                if record.has_external_id() {
                    batch.records.push(record);
                } else {
                    batch.rejected.push(RecordRejected::Invalid { index, reason: "Missing external_id".to_string() });
                }
            },
            Err(e) => batch.rejected.push(RecordRejected::Invalid { index, reason: e.to_string() }),
        }
    }
    batch
}
