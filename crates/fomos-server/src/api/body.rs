//! Request-body handling shared by the batch endpoints.
//!
//! Clients send either a JSON array of products or an object whose values are
//! products (as produced by serializing a JS array-like). Both are accepted.

use axum::{extract::rejection::JsonRejection, Json};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ApiError;

/// Parses a JSON body into a list of `T`, or a 400 [`ApiError`].
pub(super) fn parse_batch<T: DeserializeOwned>(
    request_id: &str,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Vec<T>, ApiError> {
    let Json(value) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::new(request_id, "bad_request", rejection.body_text())
    })?;

    let items = coerce_to_array(value).ok_or_else(|| {
        ApiError::new(
            request_id,
            "bad_request",
            "request body must be a JSON array or object of products",
        )
    })?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                ApiError::new(
                    request_id,
                    "validation_error",
                    format!("element {index} is not a valid product: {e}"),
                )
            })
        })
        .collect()
}

/// Arrays pass through. Objects become the list of their values, with
/// array-index keys first in ascending numeric order and the rest after in
/// insertion order. Any other JSON value is rejected.
pub(super) fn coerce_to_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => Some(object_values(map)),
        _ => None,
    }
}

fn object_values(map: Map<String, Value>) -> Vec<Value> {
    let mut indexed: Vec<(u32, Value)> = Vec::new();
    let mut named: Vec<Value> = Vec::new();

    for (key, value) in map {
        match array_index(&key) {
            Some(index) => indexed.push((index, value)),
            None => named.push(value),
        }
    }

    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, v)| v).chain(named).collect()
}

/// Canonical decimal integer keys only: `"0"`, `"12"`, never `"01"` or `"+1"`.
fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}
