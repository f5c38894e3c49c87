//! Decoding of query responses.
//!
//! A query can come back with rows, with nothing at all, or broken. Only the
//! last case is an error; "no rows" is a perfectly good answer.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::RawResponse;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Request failed: {status} {body}")]
    Http { status: StatusCode, body: String },

    #[error("Invalid JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// Turn a response into the rows it carries.
///
/// A JSON array yields its elements, `null` yields nothing and any other
/// JSON value is a single row.
pub fn decode_rows(response: &RawResponse) -> Result<Vec<Value>, DecodeError> {
    if response.status.as_u16() >= 400 {
        return Err(DecodeError::Http {
            status: response.status,
            body: response.body.clone(),
        });
    }

    if response.status == StatusCode::NO_CONTENT || response.body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(&response.body).map_err(DecodeError::InvalidJson)?;

    Ok(match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        row => vec![row],
    })
}
