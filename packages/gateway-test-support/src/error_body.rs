//! Error-envelope assertions for gateway tests.
//!
//! The gateway's stable error contract is a JSON body with at least a
//! `message` field; these helpers validate that shape without depending on
//! gateway types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Local mirror of the gateway's error envelope.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorEnvelopeLike {
    pub message: String,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub details: Option<Vec<Value>>,
}

/// Parse a response body and assert it carries the error envelope shape.
pub fn assert_error_envelope(body: &[u8], message_contains: &str) -> ErrorEnvelopeLike {
    let parsed: ErrorEnvelopeLike = serde_json::from_slice(body)
        .unwrap_or_else(|e| panic!("error body is not a valid envelope: {e}"));
    assert!(
        parsed.message.contains(message_contains),
        "expected message containing {message_contains:?}, got {:?}",
        parsed.message
    );
    parsed
}

/// Assert that a response body is JSON (never an HTML error page).
pub fn assert_json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "body is not JSON ({e}): {}",
            String::from_utf8_lossy(body)
        )
    })
}
