//! Response interpretation (raw text -> JSON Value).
//!
//! Upstream APIs sometimes answer HTTP 200 with an error envelope such as
//! `{"Message": "An error has occurred."}`. The envelope check runs here, before output
//! validation, so callers see the API's own message instead of a schema mismatch.

use serde_json::Value;

use crate::context::FetchContext;
use crate::error::ApiError;

/// Field name the upstream APIs use for in-band errors.
pub const ENVELOPE_MESSAGE_FIELD: &str = "Message";

/// Parses `body` and rejects embedded error envelopes.
pub fn interpret_response(body: &str, ctx: &FetchContext) -> Result<Value, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        ApiError::malformed(
            format!("Failed to parse response body as JSON: {}", e),
            ctx.error_context(),
        )
    })?;

    if let Some(message) = envelope_message(&value) {
        return Err(ApiError::api(message.to_string(), ctx.error_context()));
    }

    Ok(value)
}

/// Message of an error envelope, if `value` is one.
pub fn envelope_message(value: &Value) -> Option<&str> {
    value
        .as_object()
        .and_then(|o| o.get(ENVELOPE_MESSAGE_FIELD))
        .and_then(Value::as_str)
}
