//! Validation gate for call parameters and response payloads using JSON Schema.

use serde_json::Value;

use super::request::Params;
use super::schema::Schema;
use crate::context::FetchContext;
use crate::error::ApiError;

/// Validates call parameters against the endpoint's input schema.
///
/// Endpoints without an input schema, and calls without parameters, pass through.
pub fn validate_input(
    schema: Option<&Schema>,
    params: &Params,
    ctx: &FetchContext,
) -> Result<(), ApiError> {
    let schema = match schema {
        Some(s) if !params.is_empty() => s,
        _ => return Ok(()),
    };
    check(schema, &params.to_json(), ctx, "Input")
}

/// Validates a parsed response body against the endpoint's output schema.
///
/// Without an output schema the value is returned untouched.
pub fn validate_output(
    schema: Option<&Schema>,
    data: Value,
    ctx: &FetchContext,
) -> Result<Value, ApiError> {
    match schema {
        Some(s) => check(s, &data, ctx, "Output").map(|()| data),
        None => Ok(data),
    }
}

fn check(schema: &Schema, instance: &Value, ctx: &FetchContext, side: &str) -> Result<(), ApiError> {
    let compiled = schema
        .compiled()
        .map_err(|e| ctx.error(crate::error_code::ErrorCode::Validation, e))?;

    if let Err(errors) = compiled.validate(instance) {
        let issues: Vec<String> = errors
            .map(|e| format!("{}: {}", field_path(&e.instance_path.to_string()), e))
            .collect();
        return Err(ApiError::validation(
            format!("{} validation failed: {}", side, issues.join("; ")),
            ctx.error_context(),
        ));
    }
    Ok(())
}

/// Converts a JSON pointer (`/items/0/name`) into a dotted field path (`items.0.name`).
fn field_path(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        "(root)".to_string()
    } else {
        trimmed.replace('/', ".")
    }
}
