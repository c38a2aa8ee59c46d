use crate::error_code::ErrorCode;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Diagnostic context attached to every [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Endpoint that was being called (e.g., "vessels.vesselBasics")
    pub endpoint: String,
    /// Interpolated request URL, without the access credential
    pub url: Option<String>,
    /// HTTP status, when the failure came from an HTTP exchange
    pub status: Option<u16>,
    /// When the failure was observed
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    /// Context for `endpoint`, stamped with the current time.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            url: None,
            status: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the request URL (never with the credential)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attach the HTTP status
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Override the observation time
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// The single error type surfaced by the request pipeline.
///
/// Constructed once where a failure is classified and never mutated afterwards; the
/// fields are private and only exposed through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}{}", format_context(.context))]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    context: ErrorContext,
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = vec![format!("endpoint: {}", ctx.endpoint)];
    if let Some(ref url) = ctx.url {
        parts.push(format!("url: {}", url));
    }
    if let Some(status) = ctx.status {
        parts.push(format!("status: {}", status));
    }
    format!(" ({})", parts.join(", "))
}

impl ApiError {
    /// Create an error with an explicit classification
    pub fn new(code: ErrorCode, message: impl Into<String>, context: ErrorContext) -> Self {
        Self {
            code,
            message: message.into(),
            context,
        }
    }

    /// Create a `VALIDATION` error
    pub fn validation(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorCode::Validation, message, context)
    }

    /// Create an `API` error
    pub fn api(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorCode::Api, message, context)
    }

    /// Create a `MALFORMED_RESPONSE` error
    pub fn malformed(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorCode::MalformedResponse, message, context)
    }

    /// Classification of this error
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Internal diagnostic message. Not meant for end users; see [`ApiError::user_message`].
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Fixed user-facing message for this error's classification.
    pub fn user_message(&self) -> &'static str {
        self.code.user_message()
    }

    /// Endpoint, URL, status and timestamp of the failed call
    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// HTTP status, if the failure came from an HTTP exchange
    pub fn status(&self) -> Option<u16> {
        self.context.status
    }
}
