//! Error normalization: every failure leaving the pipeline becomes one [`ApiError`].
//!
//! Classification is computed from the failure's content only:
//! 1. already an [`ApiError`]: returned unchanged
//! 2. an error with a message: keyword scan (`timeout`, `cors`/`cross-origin`,
//!    `network`/`fetch`), then the attached HTTP status, then `NETWORK`
//! 3. any other value: `NETWORK` with a fallback message

use std::any::Any;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::FetchContext;
use crate::error::ApiError;
use crate::error_code::ErrorCode;
use crate::transport::TransportFailure;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message used when the failure carries nothing readable.
pub const FALLBACK_MESSAGE: &str = "An unknown error occurred";

static TIMEOUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)time[ -]?out|timed out").expect("timeout pattern is valid"));
static CROSS_ORIGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcors\b|cross-origin").expect("cross-origin pattern is valid"));
static NETWORK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)network|fetch").expect("network pattern is valid"));

/// Anything a pipeline stage can fail with, before normalization.
pub enum Failure {
    /// Already classified
    Typed(ApiError),
    /// A standard error, with the HTTP status when one was observed
    Error { source: BoxError, status: Option<u16> },
    /// A value that is not an error at all
    Opaque(Box<dyn Any + Send>),
}

impl Failure {
    pub fn error(source: impl Into<BoxError>) -> Self {
        Self::Error {
            source: source.into(),
            status: None,
        }
    }

    pub fn with_status(source: impl Into<BoxError>, status: u16) -> Self {
        Self::Error {
            source: source.into(),
            status: Some(status),
        }
    }

    pub fn opaque<T: Any + Send>(value: T) -> Self {
        Self::Opaque(Box::new(value))
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(e) => f.debug_tuple("Typed").field(e).finish(),
            Self::Error { source, status } => f
                .debug_struct("Error")
                .field("source", &source.to_string())
                .field("status", status)
                .finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<ApiError> for Failure {
    fn from(e: ApiError) -> Self {
        Self::Typed(e)
    }
}

impl From<TransportFailure> for Failure {
    fn from(e: TransportFailure) -> Self {
        let status = e.status();
        Self::Error {
            source: Box::new(e),
            status,
        }
    }
}

/// Keyword classification of an error message, falling back to the HTTP status.
pub fn classify(message: &str, status: Option<u16>) -> ErrorCode {
    if TIMEOUT.is_match(message) {
        ErrorCode::Timeout
    } else if CROSS_ORIGIN.is_match(message) {
        ErrorCode::CrossOrigin
    } else if NETWORK.is_match(message) {
        ErrorCode::Network
    } else {
        match status {
            Some(s) if s >= 400 => ErrorCode::from_http_status(s),
            _ => ErrorCode::Network,
        }
    }
}

/// Converts any failure into the pipeline's single error type.
pub fn normalize(failure: Failure, ctx: &FetchContext) -> ApiError {
    match failure {
        Failure::Typed(e) => e,
        Failure::Error { source, status } => {
            let message = source.to_string();
            let code = classify(&message, status);
            let mut context = ctx.error_context();
            if let Some(s) = status {
                context = context.with_status(s);
            }
            ApiError::new(code, message, context)
        }
        Failure::Opaque(value) => {
            let detail = (*value)
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| (*value).downcast_ref::<&'static str>().copied());
            if let Some(detail) = detail {
                tracing::debug!(endpoint = ctx.endpoint(), detail, "normalizing non-error failure");
            }
            ApiError::new(ErrorCode::Network, FALLBACK_MESSAGE, ctx.error_context())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LogMode;
    use std::io;
    use std::time::Duration;

    fn ctx() -> FetchContext {
        FetchContext::new("schedule.routes", LogMode::Silent)
    }

    fn io_err(msg: &str) -> BoxError {
        Box::new(io::Error::new(io::ErrorKind::Other, msg.to_string()))
    }

    #[test]
    fn keywords_take_priority_over_status() {
        let cases = [
            ("Request timeout after 30000ms", Some(500), ErrorCode::Timeout),
            ("operation timed out", None, ErrorCode::Timeout),
            ("Blocked by CORS policy", Some(403), ErrorCode::CrossOrigin),
            ("Cross-origin request failed", None, ErrorCode::CrossOrigin),
            ("Failed to fetch", Some(404), ErrorCode::Network),
            ("Network request failed", None, ErrorCode::Network),
        ];
        for (msg, status, expected) in cases {
            let failure = Failure::Error {
                source: io_err(msg),
                status,
            };
            assert_eq!(normalize(failure, &ctx()).code(), expected, "{msg}");
        }
    }

    #[test]
    fn status_then_default() {
        assert_eq!(classify("HTTP error! status: 404", Some(404)), ErrorCode::Api);
        assert_eq!(classify("HTTP error! status: 500", Some(500)), ErrorCode::Api);
        assert_eq!(classify("HTTP error! status: 429", Some(429)), ErrorCode::RateLimit);
        assert_eq!(classify("something odd", Some(302)), ErrorCode::Network);
        assert_eq!(classify("something odd", None), ErrorCode::Network);
    }

    #[test]
    fn records_is_not_cors() {
        assert_eq!(classify("no records matched", Some(404)), ErrorCode::Api);
    }

    #[test]
    fn transport_failures_keep_status() {
        let err = normalize(TransportFailure::Status { status: 503 }.into(), &ctx());
        assert_eq!(err.code(), ErrorCode::Api);
        assert_eq!(err.status(), Some(503));

        let err = normalize(
            TransportFailure::Timeout {
                after: Duration::from_secs(30),
            }
            .into(),
            &ctx(),
        );
        assert_eq!(err.code(), ErrorCode::Timeout);

        let err = normalize(TransportFailure::Unavailable("no host".into()).into(), &ctx());
        assert_eq!(err.code(), ErrorCode::CrossOrigin);
    }

    #[test]
    fn opaque_values_get_fallback() {
        let err = normalize(Failure::opaque("raw string thrown"), &ctx());
        assert_eq!(err.code(), ErrorCode::Network);
        assert_eq!(err.message(), FALLBACK_MESSAGE);

        let err = normalize(Failure::opaque(42_u8), &ctx());
        assert_eq!(err.message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs: Vec<Failure> = vec![
            Failure::error(io_err("Failed to fetch")),
            TransportFailure::Status { status: 429 }.into(),
            Failure::opaque(()),
            Failure::Typed(ApiError::validation("bad", ctx().error_context())),
        ];
        for input in inputs {
            let once = normalize(input, &ctx());
            let twice = normalize(Failure::Typed(once.clone()), &ctx());
            assert_eq!(twice, once);
        }
    }
}
