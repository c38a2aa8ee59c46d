//! Closed error classification shared by every stage of the request pipeline.
//!
//! Each [`ErrorCode`] carries a stable machine name, a fixed user-facing message and a
//! one-line hint for command-line callers. The user-facing text never depends on the
//! underlying failure, only on the classification.
//!
//! | Code                 | Typical origin                                    |
//! |----------------------|---------------------------------------------------|
//! | `NETWORK`            | connection failures, unclassified transport errors |
//! | `API`                | non-2xx status, in-band `Message` error envelopes |
//! | `VALIDATION`         | input/output schema failures, template mismatches |
//! | `TIMEOUT`            | transport or script-injection timeouts            |
//! | `CROSS_ORIGIN`       | script-injection load failures                    |
//! | `MALFORMED_RESPONSE` | bodies that are not valid JSON                    |
//! | `RATE_LIMIT`         | HTTP 429 / throttling responses                   |
//!
//! ## Example
//!
//! ```rust
//! use wsdot_client::error_code::ErrorCode;
//!
//! let code = ErrorCode::from_http_status(429);
//! assert_eq!(code.code(), "RATE_LIMIT");
//! assert_eq!(code.user_message(), "Too many requests. Please wait before trying again.");
//! ```

use std::fmt;

/// Classification of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The request never produced a usable HTTP exchange
    Network,
    /// The upstream API reported an error (status code or error envelope)
    Api,
    /// Parameters or response data failed schema validation
    Validation,
    /// The transport gave up waiting for a response
    Timeout,
    /// The cross-origin (script-injection) load failed
    CrossOrigin,
    /// The response body could not be parsed
    MalformedResponse,
    /// The upstream API throttled the request
    RateLimit,
}

impl ErrorCode {
    /// Every classification, in declaration order.
    pub const ALL: [ErrorCode; 7] = [
        Self::Network,
        Self::Api,
        Self::Validation,
        Self::Timeout,
        Self::CrossOrigin,
        Self::MalformedResponse,
        Self::RateLimit,
    ];

    /// Returns the canonical code string (e.g., `"MALFORMED_RESPONSE"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network => "NETWORK",
            Self::Api => "API",
            Self::Validation => "VALIDATION",
            Self::Timeout => "TIMEOUT",
            Self::CrossOrigin => "CROSS_ORIGIN",
            Self::MalformedResponse => "MALFORMED_RESPONSE",
            Self::RateLimit => "RATE_LIMIT",
        }
    }

    /// Returns the lowercase name used in logs (e.g., `"malformed_response"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Api => "api",
            Self::Validation => "validation",
            Self::Timeout => "timeout",
            Self::CrossOrigin => "cross_origin",
            Self::MalformedResponse => "malformed_response",
            Self::RateLimit => "rate_limit",
        }
    }

    /// Message safe to show to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network => "Unable to connect to the server. Please check your internet connection.",
            Self::Api => "The server returned an error. Please try again later.",
            Self::Validation => "Received invalid data from the server.",
            Self::Timeout => "The request timed out. Please try again.",
            Self::CrossOrigin => "Unable to access the server due to browser security restrictions.",
            Self::MalformedResponse => "Received an unreadable response from the server.",
            Self::RateLimit => "Too many requests. Please wait before trying again.",
        }
    }

    /// One-line troubleshooting hint for command-line output.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Network => "Check your network connectivity and proxy settings (WSDOT_PROXY_URL).",
            Self::Api => "Verify your access code (WSDOT_ACCESS_CODE) and the endpoint parameters.",
            Self::Validation => "Check the parameter names and value formats; run `wsdot describe <endpoint>`.",
            Self::Timeout => "The service may be slow; raise WSDOT_HTTP_TIMEOUT_SECS and try again.",
            Self::CrossOrigin => "Force the direct transport with WSDOT_FORCE_TRANSPORT=direct.",
            Self::MalformedResponse => "The service may be degraded; retry later or inspect with --verbose.",
            Self::RateLimit => "Wait a minute before issuing more requests.",
        }
    }

    /// Parses a code string as produced by [`ErrorCode::code`].
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Maps an HTTP failure status to a classification.
    ///
    /// `429 Too Many Requests` becomes `RATE_LIMIT`; every other status becomes `API`.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimit,
            _ => Self::Api,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
