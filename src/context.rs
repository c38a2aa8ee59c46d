//! Per-call fetch context.

use std::fmt;

use crate::error::{ApiError, ErrorContext};
use crate::error_code::ErrorCode;

/// Logging verbosity for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogMode {
    /// No pipeline logging
    Silent,
    /// Start/finish and failures
    #[default]
    Info,
    /// Every stage transition, URLs and raw body sizes
    Debug,
}

impl LogMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "silent" | "none" | "off" => Some(Self::Silent),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    #[inline]
    pub fn info(&self) -> bool {
        *self >= Self::Info
    }

    #[inline]
    pub fn debug(&self) -> bool {
        *self >= Self::Debug
    }
}

/// Stage of a single call. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStage {
    Idle,
    ValidatingInput,
    BuildingUrl,
    AwaitingTransport,
    InterpretingResponse,
    ValidatingOutput,
    Done,
    Failed,
}

impl CallStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for CallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ValidatingInput => "validating_input",
            Self::BuildingUrl => "building_url",
            Self::AwaitingTransport => "awaiting_transport",
            Self::InterpretingResponse => "interpreting_response",
            Self::ValidatingOutput => "validating_output",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Short-lived state threaded through every stage of one call, used for error attribution.
#[derive(Debug, Clone)]
pub struct FetchContext {
    endpoint: String,
    url: Option<String>,
    log_mode: LogMode,
    stage: CallStage,
}

impl FetchContext {
    pub fn new(endpoint: impl Into<String>, log_mode: LogMode) -> Self {
        Self {
            endpoint: endpoint.into(),
            url: None,
            log_mode,
            stage: CallStage::Idle,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Interpolated URL, once the URL has been built. Never includes the credential.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn log_mode(&self) -> LogMode {
        self.log_mode
    }

    pub fn stage(&self) -> CallStage {
        self.stage
    }

    pub(crate) fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    /// Moves to `next`. Terminal stages are sticky.
    pub(crate) fn advance(&mut self, next: CallStage) {
        if self.stage.is_terminal() {
            return;
        }
        if self.log_mode.debug() {
            tracing::debug!(endpoint = %self.endpoint, from = %self.stage, to = %next, "stage transition");
        }
        self.stage = next;
    }

    /// Snapshot for an [`ApiError`].
    pub fn error_context(&self) -> ErrorContext {
        let ctx = ErrorContext::new(self.endpoint.clone());
        match &self.url {
            Some(url) => ctx.with_url(url.clone()),
            None => ctx,
        }
    }

    pub fn error(&self, code: ErrorCode, message: impl Into<String>) -> ApiError {
        ApiError::new(code, message, self.error_context())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_stage_is_sticky() {
        let mut ctx = FetchContext::new("x", LogMode::Silent);
        ctx.advance(CallStage::ValidatingInput);
        ctx.advance(CallStage::Failed);
        ctx.advance(CallStage::Done);
        assert_eq!(ctx.stage(), CallStage::Failed);
    }

    #[test]
    fn error_context_carries_url_once_known() {
        let mut ctx = FetchContext::new("vessels.vesselBasics", LogMode::Silent);
        assert_eq!(ctx.error_context().url, None);
        ctx.set_url("https://h/vesselbasics");
        let err = ctx.error(ErrorCode::Api, "boom");
        assert_eq!(err.context().url.as_deref(), Some("https://h/vesselbasics"));
        assert_eq!(err.context().endpoint, "vessels.vesselBasics");
    }

    #[test]
    fn log_mode_ordering() {
        assert!(LogMode::Debug.info());
        assert!(!LogMode::Silent.info());
        assert_eq!(LogMode::parse("DEBUG"), Some(LogMode::Debug));
        assert_eq!(LogMode::parse("loud"), None);
    }
}
