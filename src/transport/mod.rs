//! Transport selection and strategies.
//!
//! Two interchangeable strategies fetch a fully formed URL and hand back the raw body:
//!
//! - [`DirectTransport`]: plain HTTP GET via `reqwest` (servers, tests, CLIs).
//! - [`CrossOriginTransport`]: script injection with a uniquely named callback, for
//!   browser hosts where CORS blocks direct requests.
//!
//! [`TransportSelector`] is the only place that looks at the runtime environment.
//! The decision is a pure function of [`RuntimeSignals`]:
//! force override, then test-runtime signals, then browser detection, then server.

pub mod cross_origin;
pub mod http;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use cross_origin::{CallbackHandle, CallbackRegistry, CrossOriginTransport, ScriptHost, ScriptId};
pub use http::DirectTransport;

/// Env var forcing a strategy: `direct` or `cross-origin`.
pub const FORCE_TRANSPORT_ENV: &str = "WSDOT_FORCE_TRANSPORT";
/// Env var marking a test runtime.
pub const TEST_ENV: &str = "WSDOT_TEST_ENV";

/// Fetches a URL and returns the raw response body.
#[async_trait]
pub trait TransportStrategy: Send + Sync {
    fn kind(&self) -> TransportKind;

    async fn fetch(&self, url: &str) -> Result<String, TransportFailure>;
}

/// The two available strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Direct,
    CrossOrigin,
}

impl TransportKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "fetch" | "http" => Some(Self::Direct),
            "cross-origin" | "cross_origin" | "jsonp" => Some(Self::CrossOrigin),
            _ => None,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::CrossOrigin => f.write_str("cross-origin"),
        }
    }
}

/// Observations about the host runtime that drive strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuntimeSignals {
    pub forced: Option<TransportKind>,
    pub test_runtime: bool,
    pub has_window: bool,
    pub has_document: bool,
}

impl RuntimeSignals {
    /// Reads the process environment.
    ///
    /// Window and document are only assumed on `wasm32-unknown-unknown`, the browser target.
    pub fn detect() -> Self {
        let browser_target = cfg!(all(target_arch = "wasm32", target_os = "unknown"));
        Self {
            forced: std::env::var(FORCE_TRANSPORT_ENV)
                .ok()
                .and_then(|v| TransportKind::parse(&v)),
            test_runtime: std::env::var(TEST_ENV)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            has_window: browser_target,
            has_document: browser_target,
        }
    }

    pub fn server() -> Self {
        Self::default()
    }

    pub fn browser() -> Self {
        Self {
            has_window: true,
            has_document: true,
            ..Self::default()
        }
    }

    pub fn with_forced(mut self, kind: TransportKind) -> Self {
        self.forced = Some(kind);
        self
    }
}

/// Classified runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    Forced(TransportKind),
    Test,
    Browser,
    Server,
}

impl RuntimeEnvironment {
    pub fn transport_kind(&self) -> TransportKind {
        match self {
            Self::Forced(kind) => *kind,
            Self::Browser => TransportKind::CrossOrigin,
            Self::Test | Self::Server => TransportKind::Direct,
        }
    }
}

/// Classifies the runtime. The force override wins over every other signal.
pub fn classify_environment(signals: &RuntimeSignals) -> RuntimeEnvironment {
    if let Some(kind) = signals.forced {
        return RuntimeEnvironment::Forced(kind);
    }
    if signals.test_runtime {
        return RuntimeEnvironment::Test;
    }
    if signals.has_window && signals.has_document {
        return RuntimeEnvironment::Browser;
    }
    RuntimeEnvironment::Server
}

/// Raw transport failure, before normalization.
#[derive(Debug, thiserror::Error)]
pub enum TransportFailure {
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("Empty response body received from server")]
    EmptyBody,

    #[error("Request timeout after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("Network request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Cross-origin request failed: {0}")]
    ScriptLoad(String),

    #[error("Cross-origin transport unavailable: {0}")]
    Unavailable(String),
}

impl TransportFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Owns both strategies and the cross-origin callback registry; picks one per call.
pub struct TransportSelector {
    environment: RuntimeEnvironment,
    direct: Arc<dyn TransportStrategy>,
    cross_origin: Option<Arc<dyn TransportStrategy>>,
    registry: Arc<CallbackRegistry>,
}

impl TransportSelector {
    pub fn new(
        signals: RuntimeSignals,
        direct: Arc<dyn TransportStrategy>,
        cross_origin: Option<Arc<dyn TransportStrategy>>,
        registry: Arc<CallbackRegistry>,
    ) -> Self {
        let environment = classify_environment(&signals);
        tracing::debug!(?environment, kind = %environment.transport_kind(), "transport environment classified");
        Self {
            environment,
            direct,
            cross_origin,
            registry,
        }
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Strategy for the classified environment.
    pub fn select(&self) -> Result<Arc<dyn TransportStrategy>, TransportFailure> {
        match self.environment.transport_kind() {
            TransportKind::Direct => Ok(self.direct.clone()),
            TransportKind::CrossOrigin => self.cross_origin.clone().ok_or_else(|| {
                TransportFailure::Unavailable("no script host configured".to_string())
            }),
        }
    }
}

impl fmt::Debug for TransportSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportSelector")
            .field("environment", &self.environment)
            .field("cross_origin_configured", &self.cross_origin.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(TransportKind);

    #[async_trait]
    impl TransportStrategy for Named {
        fn kind(&self) -> TransportKind {
            self.0
        }

        async fn fetch(&self, _url: &str) -> Result<String, TransportFailure> {
            Ok(String::new())
        }
    }

    fn selector(signals: RuntimeSignals, with_cross_origin: bool) -> TransportSelector {
        TransportSelector::new(
            signals,
            Arc::new(Named(TransportKind::Direct)),
            with_cross_origin.then(|| Arc::new(Named(TransportKind::CrossOrigin)) as Arc<dyn TransportStrategy>),
            Arc::new(CallbackRegistry::new()),
        )
    }

    #[test]
    fn classification_order() {
        assert_eq!(classify_environment(&RuntimeSignals::server()), RuntimeEnvironment::Server);
        assert_eq!(classify_environment(&RuntimeSignals::browser()), RuntimeEnvironment::Browser);

        let window_only = RuntimeSignals {
            has_window: true,
            ..RuntimeSignals::default()
        };
        assert_eq!(classify_environment(&window_only), RuntimeEnvironment::Server);

        let test_in_browser = RuntimeSignals {
            test_runtime: true,
            ..RuntimeSignals::browser()
        };
        assert_eq!(classify_environment(&test_in_browser), RuntimeEnvironment::Test);
    }

    #[test]
    fn force_override_beats_test_signals() {
        let signals = RuntimeSignals {
            test_runtime: true,
            ..RuntimeSignals::default()
        }
        .with_forced(TransportKind::CrossOrigin);
        assert_eq!(
            classify_environment(&signals),
            RuntimeEnvironment::Forced(TransportKind::CrossOrigin)
        );
    }

    #[test]
    fn selects_strategy_by_environment() {
        let s = selector(RuntimeSignals::browser(), true);
        assert_eq!(s.select().unwrap().kind(), TransportKind::CrossOrigin);

        let s = selector(RuntimeSignals::browser().with_forced(TransportKind::Direct), true);
        assert_eq!(s.select().unwrap().kind(), TransportKind::Direct);

        let s = selector(RuntimeSignals::browser(), false);
        assert!(matches!(s.select(), Err(TransportFailure::Unavailable(_))));
    }

    #[test]
    fn parses_force_values() {
        assert_eq!(TransportKind::parse("JSONP"), Some(TransportKind::CrossOrigin));
        assert_eq!(TransportKind::parse(" direct "), Some(TransportKind::Direct));
        assert_eq!(TransportKind::parse("carrier-pigeon"), None);
    }
}
