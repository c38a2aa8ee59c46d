use std::env;
use std::sync::Arc;
use std::time::Duration;

use keyring::Entry;

use crate::client::core::WsdotClient;
use crate::context::LogMode;
use crate::transport::{
    CallbackRegistry, CrossOriginTransport, DirectTransport, RuntimeSignals, ScriptHost,
    TransportFailure, TransportSelector, TransportStrategy,
};

/// Keyring service holding the access code.
pub const KEYRING_SERVICE: &str = "wsdot-api";
/// Keyring user holding the access code.
pub const KEYRING_USER: &str = "access-code";

/// Errors raised while assembling a client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to initialize HTTP transport: {0}")]
    Transport(#[from] TransportFailure),

    #[error("Invalid base URL override '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Resolved client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub access_code: Option<String>,
    pub http_timeout: Duration,
    pub proxy_url: Option<String>,
    pub cross_origin_timeout: Duration,
    /// Replaces scheme and host of every endpoint's base URL (mock servers, proxies)
    pub base_url_override: Option<String>,
    pub log_mode: LogMode,
}

fn env_secs(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

impl ClientConfig {
    /// Defaults overridden by `WSDOT_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            access_code: None,
            http_timeout: Duration::from_secs(env_secs("WSDOT_HTTP_TIMEOUT_SECS").unwrap_or(30)),
            proxy_url: env::var("WSDOT_PROXY_URL").ok().filter(|s| !s.is_empty()),
            cross_origin_timeout: Duration::from_secs(
                env_secs("WSDOT_CROSS_ORIGIN_TIMEOUT_SECS").unwrap_or(30),
            ),
            base_url_override: env::var("WSDOT_BASE_URL_OVERRIDE").ok().filter(|s| !s.is_empty()),
            log_mode: env::var("WSDOT_LOG_MODE")
                .ok()
                .and_then(|s| LogMode::parse(&s))
                .unwrap_or_default(),
        }
    }

    /// Looks up the access code: OS keyring first, then `WSDOT_ACCESS_CODE`.
    pub fn lookup_access_code() -> Option<String> {
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(code) = entry.get_password() {
                return Some(code);
            }
        }
        env::var("WSDOT_ACCESS_CODE").ok().filter(|s| !s.is_empty())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Builder for [`WsdotClient`].
pub struct WsdotClientBuilder {
    config: ClientConfig,
    signals: Option<RuntimeSignals>,
    direct: Option<Arc<dyn TransportStrategy>>,
    script_host: Option<Arc<dyn ScriptHost>>,
    registry: Option<Arc<CallbackRegistry>>,
}

impl WsdotClientBuilder {
    pub fn new() -> Self {
        Self::from_config(ClientConfig::from_env())
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            signals: None,
            direct: None,
            script_host: None,
            registry: None,
        }
    }

    /// Sets the access credential. Without it the keyring and environment are consulted.
    pub fn access_code(mut self, code: impl Into<String>) -> Self {
        self.config.access_code = Some(code.into());
        self
    }

    /// Timeout applied by the direct HTTP client.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// How long the cross-origin strategy waits for its callback.
    pub fn cross_origin_timeout(mut self, timeout: Duration) -> Self {
        self.config.cross_origin_timeout = timeout;
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(url.into());
        self
    }

    /// Routes every endpoint to another origin, keeping the base URL's path.
    ///
    /// Primarily for testing with mock servers.
    pub fn base_url_override(mut self, origin: impl Into<String>) -> Self {
        self.config.base_url_override = Some(origin.into());
        self
    }

    pub fn log_mode(mut self, mode: LogMode) -> Self {
        self.config.log_mode = mode;
        self
    }

    /// Overrides runtime detection (see [`RuntimeSignals::detect`]).
    pub fn runtime_signals(mut self, signals: RuntimeSignals) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Replaces the direct HTTP strategy.
    pub fn direct_transport(mut self, strategy: Arc<dyn TransportStrategy>) -> Self {
        self.direct = Some(strategy);
        self
    }

    /// Enables the cross-origin strategy on top of the given host.
    pub fn script_host(mut self, host: Arc<dyn ScriptHost>) -> Self {
        self.script_host = Some(host);
        self
    }

    /// Shares an existing callback registry instead of allocating one.
    pub fn callback_registry(mut self, registry: Arc<CallbackRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<WsdotClient, ConfigError> {
        let config = self.config;

        if let Some(origin) = &config.base_url_override {
            url::Url::parse(origin).map_err(|e| ConfigError::InvalidBaseUrl {
                url: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let access_code = match config.access_code.clone() {
            Some(code) => code,
            None => ClientConfig::lookup_access_code().unwrap_or_else(|| {
                tracing::warn!("no access code configured; upstream APIs will reject requests");
                String::new()
            }),
        };

        let direct: Arc<dyn TransportStrategy> = match self.direct {
            Some(d) => d,
            None => Arc::new(DirectTransport::new(
                config.http_timeout,
                config.proxy_url.as_deref(),
            )?),
        };

        let registry = self.registry.unwrap_or_else(|| Arc::new(CallbackRegistry::new()));
        let cross_origin = self.script_host.map(|host| {
            Arc::new(CrossOriginTransport::new(
                host,
                registry.clone(),
                config.cross_origin_timeout,
            )) as Arc<dyn TransportStrategy>
        });

        let signals = self.signals.unwrap_or_else(RuntimeSignals::detect);
        let selector = TransportSelector::new(signals, direct, cross_origin, registry);

        Ok(WsdotClient::new(
            access_code,
            config.base_url_override,
            config.log_mode,
            selector,
        ))
    }
}

impl Default for WsdotClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
