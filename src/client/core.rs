use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::error_classification::normalize;
use crate::context::{CallStage, FetchContext, LogMode};
use crate::error::ApiError;
use crate::error_code::ErrorCode;
use crate::protocol::{Endpoint, Params};
use crate::transport::{RuntimeEnvironment, TransportSelector};
use crate::Result;

/// Client for the WSDOT REST APIs.
///
/// Holds no per-call state; concurrent calls are independent of each other.
#[derive(Debug)]
pub struct WsdotClient {
    pub(crate) access_code: String,
    pub(crate) base_url_override: Option<String>,
    pub(crate) log_mode: LogMode,
    pub(crate) selector: TransportSelector,
}

impl WsdotClient {
    pub(crate) fn new(
        access_code: String,
        base_url_override: Option<String>,
        log_mode: LogMode,
        selector: TransportSelector,
    ) -> Self {
        Self {
            access_code,
            base_url_override,
            log_mode,
            selector,
        }
    }

    pub fn builder() -> crate::client::WsdotClientBuilder {
        crate::client::WsdotClientBuilder::new()
    }

    pub fn transport_environment(&self) -> RuntimeEnvironment {
        self.selector.environment()
    }

    pub fn selector(&self) -> &TransportSelector {
        &self.selector
    }

    /// Calls `endpoint` and returns the validated JSON payload.
    pub async fn execute(&self, endpoint: &Endpoint, params: Params) -> Result<Value> {
        self.execute_with_log_mode(endpoint, params, self.log_mode).await
    }

    /// Like [`WsdotClient::execute`] with a per-call logging verbosity.
    pub async fn execute_with_log_mode(
        &self,
        endpoint: &Endpoint,
        params: Params,
        log_mode: LogMode,
    ) -> Result<Value> {
        self.run(endpoint, params, log_mode, |value, _| Ok(value)).await
    }

    /// Calls `endpoint` with its sample parameters, or none when it declares no sample.
    pub async fn execute_sample(&self, endpoint: &Endpoint) -> Result<Value> {
        let params = endpoint.sample_params().unwrap_or_default();
        self.execute(endpoint, params).await
    }

    /// Calls `endpoint` and deserializes the validated payload into `T`.
    ///
    /// A payload that does not fit `T` fails the call with `VALIDATION`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint, params: Params) -> Result<T> {
        self.run(endpoint, params, self.log_mode, |value, ctx| {
            serde_json::from_value(value).map_err(|e| {
                ctx.error(
                    ErrorCode::Validation,
                    format!("Response does not match the expected type: {}", e),
                )
            })
        })
        .await
    }

    async fn run<T, D>(&self, endpoint: &Endpoint, params: Params, log_mode: LogMode, decode: D) -> Result<T>
    where
        D: FnOnce(Value, &FetchContext) -> std::result::Result<T, ApiError>,
    {
        let mut ctx = FetchContext::new(endpoint.name(), log_mode);
        let started = Instant::now();
        if log_mode.info() {
            info!(endpoint = endpoint.name(), params = %params, "request started");
        }

        match self.run_pipeline(endpoint, &params, &mut ctx, decode).await {
            Ok(value) => {
                ctx.advance(CallStage::Done);
                if log_mode.info() {
                    info!(
                        endpoint = endpoint.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "request completed"
                    );
                }
                Ok(value)
            }
            Err(failure) => {
                let stage = ctx.stage();
                let err = normalize(failure, &ctx);
                ctx.advance(CallStage::Failed);
                if log_mode.info() {
                    warn!(
                        endpoint = endpoint.name(),
                        %stage,
                        code = %err.code(),
                        error = %err,
                        "request failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// Base URL for `endpoint`, with the configured origin override applied.
    pub fn resolve_base_url(&self, endpoint: &Endpoint) -> String {
        match &self.base_url_override {
            Some(origin) => rebase(endpoint.base_url(), origin),
            None => endpoint.base_url().to_string(),
        }
    }
}

/// Swaps the scheme and host of `base_url` for `origin`, keeping the path.
fn rebase(base_url: &str, origin: &str) -> String {
    let path = url::Url::parse(base_url)
        .map(|u| u.path().trim_end_matches('/').to_string())
        .unwrap_or_default();
    format!("{}{}", origin.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::rebase;

    #[test]
    fn rebase_keeps_path() {
        assert_eq!(
            rebase("https://www.wsdot.wa.gov/ferries/api/vessels/rest", "http://127.0.0.1:9000/"),
            "http://127.0.0.1:9000/ferries/api/vessels/rest"
        );
        assert_eq!(rebase("https://example.test", "http://mock"), "http://mock");
    }
}
