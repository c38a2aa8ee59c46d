//! Single-call pipeline execution.
//!
//! Stages run in order and the first failure ends the call; nothing is retried.

use serde_json::Value;
use tracing::debug;

use super::core::WsdotClient;
use super::error_classification::Failure;
use crate::context::{CallStage, FetchContext};
use crate::error::ApiError;
use crate::error_code::ErrorCode;
use crate::pipeline::interpret_response;
use crate::protocol::request::{finalize, interpolate};
use crate::protocol::validator::{validate_input, validate_output};
use crate::protocol::{Endpoint, Params};

impl WsdotClient {
    /// Runs every stage, then hands the validated payload to `decode` while the call is
    /// still in the output stage.
    pub(crate) async fn run_pipeline<T, D>(
        &self,
        endpoint: &Endpoint,
        params: &Params,
        ctx: &mut FetchContext,
        decode: D,
    ) -> Result<T, Failure>
    where
        D: FnOnce(Value, &FetchContext) -> Result<T, ApiError>,
    {
        ctx.advance(CallStage::ValidatingInput);
        validate_input(endpoint.input_schema(), params, ctx)?;

        ctx.advance(CallStage::BuildingUrl);
        let path = interpolate(endpoint.path_template(), params, endpoint.family())
            .map_err(|e| ctx.error(ErrorCode::Validation, e.to_string()))?;
        let base_url = self.resolve_base_url(endpoint);
        ctx.set_url(format!("{}{}", base_url.trim_end_matches('/'), path));
        let url = finalize(&path, &base_url, endpoint.family(), &self.access_code);

        ctx.advance(CallStage::AwaitingTransport);
        let strategy = self.selector.select()?;
        if ctx.log_mode().debug() {
            debug!(
                endpoint = ctx.endpoint(),
                url = ctx.url().unwrap_or_default(),
                transport = %strategy.kind(),
                "dispatching request"
            );
        }
        let body = strategy.fetch(&url).await?;

        ctx.advance(CallStage::InterpretingResponse);
        if ctx.log_mode().debug() {
            debug!(endpoint = ctx.endpoint(), bytes = body.len(), "response received");
        }
        let value = interpret_response(&body, ctx)?;

        ctx.advance(CallStage::ValidatingOutput);
        let value = validate_output(endpoint.output_schema(), value, ctx)?;
        Ok(decode(value, ctx)?)
    }
}
