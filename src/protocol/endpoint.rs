//! Endpoint descriptors.

use std::fmt;

use serde_json::Value;

use super::request::Params;
use super::schema::Schema;

/// Upstream service an endpoint belongs to.
///
/// The families share the pipeline but differ in how the access credential is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    /// Ferries fares, schedule, terminals and vessels APIs
    Ferries,
    /// Highway conditions (traffic) APIs
    HighwayConditions,
}

impl ApiFamily {
    /// Query parameter carrying the access credential.
    #[inline]
    pub fn credential_param(&self) -> &'static str {
        match self {
            Self::Ferries => "apiaccesscode",
            Self::HighwayConditions => "AccessCode",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ferries => "ferries",
            Self::HighwayConditions => "highway_conditions",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sample parameters, fixed or computed at call time (e.g. today's trip date).
#[derive(Debug, Clone)]
enum Sample {
    Fixed(Params),
    Computed(fn() -> Params),
}

/// Immutable definition of one API operation.
///
/// Built once (see [`crate::registry`]) and shared by every call to the operation.
#[derive(Debug, Clone)]
pub struct Endpoint {
    name: String,
    family: ApiFamily,
    base_url: String,
    path_template: String,
    input_schema: Option<Schema>,
    output_schema: Option<Schema>,
    sample: Option<Sample>,
}

impl Endpoint {
    /// Descriptor without schemas or samples.
    pub fn new(
        name: impl Into<String>,
        family: ApiFamily,
        base_url: impl Into<String>,
        path_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            base_url: base_url.into(),
            path_template: path_template.into(),
            input_schema: None,
            output_schema: None,
            sample: None,
        }
    }

    /// Schema checked against call parameters before the URL is built.
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(Schema::new(schema));
        self
    }

    /// Schema checked against the parsed response.
    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(Schema::new(schema));
        self
    }

    /// Fixed sample parameters.
    pub fn with_sample_params(mut self, params: Params) -> Self {
        self.sample = Some(Sample::Fixed(params));
        self
    }

    /// Sample parameters produced on every call to [`Endpoint::sample_params`].
    pub fn with_sample_fn(mut self, sample: fn() -> Params) -> Self {
        self.sample = Some(Sample::Computed(sample));
        self
    }

    /// Catalog name, used in logs and error context.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> ApiFamily {
        self.family
    }

    /// Base URL without a trailing path template.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path (and optional query) with `{name}` placeholders.
    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    /// Input schema, if any.
    pub fn input_schema(&self) -> Option<&Schema> {
        self.input_schema.as_ref()
    }

    /// Output schema, if any.
    pub fn output_schema(&self) -> Option<&Schema> {
        self.output_schema.as_ref()
    }

    /// Sample parameters, evaluated now for computed samples.
    pub fn sample_params(&self) -> Option<Params> {
        self.sample.as_ref().map(|s| match s {
            Sample::Fixed(p) => p.clone(),
            Sample::Computed(f) => f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_names_are_fixed_per_family() {
        assert_eq!(ApiFamily::Ferries.credential_param(), "apiaccesscode");
        assert_eq!(ApiFamily::HighwayConditions.credential_param(), "AccessCode");
    }
}
