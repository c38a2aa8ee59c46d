//! Call parameters and URL construction.
//!
//! [`interpolate`] fills `{name}` placeholders in an endpoint's path template and
//! [`finalize`] prefixes the base URL and appends the family's access credential.
//! Both are pure string transformations.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

use super::date::{encode_for_wire, utc_midnight};
use super::endpoint::ApiFamily;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

static CALENDAR_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("calendar day pattern is valid"));

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Interpolated through the wire date codec
    Date(DateTime<Utc>),
}

impl ParamValue {
    /// String form used in URLs. Text is percent-encoded so it stays within one segment.
    pub fn to_wire(&self, family: ApiFamily) -> String {
        match self {
            Self::Text(s) => encode_segment(s),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => encode_for_wire(d, family),
        }
    }

    /// JSON form checked by input schemas. Dates become `YYYY-MM-DD` strings.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::Number((*i).into()),
            Self::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Self::Bool(b) => Value::Bool(*b),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Best-effort typing of a textual value: calendar days, integers, floats, booleans.
    pub fn parse_loose(raw: &str) -> Self {
        if CALENDAR_DAY.is_match(raw) {
            if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                return Self::Date(utc_midnight(day));
            }
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return Self::Float(f);
            }
        }
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(raw.to_string()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(utc_midnight(v))
    }
}

fn encode_segment(raw: &str) -> String {
    match raw {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => urlencoding::encode(raw).into_owned(),
    }
}

/// Named call parameters, kept in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// JSON object form, as seen by input schemas.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Parses command-line `key=value` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Self, TemplateError> {
        let mut params = Self::new();
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| TemplateError::MalformedPair(pair.to_string()))?;
            params.insert(key, ParamValue::parse_loose(value));
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Mismatch between a path template and the supplied parameters.
///
/// These are programming errors in the caller, not runtime failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Parameter '{key}' has no matching placeholder in '{template}'. Available placeholders: {}", format_available(.available))]
    UnknownParameter {
        key: String,
        template: String,
        available: Vec<String>,
    },

    #[error("Placeholder '{{{placeholder}}}' in '{template}' was not satisfied. Available placeholders: {}", format_available(.available))]
    MissingParameter {
        placeholder: String,
        template: String,
        available: Vec<String>,
    },

    #[error("Malformed parameter '{0}', expected key=value")]
    MalformedPair(String),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "(none)".to_string()
    } else {
        available
            .iter()
            .map(|p| format!("{{{}}}", p))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Placeholder names in template order, without duplicates.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER.captures_iter(template) {
        let name = cap[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Substitutes every `{key}` in `template` with the matching parameter.
pub fn interpolate(
    template: &str,
    params: &Params,
    family: ApiFamily,
) -> Result<String, TemplateError> {
    let available = placeholders(template);

    for (key, _) in params.iter() {
        if !available.iter().any(|p| p == key) {
            return Err(TemplateError::UnknownParameter {
                key: key.to_string(),
                template: template.to_string(),
                available,
            });
        }
    }

    if let Some(missing) = available.iter().find(|p| params.get(p).is_none()) {
        return Err(TemplateError::MissingParameter {
            placeholder: missing.clone(),
            template: template.to_string(),
            available: available.clone(),
        });
    }

    let out = PLACEHOLDER.replace_all(template, |caps: &regex::Captures| {
        params
            .get(&caps[1])
            .map(|v| v.to_wire(family))
            .unwrap_or_default()
    });
    Ok(out.into_owned())
}

/// Joins base URL and path and appends the access credential.
pub fn finalize(path: &str, base_url: &str, family: ApiFamily, access_code: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    let code: String = url::form_urlencoded::byte_serialize(access_code.as_bytes()).collect();
    format!(
        "{}{}{}{}={}",
        base_url.trim_end_matches('/'),
        path,
        separator,
        family.credential_param(),
        code
    )
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.to_json()))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
