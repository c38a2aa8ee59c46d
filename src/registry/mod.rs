//! Built-in endpoint catalog.
//!
//! A representative subset of the ferries and highway conditions operations, each
//! with input/output schemas and sample parameters. Applications with their own
//! descriptors can ignore this module entirely.

use chrono::Utc;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::protocol::{ApiFamily, Endpoint, Params};

pub const FARES_BASE_URL: &str = "https://www.wsdot.wa.gov/ferries/api/fares/rest";
pub const SCHEDULE_BASE_URL: &str = "https://www.wsdot.wa.gov/ferries/api/schedule/rest";
pub const TERMINALS_BASE_URL: &str = "https://www.wsdot.wa.gov/ferries/api/terminals/rest";
pub const VESSELS_BASE_URL: &str = "https://www.wsdot.wa.gov/ferries/api/vessels/rest";
pub const HIGHWAY_ALERTS_BASE_URL: &str =
    "https://www.wsdot.wa.gov/Traffic/api/HighwayAlerts/HighwayAlertsREST.svc";

/// Schema for a `/Date(...)/` string (escaped or not).
pub fn wire_date_schema() -> Value {
    json!({ "type": "string", "pattern": r"^\\?/Date\(-?\d+([+-]\d{4})?\)\\?/$" })
}

/// Nullable variant of [`wire_date_schema`].
pub fn nullable_wire_date_schema() -> Value {
    json!({ "type": ["string", "null"], "pattern": r"^\\?/Date\(-?\d+([+-]\d{4})?\)\\?/$" })
}

fn trip_date_input() -> Value {
    json!({
        "type": "object",
        "required": ["tripDate"],
        "properties": { "tripDate": { "type": "string", "format": "date" } },
        "additionalProperties": false
    })
}

fn positive_id_input(field: &str) -> Value {
    json!({
        "type": "object",
        "required": [field],
        "properties": { field: { "type": "integer", "minimum": 1 } },
        "additionalProperties": false
    })
}

fn terminal_basic() -> Value {
    json!({
        "type": "object",
        "required": ["TerminalID", "TerminalName"],
        "properties": {
            "TerminalID": { "type": "integer", "minimum": 1 },
            "TerminalName": { "type": "string" },
            "TerminalAbbrev": { "type": ["string", "null"] }
        }
    })
}

fn vessel_basic() -> Value {
    json!({
        "type": "object",
        "required": ["VesselID", "VesselName"],
        "properties": {
            "VesselID": { "type": "integer", "minimum": 1 },
            "VesselName": { "type": "string" },
            "VesselAbbrev": { "type": ["string", "null"] },
            "Status": { "type": ["integer", "null"], "enum": [1, 2, 3, null] }
        }
    })
}

fn highway_alert() -> Value {
    json!({
        "type": "object",
        "required": ["AlertID", "HeadlineDescription", "StartTime"],
        "properties": {
            "AlertID": { "type": "integer", "minimum": 1 },
            "HeadlineDescription": { "type": "string" },
            "EventCategory": { "type": ["string", "null"] },
            "Priority": { "type": ["string", "null"] },
            "StartTime": wire_date_schema(),
            "EndTime": nullable_wire_date_schema()
        }
    })
}

fn array_of(item: Value) -> Value {
    json!({ "type": "array", "items": item })
}

/// Today's trip date, read when the sample is requested.
fn today() -> Params {
    Params::new().with("tripDate", Utc::now())
}

static CATALOG: Lazy<Vec<Endpoint>> = Lazy::new(|| {
    vec![
        Endpoint::new("fares.cacheFlushDate", ApiFamily::Ferries, FARES_BASE_URL, "/cacheflushdate")
            .with_output_schema(wire_date_schema()),
        Endpoint::new("fares.validDateRange", ApiFamily::Ferries, FARES_BASE_URL, "/validdaterange")
            .with_output_schema(json!({
                "type": "object",
                "required": ["DateFrom", "DateThru"],
                "properties": {
                    "DateFrom": wire_date_schema(),
                    "DateThru": wire_date_schema()
                }
            })),
        Endpoint::new("fares.terminals", ApiFamily::Ferries, FARES_BASE_URL, "/terminals/{tripDate}")
            .with_input_schema(trip_date_input())
            .with_output_schema(array_of(json!({
                "type": "object",
                "required": ["TerminalID", "Description"],
                "properties": {
                    "TerminalID": { "type": "integer", "minimum": 1 },
                    "Description": { "type": "string" }
                }
            })))
            .with_sample_fn(today),
        Endpoint::new("schedule.routes", ApiFamily::Ferries, SCHEDULE_BASE_URL, "/routes/{tripDate}")
            .with_input_schema(trip_date_input())
            .with_output_schema(array_of(json!({
                "type": "object",
                "required": ["RouteID", "RouteAbbrev", "Description"],
                "properties": {
                    "RouteID": { "type": "integer", "minimum": 1 },
                    "RouteAbbrev": { "type": "string" },
                    "Description": { "type": "string" },
                    "RegionID": { "type": ["integer", "null"] }
                }
            })))
            .with_sample_fn(today),
        Endpoint::new("terminals.terminalBasics", ApiFamily::Ferries, TERMINALS_BASE_URL, "/terminalbasics")
            .with_output_schema(array_of(terminal_basic())),
        Endpoint::new(
            "terminals.terminalBasicsById",
            ApiFamily::Ferries,
            TERMINALS_BASE_URL,
            "/terminalbasics/{terminalId}",
        )
        .with_input_schema(positive_id_input("terminalId"))
        .with_output_schema(terminal_basic())
        .with_sample_params(Params::new().with("terminalId", 3)),
        Endpoint::new("vessels.vesselBasics", ApiFamily::Ferries, VESSELS_BASE_URL, "/vesselbasics")
            .with_output_schema(array_of(vessel_basic())),
        Endpoint::new(
            "vessels.vesselBasicsById",
            ApiFamily::Ferries,
            VESSELS_BASE_URL,
            "/vesselbasics/{vesselId}",
        )
        .with_input_schema(positive_id_input("vesselId"))
        .with_output_schema(vessel_basic())
        .with_sample_params(Params::new().with("vesselId", 32)),
        Endpoint::new(
            "highwayConditions.alerts",
            ApiFamily::HighwayConditions,
            HIGHWAY_ALERTS_BASE_URL,
            "/GetAlertsAsJson",
        )
        .with_output_schema(array_of(highway_alert())),
        Endpoint::new(
            "highwayConditions.alertById",
            ApiFamily::HighwayConditions,
            HIGHWAY_ALERTS_BASE_URL,
            "/GetAlertAsJson?AlertID={alertId}",
        )
        .with_input_schema(positive_id_input("alertId"))
        .with_output_schema(highway_alert())
        .with_sample_params(Params::new().with("alertId", 468632)),
    ]
});

/// Every built-in endpoint.
pub fn catalog() -> &'static [Endpoint] {
    &CATALOG
}

/// Looks up a built-in endpoint by name (e.g. `"vessels.vesselBasics"`).
pub fn find(name: &str) -> Option<&'static Endpoint> {
    CATALOG.iter().find(|e| e.name() == name)
}

pub fn by_family(family: ApiFamily) -> impl Iterator<Item = &'static Endpoint> {
    CATALOG.iter().filter(move |e| e.family() == family)
}
