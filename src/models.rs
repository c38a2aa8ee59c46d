//! Typed payloads for the built-in catalog.
//!
//! Field names follow the upstream JSON (`PascalCase` with `ID` suffixes). Use with
//! [`crate::WsdotClient::fetch`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::date::{serde_wire, serde_wire_opt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidDateRange {
    #[serde(rename = "DateFrom", with = "serde_wire")]
    pub date_from: DateTime<Utc>,
    #[serde(rename = "DateThru", with = "serde_wire")]
    pub date_thru: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareTerminal {
    #[serde(rename = "TerminalID")]
    pub terminal_id: u32,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "RouteID")]
    pub route_id: u32,
    #[serde(rename = "RouteAbbrev")]
    pub route_abbrev: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "RegionID", default)]
    pub region_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalBasic {
    #[serde(rename = "TerminalID")]
    pub terminal_id: u32,
    #[serde(rename = "TerminalName")]
    pub terminal_name: String,
    #[serde(rename = "TerminalAbbrev", default)]
    pub terminal_abbrev: Option<String>,
}

/// Vessel service status as reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VesselStatus {
    InService,
    Maintenance,
    OutOfService,
}

impl TryFrom<u8> for VesselStatus {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::InService),
            2 => Ok(Self::Maintenance),
            3 => Ok(Self::OutOfService),
            other => Err(format!("unknown vessel status {}", other)),
        }
    }
}

impl From<VesselStatus> for u8 {
    fn from(s: VesselStatus) -> Self {
        match s {
            VesselStatus::InService => 1,
            VesselStatus::Maintenance => 2,
            VesselStatus::OutOfService => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselBasic {
    #[serde(rename = "VesselID")]
    pub vessel_id: u32,
    #[serde(rename = "VesselName")]
    pub vessel_name: String,
    #[serde(rename = "VesselAbbrev", default)]
    pub vessel_abbrev: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<VesselStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighwayAlert {
    #[serde(rename = "AlertID")]
    pub alert_id: u64,
    #[serde(rename = "HeadlineDescription")]
    pub headline: String,
    #[serde(rename = "EventCategory", default)]
    pub event_category: Option<String>,
    #[serde(rename = "Priority", default)]
    pub priority: Option<String>,
    #[serde(rename = "StartTime", with = "serde_wire")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "EndTime", with = "serde_wire_opt", default)]
    pub end_time: Option<DateTime<Utc>>,
}
