//! Wire date codec.
//!
//! Outbound, both API families take plain `YYYY-MM-DD` calendar dates in paths and
//! query strings. Inbound, response bodies carry instants as
//! `/Date(<ms-since-epoch>[±HHMM])/`, frequently with the slashes backslash-escaped
//! (`\/Date(1703123456789-0700)\/`). The offset suffix only records how the instant
//! was rendered upstream; it never shifts the decoded value.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::endpoint::ApiFamily;

static WIRE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/Date\((-?\d+)(?:[+-]\d{4})?\)/$").expect("wire date pattern is valid")
});

/// Formats `date` for path/query interpolation using its UTC calendar day.
pub fn encode_for_wire(date: &DateTime<Utc>, family: ApiFamily) -> String {
    match family {
        ApiFamily::Ferries | ApiFamily::HighwayConditions => date.format("%Y-%m-%d").to_string(),
    }
}

/// Decodes a `/Date(...)/` wire timestamp.
///
/// Returns `None` for anything that does not match the exact delimiter pattern or whose
/// digits do not fit a representable instant.
pub fn decode_from_wire(value: &str) -> Option<DateTime<Utc>> {
    let unescaped = value.replace("\\/", "/");
    let caps = WIRE_DATE.captures(&unescaped)?;
    let millis: i64 = caps.get(1)?.as_str().parse().ok()?;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Renders an instant in the inbound wire format (unescaped, no offset).
pub fn to_wire_timestamp(date: &DateTime<Utc>) -> String {
    format!("/Date({})/", date.timestamp_millis())
}

/// Midnight UTC of the given calendar day.
pub fn utc_midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Serde adapter for required `/Date(...)/` fields.
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Flush {
///     #[serde(with = "wsdot_client::protocol::date::serde_wire")]
///     at: DateTime<Utc>,
/// }
///
/// let flush: Flush = serde_json::from_str(r#"{"at":"\/Date(1703123456789-0800)\/"}"#).unwrap();
/// assert_eq!(flush.at.timestamp_millis(), 1703123456789);
/// ```
pub mod serde_wire {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_wire_timestamp(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::decode_from_wire(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid wire date: {}", raw)))
    }
}

/// Serde adapter for nullable `/Date(...)/` fields.
pub mod serde_wire_opt {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&super::to_wire_timestamp(d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => super::decode_from_wire(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid wire date: {}", raw))),
        }
    }
}
