//! Lenient timestamp parsing for request payloads.
//!
//! Task times are stored as naive date-times. Clients may send either a naive
//! ISO 8601 value (`2024-05-01T10:00:00`) or an RFC 3339 value with an offset,
//! which is normalized to UTC before the offset is dropped.
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub fn parse(value: &str) -> Result<NaiveDateTime, String> {
    if let Ok(naive) = value.parse::<NaiveDateTime>() {
        return Ok(naive);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .map_err(|_| format!("invalid datetime '{}'", value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
