//! Serde helpers for zone-less event timestamps.
//!
//! Events are scheduled in server-local wall time at whole-second
//! precision. Output is always `YYYY-MM-DDTHH:MM:SS`; input also accepts
//! fractional seconds (truncated), minute precision (what a `datetime-local`
//! form field submits) and RFC 3339 with an offset, which is converted to
//! server-local wall time.

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound};
use serde::{de, Deserialize, Deserializer, Serializer};

const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Current server-local wall time, the reference point for "in the future".
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parses a client timestamp into server-local wall time, dropping any
/// sub-second part so stored values match what [`format`] prints.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|value| value.with_timezone(&Local).naive_local())
        })
        .map(|value| value.trunc_subsecs(0))
}

pub fn format(value: &NaiveDateTime) -> String {
    value.format(OUTPUT_FORMAT).to_string()
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date-time '{}'", raw)))
}

/// Same as the parent module, for optional request fields. `null`, a missing
/// field and an empty string all map to `None`.
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date-time '{}'", raw))),
        }
    }
}
