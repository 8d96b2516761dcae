use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};

use crate::utils::timestamp;

/// Event fields exactly as a client sent them. Nothing here is trusted;
/// run it through [`crate::validation::validate_event`] to get an
/// [`EventDto`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_capacity")]
    pub capacity: Option<i32>,
}

/// Validated create/update input. Only the validation module builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDto {
    pub name: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: String,
    pub capacity: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

// Form posts send numbers as strings.
fn deserialize_capacity<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => i32::try_from(value)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("capacity {} is out of range", value))),
        Some(NumberOrText::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(raw)) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("capacity '{}' is not a whole number", raw))),
    }
}
