//! Field validation for incoming event payloads
//!
//! Every rule runs independently and all failures are collected, so a client
//! sees every problem with its request at once.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{EventDto, EventPayload};

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const MIN_CAPACITY: i32 = 1;

pub const NAME_REQUIRED: &str = "Event name is required";
pub const NAME_TOO_LONG: &str = "Event name must be less than 100 characters";
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const DESCRIPTION_TOO_LONG: &str = "Description must be less than 500 characters";
pub const START_TIME_REQUIRED: &str = "Start time is required";
pub const START_TIME_NOT_FUTURE: &str = "Start time must be in the future";
pub const END_TIME_REQUIRED: &str = "End time is required";
pub const END_TIME_NOT_FUTURE: &str = "End time must be in the future";
pub const LOCATION_REQUIRED: &str = "Location is required";
pub const CAPACITY_TOO_SMALL: &str = "Capacity must be at least 1";

/// A single failed rule, keyed by the JSON field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn errors(&self) -> &[FieldError] {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn messages_for(&self, field: &str) -> Vec<&'static str> {
        self.0
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.message)
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Checks `payload` against the event field rules, using `now` as the
/// reference for timestamps that must lie in the future.
///
/// No rule relates `endTime` to `startTime`; each only has to be in the
/// future.
pub fn validate_event(
    payload: EventPayload,
    now: NaiveDateTime,
) -> Result<EventDto, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_text(
        &mut errors,
        "name",
        payload.name.as_deref(),
        NAME_REQUIRED,
        Some((NAME_MAX_CHARS, NAME_TOO_LONG)),
    );
    check_text(
        &mut errors,
        "description",
        payload.description.as_deref(),
        DESCRIPTION_REQUIRED,
        Some((DESCRIPTION_MAX_CHARS, DESCRIPTION_TOO_LONG)),
    );
    check_future(
        &mut errors,
        "startTime",
        payload.start_time,
        now,
        START_TIME_REQUIRED,
        START_TIME_NOT_FUTURE,
    );
    check_future(
        &mut errors,
        "endTime",
        payload.end_time,
        now,
        END_TIME_REQUIRED,
        END_TIME_NOT_FUTURE,
    );
    check_text(
        &mut errors,
        "location",
        payload.location.as_deref(),
        LOCATION_REQUIRED,
        None,
    );
    if payload.capacity.map_or(true, |capacity| capacity < MIN_CAPACITY) {
        errors.add("capacity", CAPACITY_TOO_SMALL);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let (
        Some(name),
        Some(description),
        Some(start_time),
        Some(end_time),
        Some(location),
        Some(capacity),
    ) = (
        payload.name,
        payload.description,
        payload.start_time,
        payload.end_time,
        payload.location,
        payload.capacity,
    )
    else {
        return Err(errors);
    };

    Ok(EventDto {
        name,
        description,
        start_time,
        end_time,
        location,
        capacity,
    })
}

fn check_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    required: &'static str,
    max: Option<(usize, &'static str)>,
) {
    let value = value.unwrap_or_default();
    if value.trim().is_empty() {
        errors.add(field, required);
    }
    if let Some((max_chars, too_long)) = max {
        if value.chars().count() > max_chars {
            errors.add(field, too_long);
        }
    }
}

fn check_future(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<NaiveDateTime>,
    now: NaiveDateTime,
    required: &'static str,
    not_future: &'static str,
) {
    match value {
        None => errors.add(field, required),
        Some(value) if value <= now => errors.add(field, not_future),
        Some(_) => {}
    }
}
