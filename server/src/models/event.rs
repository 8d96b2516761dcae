use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::dto::EventDto;
use crate::utils::timestamp;

/// A persisted event row. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    #[serde(with = "timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub end_time: NaiveDateTime,
    pub location: String,
    pub capacity: i32,
}

impl Event {
    /// Builds an unsaved event carrying every field of `dto`.
    pub fn from_dto(dto: EventDto) -> Self {
        Self {
            id: None,
            name: dto.name,
            description: dto.description,
            start_time: dto.start_time,
            end_time: dto.end_time,
            location: dto.location,
            capacity: dto.capacity,
        }
    }

    /// Overwrites every field except `id` with the values from `dto`.
    pub fn replace_with(&mut self, dto: EventDto) {
        self.name = dto.name;
        self.description = dto.description;
        self.start_time = dto.start_time;
        self.end_time = dto.end_time;
        self.location = dto.location;
        self.capacity = dto.capacity;
    }
}
