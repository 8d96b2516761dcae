//! Event use cases
//!
//! Each operation is one unit of work against the repository: the getters run
//! read-only, create/update/delete run read-write so the existence check and
//! the mutation cannot be split by a concurrent writer.

use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{Event, EventDto};
use crate::repository::{EventRepository, TxMode};
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct EventService {
    repository: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all_events(&self) -> AppResult<Vec<Event>> {
        let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
        let events = tx.find_all().await?;
        tx.commit().await?;

        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    pub async fn get_event_by_id(&self, id: i64) -> AppResult<Event> {
        let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
        let event = tx
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::event_not_found(id))?;
        tx.commit().await?;

        Ok(event)
    }

    pub async fn create_event(&self, dto: EventDto) -> AppResult<Event> {
        let mut tx = self.repository.begin(TxMode::ReadWrite).await?;
        let event = tx.save(Event::from_dto(dto)).await?;
        tx.commit().await?;

        info!(id = ?event.id, name = %event.name, "Created event");
        Ok(event)
    }

    /// Replaces every field of event `id` with `dto`; nothing is merged.
    pub async fn update_event(&self, id: i64, dto: EventDto) -> AppResult<Event> {
        let mut tx = self.repository.begin(TxMode::ReadWrite).await?;
        let mut existing = tx
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::event_not_found(id))?;

        existing.replace_with(dto);
        let event = tx.save(existing).await?;
        tx.commit().await?;

        info!(id, "Updated event");
        Ok(event)
    }

    pub async fn delete_event(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.begin(TxMode::ReadWrite).await?;
        if !tx.exists_by_id(id).await? {
            return Err(AppError::event_not_found(id));
        }
        tx.delete_by_id(id).await?;
        tx.commit().await?;

        info!(id, "Deleted event");
        Ok(())
    }
}
