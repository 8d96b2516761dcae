//! Event data access
//!
//! Every service operation runs inside one unit of work opened with
//! [`EventRepository::begin`]. A unit of work exposes the row-level
//! operations and is rolled back when dropped without [`EventTransaction::commit`].

mod memory;
mod postgres;

pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("no event row with id {0}")]
    MissingRow(i64),

    #[error("write attempted in a read-only transaction")]
    ReadOnly,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn EventTransaction>, RepositoryError>;
}

#[async_trait]
pub trait EventTransaction: Send {
    /// All events in store order (ascending id).
    async fn find_all(&mut self) -> Result<Vec<Event>, RepositoryError>;

    async fn find_by_id(&mut self, id: i64) -> Result<Option<Event>, RepositoryError>;

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, RepositoryError>;

    /// Inserts `event` when it has no id and returns it with the assigned id,
    /// otherwise overwrites the row with that id.
    async fn save(&mut self, event: Event) -> Result<Event, RepositoryError>;

    /// Removing an id that has no row is not an error.
    async fn delete_by_id(&mut self, id: i64) -> Result<(), RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
