use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

use super::{EventRepository, EventTransaction, RepositoryError, TxMode};
use crate::models::Event;

#[derive(Debug, Clone, Default)]
struct EventTable {
    last_id: i64,
    rows: BTreeMap<i64, Event>,
}

/// Process-local store for development and tests. Contents are lost on
/// shutdown.
///
/// Read-only units share the table; a read-write unit holds it exclusively
/// and stages its changes on a full copy that replaces the table on commit,
/// so opening a read-write unit costs O(rows).
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    table: Arc<RwLock<EventTable>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn EventTransaction>, RepositoryError> {
        let access = match mode {
            TxMode::ReadOnly => Access::Read(self.table.clone().read_owned().await),
            TxMode::ReadWrite => {
                let guard = self.table.clone().write_owned().await;
                let staged = guard.clone();
                Access::Write { guard, staged }
            }
        };
        Ok(Box::new(InMemoryEventTransaction { access }))
    }
}

enum Access {
    Read(OwnedRwLockReadGuard<EventTable>),
    Write {
        guard: OwnedRwLockWriteGuard<EventTable>,
        staged: EventTable,
    },
}

struct InMemoryEventTransaction {
    access: Access,
}

impl InMemoryEventTransaction {
    fn table(&self) -> &EventTable {
        match &self.access {
            Access::Read(guard) => &**guard,
            Access::Write { staged, .. } => staged,
        }
    }

    fn table_mut(&mut self) -> Result<&mut EventTable, RepositoryError> {
        match &mut self.access {
            Access::Read(_) => Err(RepositoryError::ReadOnly),
            Access::Write { staged, .. } => Ok(staged),
        }
    }
}

#[async_trait]
impl EventTransaction for InMemoryEventTransaction {
    async fn find_all(&mut self) -> Result<Vec<Event>, RepositoryError> {
        Ok(self.table().rows.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<Event>, RepositoryError> {
        Ok(self.table().rows.get(&id).cloned())
    }

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.table().rows.contains_key(&id))
    }

    async fn save(&mut self, mut event: Event) -> Result<Event, RepositoryError> {
        let table = self.table_mut()?;
        let id = match event.id {
            Some(id) if table.rows.contains_key(&id) => id,
            Some(id) => return Err(RepositoryError::MissingRow(id)),
            None => {
                table.last_id += 1;
                table.last_id
            }
        };
        event.id = Some(id);
        table.rows.insert(id, event.clone());
        Ok(event)
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<(), RepositoryError> {
        self.table_mut()?.rows.remove(&id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        if let Access::Write { mut guard, staged } = self.access {
            *guard = staged;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(name: &str) -> Event {
        let day = NaiveDate::from_ymd_opt(2040, 3, 1).unwrap();
        Event {
            id: None,
            name: name.to_string(),
            description: "Talk".to_string(),
            start_time: day.and_hms_opt(10, 0, 0).unwrap(),
            end_time: day.and_hms_opt(12, 0, 0).unwrap(),
            location: "Hall A".to_string(),
            capacity: 50,
        }
    }

    async fn insert(repository: &InMemoryEventRepository, name: &str) -> Event {
        let mut tx = repository.begin(TxMode::ReadWrite).await.unwrap();
        let saved = tx.save(sample(name)).await.unwrap();
        tx.commit().await.unwrap();
        saved
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let repository = InMemoryEventRepository::new();

        assert_eq!(insert(&repository, "first").await.id, Some(1));
        assert_eq!(insert(&repository, "second").await.id, Some(2));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repository = InMemoryEventRepository::new();
        insert(&repository, "first").await;

        let mut tx = repository.begin(TxMode::ReadWrite).await.unwrap();
        tx.delete_by_id(1).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(insert(&repository, "second").await.id, Some(2));
    }

    #[tokio::test]
    async fn test_find_all_is_in_id_order() {
        let repository = InMemoryEventRepository::new();
        for name in ["a", "b", "c"] {
            insert(&repository, name).await;
        }

        let mut tx = repository.begin(TxMode::ReadOnly).await.unwrap();
        let names: Vec<_> = tx
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|event| event.name)
            .collect();

        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_save_with_id_overwrites_row() {
        let repository = InMemoryEventRepository::new();
        let mut saved = insert(&repository, "before").await;
        saved.name = "after".to_string();

        let mut tx = repository.begin(TxMode::ReadWrite).await.unwrap();
        tx.save(saved.clone()).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = repository.begin(TxMode::ReadOnly).await.unwrap();
        assert_eq!(tx.find_by_id(1).await.unwrap(), Some(saved));
        assert_eq!(tx.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_fails() {
        let repository = InMemoryEventRepository::new();
        let mut event = sample("ghost");
        event.id = Some(42);

        let mut tx = repository.begin(TxMode::ReadWrite).await.unwrap();
        let result = tx.save(event).await;

        assert!(matches!(result, Err(RepositoryError::MissingRow(42))));
    }

    #[tokio::test]
    async fn test_uncommitted_changes_are_discarded() {
        let repository = InMemoryEventRepository::new();

        {
            let mut tx = repository.begin(TxMode::ReadWrite).await.unwrap();
            tx.save(sample("dropped")).await.unwrap();
        }

        let mut tx = repository.begin(TxMode::ReadOnly).await.unwrap();
        assert!(tx.find_all().await.unwrap().is_empty());
        assert!(!tx.exists_by_id(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_read_only_unit_rejects_writes() {
        let repository = InMemoryEventRepository::new();

        let mut tx = repository.begin(TxMode::ReadOnly).await.unwrap();

        assert!(matches!(
            tx.save(sample("nope")).await,
            Err(RepositoryError::ReadOnly)
        ));
        assert!(matches!(tx.delete_by_id(1).await, Err(RepositoryError::ReadOnly)));
    }

    #[tokio::test]
    async fn test_delete_of_missing_id_is_a_no_op() {
        let repository = InMemoryEventRepository::new();

        let mut tx = repository.begin(TxMode::ReadWrite).await.unwrap();
        assert!(tx.delete_by_id(9).await.is_ok());
    }
}
