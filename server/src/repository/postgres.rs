use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::{EventRepository, EventTransaction, RepositoryError, TxMode};
use crate::models::Event;

/// PostgreSQL-backed store. One SQL transaction per unit of work.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn EventTransaction>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        if mode == TxMode::ReadOnly {
            sqlx::query("SET TRANSACTION READ ONLY")
                .execute(&mut *tx)
                .await?;
        }
        Ok(Box::new(PgEventTransaction { tx, mode }))
    }
}

struct PgEventTransaction {
    tx: Transaction<'static, Postgres>,
    mode: TxMode,
}

impl PgEventTransaction {
    // Read-write units lock the row they look at so a concurrent writer
    // cannot change or remove it before this unit commits.
    fn locks_rows(&self) -> bool {
        self.mode == TxMode::ReadWrite
    }
}

#[async_trait]
impl EventTransaction for PgEventTransaction {
    async fn find_all(&mut self) -> Result<Vec<Event>, RepositoryError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, description, start_time, end_time, location, capacity
            FROM events
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(events)
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<Event>, RepositoryError> {
        let sql = if self.locks_rows() {
            r#"
            SELECT id, name, description, start_time, end_time, location, capacity
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#
        } else {
            r#"
            SELECT id, name, description, start_time, end_time, location, capacity
            FROM events
            WHERE id = $1
            "#
        };

        let event = sqlx::query_as::<_, Event>(sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(event)
    }

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, RepositoryError> {
        let sql = if self.locks_rows() {
            "SELECT id FROM events WHERE id = $1 FOR UPDATE"
        } else {
            "SELECT id FROM events WHERE id = $1"
        };

        let found = sqlx::query_scalar::<_, i64>(sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(found.is_some())
    }

    async fn save(&mut self, event: Event) -> Result<Event, RepositoryError> {
        match event.id {
            None => {
                let saved = sqlx::query_as::<_, Event>(
                    r#"
                    INSERT INTO events (name, description, start_time, end_time, location, capacity)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING id, name, description, start_time, end_time, location, capacity
                    "#,
                )
                .bind(&event.name)
                .bind(&event.description)
                .bind(event.start_time)
                .bind(event.end_time)
                .bind(&event.location)
                .bind(event.capacity)
                .fetch_one(&mut *self.tx)
                .await?;

                Ok(saved)
            }
            Some(id) => sqlx::query_as::<_, Event>(
                r#"
                UPDATE events
                SET name = $1, description = $2, start_time = $3, end_time = $4,
                    location = $5, capacity = $6
                WHERE id = $7
                RETURNING id, name, description, start_time, end_time, location, capacity
                "#,
            )
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(&event.location)
            .bind(event.capacity)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(RepositoryError::MissingRow(id)),
        }
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let PgEventTransaction { tx, .. } = *self;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    fn sample(name: &str) -> Event {
        let start = Local::now().naive_local() + Duration::days(30);
        Event {
            id: None,
            name: name.to_string(),
            description: "Talk".to_string(),
            start_time: start,
            end_time: start + Duration::hours(2),
            location: "Hall A".to_string(),
            capacity: 50,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_save_find_and_delete(pool: PgPool) {
        let repository = PgEventRepository::new(pool);

        let mut tx = repository.begin(TxMode::ReadWrite).await.unwrap();
        let saved = tx.save(sample("Demo")).await.unwrap();
        tx.commit().await.unwrap();
        let id = saved.id.unwrap();

        let mut tx = repository.begin(TxMode::ReadOnly).await.unwrap();
        assert_eq!(tx.find_by_id(id).await.unwrap(), Some(saved.clone()));
        assert!(tx.exists_by_id(id).await.unwrap());
        tx.commit().await.unwrap();

        let mut tx = repository.begin(TxMode::ReadWrite).await.unwrap();
        tx.delete_by_id(id).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = repository.begin(TxMode::ReadOnly).await.unwrap();
        assert!(!tx.exists_by_id(id).await.unwrap());
        assert!(tx.find_all().await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_read_only_unit_rejects_writes(pool: PgPool) {
        let repository = PgEventRepository::new(pool);

        let mut tx = repository.begin(TxMode::ReadOnly).await.unwrap();
        let result = tx.save(sample("Demo")).await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}
