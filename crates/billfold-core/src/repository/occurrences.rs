use crate::error::CoreError;
use crate::models::{BillOccurrence, OccurrencePatch};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::OccurrenceRepository for SqliteRepository {
    async fn insert_occurrence(&self, occurrence: &BillOccurrence) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;
        Self::insert_occurrence_in_transaction(&mut tx, occurrence).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_occurrence_by_id(&self, id: Uuid) -> Result<Option<BillOccurrence>, CoreError> {
        let occurrence = sqlx::query_as("SELECT * FROM bill_occurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(occurrence)
    }

    async fn find_occurrences_in_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BillOccurrence>, CoreError> {
        let occurrences = sqlx::query_as(
            r#"SELECT * FROM bill_occurrences
            WHERE deleted = 0 AND due_on BETWEEN $1 AND $2
            ORDER BY due_on, name"#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;
        Ok(occurrences)
    }

    async fn soft_delete_occurrence(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE bill_occurrences SET deleted = 1, updated_at = $1 WHERE id = $2 AND deleted = 0",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl SqliteRepository {
    /// Insert an occurrence within an existing transaction, mapping the
    /// (series, due date) unique-index violation to `DuplicateOccurrence`.
    pub(crate) async fn insert_occurrence_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        occurrence: &BillOccurrence,
    ) -> Result<(), CoreError> {
        let result = sqlx::query(
            r#"INSERT INTO bill_occurrences (id, series_id, due_on, name, amount, paid, paid_on, status, deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(occurrence.id)
        .bind(occurrence.series_id)
        .bind(occurrence.due_on)
        .bind(&occurrence.name)
        .bind(occurrence.amount)
        .bind(occurrence.paid)
        .bind(occurrence.paid_on)
        .bind(occurrence.status)
        .bind(occurrence.deleted)
        .bind(occurrence.created_at)
        .bind(occurrence.updated_at)
        .execute(&mut **tx)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if CoreError::is_unique_violation(&err) => {
                Err(CoreError::DuplicateOccurrence {
                    series_id: occurrence.series_id,
                    due_on: occurrence.due_on,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Find an occurrence by id within an existing transaction
    pub(crate) async fn find_occurrence_by_id_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        id: Uuid,
    ) -> Result<Option<BillOccurrence>, CoreError> {
        let occurrence = sqlx::query_as("SELECT * FROM bill_occurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(occurrence)
    }

    /// Apply a patch to a single occurrence within an existing transaction.
    /// `Some` fields overwrite, `None` fields keep the stored value.
    pub(crate) async fn update_occurrence_fields<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        id: Uuid,
        patch: &OccurrencePatch,
    ) -> Result<(), CoreError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE bill_occurrences SET ");
        let mut updated = false;

        if let Some(name) = &patch.name {
            qb.push("name = ");
            qb.push_bind(name);
            updated = true;
        }

        if let Some(amount) = patch.amount {
            if updated {
                qb.push(", ");
            }
            qb.push("amount = ");
            qb.push_bind(amount);
            updated = true;
        }

        if let Some(due_on) = patch.due_on {
            if updated {
                qb.push(", ");
            }
            qb.push("due_on = ");
            qb.push_bind(due_on);
            updated = true;
        }

        if let Some(paid) = patch.paid {
            if updated {
                qb.push(", ");
            }
            qb.push("paid = ");
            qb.push_bind(paid);
            updated = true;
        }

        if let Some(paid_on) = &patch.paid_on {
            if updated {
                qb.push(", ");
            }
            qb.push("paid_on = ");
            qb.push_bind(*paid_on);
            updated = true;
        }

        if let Some(status) = patch.status {
            if updated {
                qb.push(", ");
            }
            qb.push("status = ");
            qb.push_bind(status);
        }

        qb.push(", updated_at = ");
        qb.push_bind(Utc::now());
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND deleted = 0");

        let result = qb.build().execute(&mut **tx).await;
        match result {
            Ok(done) if done.rows_affected() == 0 => Err(CoreError::NotFound(id.to_string())),
            Ok(_) => Ok(()),
            Err(err) if CoreError::is_unique_violation(&err) => {
                // Only a due-date move can collide: the patched row would
                // share (series_id, due_on) with another live occurrence.
                let current = Self::find_occurrence_by_id_in_transaction(tx, id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
                Err(CoreError::DuplicateOccurrence {
                    series_id: current.series_id,
                    due_on: patch.due_on.unwrap_or(current.due_on),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a patch (never including `due_on`) to every live occurrence of
    /// `series_id` due on or after `from_date`. Returns rows affected.
    pub(crate) async fn update_occurrences_from_date<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        series_id: Uuid,
        from_date: NaiveDate,
        patch: &OccurrencePatch,
    ) -> Result<u64, CoreError> {
        debug_assert!(patch.due_on.is_none(), "ranged updates must not move due dates");
        if patch.is_empty() {
            return Ok(0);
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE bill_occurrences SET ");
        let mut updated = false;

        if let Some(name) = &patch.name {
            qb.push("name = ");
            qb.push_bind(name);
            updated = true;
        }

        if let Some(amount) = patch.amount {
            if updated {
                qb.push(", ");
            }
            qb.push("amount = ");
            qb.push_bind(amount);
            updated = true;
        }

        if let Some(paid) = patch.paid {
            if updated {
                qb.push(", ");
            }
            qb.push("paid = ");
            qb.push_bind(paid);
            updated = true;
        }

        if let Some(paid_on) = &patch.paid_on {
            if updated {
                qb.push(", ");
            }
            qb.push("paid_on = ");
            qb.push_bind(*paid_on);
            updated = true;
        }

        if let Some(status) = patch.status {
            if updated {
                qb.push(", ");
            }
            qb.push("status = ");
            qb.push_bind(status);
        }

        qb.push(", updated_at = ");
        qb.push_bind(Utc::now());
        qb.push(" WHERE series_id = ");
        qb.push_bind(series_id);
        qb.push(" AND due_on >= ");
        qb.push_bind(from_date);
        qb.push(" AND deleted = 0");

        let result = qb.build().execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }

    /// Soft-delete every live occurrence of `series_id` due on or after
    /// `from_date`. Returns rows affected.
    pub(crate) async fn soft_delete_occurrences_from_date<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        series_id: Uuid,
        from_date: NaiveDate,
    ) -> Result<u64, CoreError> {
        let result = sqlx::query(
            r#"UPDATE bill_occurrences SET deleted = 1, updated_at = $1
            WHERE series_id = $2 AND due_on >= $3 AND deleted = 0"#,
        )
        .bind(Utc::now())
        .bind(series_id)
        .bind(from_date)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Live occurrences of one series inside a window, within a transaction.
    pub(crate) async fn find_series_occurrences_from_date<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        series_id: Uuid,
        from_date: NaiveDate,
    ) -> Result<Vec<BillOccurrence>, CoreError> {
        let occurrences = sqlx::query_as(
            r#"SELECT * FROM bill_occurrences
            WHERE series_id = $1 AND due_on >= $2 AND deleted = 0
            ORDER BY due_on"#,
        )
        .bind(series_id)
        .bind(from_date)
        .fetch_all(&mut **tx)
        .await?;
        Ok(occurrences)
    }
}
