use crate::error::CoreError;
use crate::models::BillSeries;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::SeriesRepository for SqliteRepository {
    async fn insert_series(&self, series: &BillSeries) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;
        Self::insert_series_in_transaction(&mut tx, series).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_series_by_id(&self, id: Uuid) -> Result<Option<BillSeries>, CoreError> {
        let series = sqlx::query_as("SELECT * FROM bill_series WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(series)
    }

    async fn find_series_active_as_of(&self, date: NaiveDate) -> Result<Vec<BillSeries>, CoreError> {
        let series = sqlx::query_as(
            r#"SELECT * FROM bill_series
            WHERE deleted_from IS NULL OR deleted_from > $1
            ORDER BY created_at"#,
        )
        .bind(date)
        .fetch_all(self.pool())
        .await?;
        Ok(series)
    }

    async fn set_deleted_from(&self, series_id: Uuid, date: NaiveDate) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;
        Self::set_deleted_from_in_transaction(&mut tx, series_id, date).await?;
        tx.commit().await?;
        Ok(())
    }
}

impl SqliteRepository {
    /// Insert a series within an existing transaction
    pub(crate) async fn insert_series_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        series: &BillSeries,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT INTO bill_series (id, name, amount, anchor_date, recurrence, deleted_from, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(series.id)
        .bind(&series.name)
        .bind(series.amount)
        .bind(series.anchor_date)
        .bind(series.recurrence)
        .bind(series.deleted_from)
        .bind(series.created_at)
        .bind(series.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Move the series' deleted-from boundary within an existing transaction
    pub(crate) async fn set_deleted_from_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        series_id: Uuid,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE bill_series SET deleted_from = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(date)
        .bind(Utc::now())
        .bind(series_id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!(
                "Series with id {} not found",
                series_id
            )));
        }
        Ok(())
    }
}
