use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    BillOccurrence, BillSeries, EditScope, NewSeriesData, OccurrencePatch,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

// Re-export domain modules
pub mod edits;
pub mod materialization;
pub mod occurrences;
pub mod series;

// Traits are defined in this module and implemented in respective domain modules

/// Durable storage for recurring-bill definitions.
#[async_trait]
pub trait SeriesRepository {
    async fn insert_series(&self, series: &BillSeries) -> Result<(), CoreError>;
    async fn find_series_by_id(&self, id: Uuid) -> Result<Option<BillSeries>, CoreError>;
    /// Series whose `deleted_from` boundary is null or strictly after `date`.
    async fn find_series_active_as_of(&self, date: NaiveDate) -> Result<Vec<BillSeries>, CoreError>;
    async fn set_deleted_from(&self, series_id: Uuid, date: NaiveDate) -> Result<(), CoreError>;
}

/// Durable storage for dated bill occurrences. All reads exclude
/// soft-deleted rows unless stated otherwise.
#[async_trait]
pub trait OccurrenceRepository {
    /// Fails with [`CoreError::DuplicateOccurrence`] when a live row for
    /// the same (series, due date) already exists.
    async fn insert_occurrence(&self, occurrence: &BillOccurrence) -> Result<(), CoreError>;
    async fn find_occurrence_by_id(&self, id: Uuid) -> Result<Option<BillOccurrence>, CoreError>;
    async fn find_occurrences_in_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BillOccurrence>, CoreError>;
    async fn soft_delete_occurrence(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Lazy window materialization: expands series into persisted occurrence
/// rows on demand.
#[async_trait]
pub trait MaterializationRepository {
    /// Creates a series and materializes its anchor month, returning the
    /// series together with that initial window.
    async fn create_series(
        &self,
        data: NewSeriesData,
    ) -> Result<(BillSeries, Vec<BillOccurrence>), CoreError>;
    /// Guarantees every active occurrence of the month named by a
    /// `YYYY-MM` token is persisted, then returns the full window.
    async fn ensure_month(&self, month_token: &str) -> Result<Vec<BillOccurrence>, CoreError>;
}

/// Split-point edits: "this occurrence" versus "this and all future".
#[async_trait]
pub trait EditRepository {
    async fn update_occurrence(
        &self,
        id: Uuid,
        patch: OccurrencePatch,
        scope: EditScope,
    ) -> Result<Vec<BillOccurrence>, CoreError>;
    /// Soft-deletes; returns the number of occurrences affected.
    async fn delete_occurrence(&self, id: Uuid, scope: EditScope) -> Result<u64, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository:
    SeriesRepository + OccurrenceRepository + MaterializationRepository + EditRepository
{
}

/// SQLite implementation of the repository pattern. Holds nothing but the
/// injected pool; all state lives in storage.
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
