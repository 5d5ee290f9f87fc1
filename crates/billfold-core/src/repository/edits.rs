use crate::dates::add_days;
use crate::error::CoreError;
use crate::models::{BillOccurrence, EditScope, OccurrencePatch};
use crate::repository::{OccurrenceRepository, SqliteRepository};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl super::EditRepository for SqliteRepository {
    async fn update_occurrence(
        &self,
        id: Uuid,
        patch: OccurrencePatch,
        scope: EditScope,
    ) -> Result<Vec<BillOccurrence>, CoreError> {
        if patch.is_empty() {
            return Err(CoreError::InvalidInput("Update patch contains no fields".to_string()));
        }
        if scope == EditScope::ThisAndFuture && patch.due_on.is_some() {
            // Shifting a whole suffix would re-derive every date and race
            // the (series, due date) uniqueness constraint.
            return Err(CoreError::InvalidInput(
                "Due date cannot be changed for this and future occurrences".to_string(),
            ));
        }
        if let Some(amount) = patch.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(CoreError::InvalidInput(format!(
                    "Amount must be non-negative, got {}",
                    amount
                )));
            }
        }

        let mut tx = self.pool().begin().await?;

        let target = Self::find_occurrence_by_id_in_transaction(&mut tx, id)
            .await?
            .filter(|o| !o.deleted)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let updated = match scope {
            EditScope::ThisOccurrence => {
                Self::update_occurrence_fields(&mut tx, id, &patch).await?;
                let occurrence = Self::find_occurrence_by_id_in_transaction(&mut tx, id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
                vec![occurrence]
            }
            EditScope::ThisAndFuture => {
                Self::update_occurrences_from_date(&mut tx, target.series_id, target.due_on, &patch)
                    .await?;
                // Freeze the series at the edit point: the definition no
                // longer reflects reality past it, so the generator must
                // never re-materialize stale pre-edit values here.
                let boundary = add_days(target.due_on, 1)?;
                Self::set_deleted_from_in_transaction(&mut tx, target.series_id, boundary).await?;
                Self::find_series_occurrences_from_date(&mut tx, target.series_id, target.due_on)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_occurrence(&self, id: Uuid, scope: EditScope) -> Result<u64, CoreError> {
        match scope {
            EditScope::ThisOccurrence => {
                self.soft_delete_occurrence(id).await?;
                Ok(1)
            }
            EditScope::ThisAndFuture => {
                let mut tx = self.pool().begin().await?;

                let target = Self::find_occurrence_by_id_in_transaction(&mut tx, id)
                    .await?
                    .filter(|o| !o.deleted)
                    .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

                let deleted = Self::soft_delete_occurrences_from_date(
                    &mut tx,
                    target.series_id,
                    target.due_on,
                )
                .await?;
                let boundary = add_days(target.due_on, 1)?;
                Self::set_deleted_from_in_transaction(&mut tx, target.series_id, boundary).await?;

                tx.commit().await?;
                Ok(deleted)
            }
        }
    }
}
