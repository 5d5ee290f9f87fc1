use crate::dates::{month_bounds, months_between};
use crate::error::CoreError;
use crate::models::{BillOccurrence, BillSeries, NewSeriesData};
use crate::recurrence::generate_occurrences;
use crate::repository::{OccurrenceRepository, SeriesRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

#[async_trait]
impl super::MaterializationRepository for SqliteRepository {
    async fn create_series(
        &self,
        data: NewSeriesData,
    ) -> Result<(BillSeries, Vec<BillOccurrence>), CoreError> {
        if data.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("Series name must not be empty".to_string()));
        }
        if !data.amount.is_finite() || data.amount < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "Series amount must be non-negative, got {}",
                data.amount
            )));
        }

        let now = Utc::now();
        let series = BillSeries {
            id: Uuid::now_v7(),
            name: data.name,
            amount: data.amount,
            anchor_date: data.anchor_date,
            recurrence: data.recurrence,
            deleted_from: None,
            created_at: now,
            updated_at: now,
        };
        self.insert_series(&series).await?;

        // Materialize the anchor month so the caller gets the initial
        // window back with the series.
        let anchor_month = series.anchor_date.format("%Y-%m").to_string();
        let window = self.ensure_month(&anchor_month).await?;
        let own_occurrences = window
            .into_iter()
            .filter(|o| o.series_id == series.id)
            .collect();
        Ok((series, own_occurrences))
    }

    async fn ensure_month(&self, month_token: &str) -> Result<Vec<BillOccurrence>, CoreError> {
        let (first_day, last_day) = month_bounds(month_token)?;

        let existing = self.find_occurrences_in_window(first_day, last_day).await?;
        let active_series = self.find_series_active_as_of(last_day).await?;

        for series in &active_series {
            // Already covered: one live occurrence of the series inside the
            // window means generation ran before (or an edit placed one here).
            if existing.iter().any(|o| o.series_id == series.id) {
                continue;
            }

            let horizon = months_between(series.anchor_date, first_day);
            if horizon < 0 {
                // Series starts after this window.
                continue;
            }

            let candidates = match generate_occurrences(series, horizon as u32 + 1) {
                Ok(candidates) => candidates,
                Err(err) => {
                    // One broken series must not take down the whole window.
                    warn!(series_id = %series.id, error = %err, "skipping series: generation failed");
                    continue;
                }
            };

            for candidate in candidates
                .into_iter()
                .filter(|c| c.due_on >= first_day && c.due_on <= last_day)
            {
                match self.insert_occurrence(&candidate).await {
                    Ok(()) => {}
                    Err(CoreError::DuplicateOccurrence { series_id, due_on }) => {
                        // A concurrent materialization won the race; the row
                        // is there, which is all we wanted.
                        debug!(%series_id, %due_on, "occurrence already materialized");
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        // Read-after-write: return the complete window whether or not any
        // generation ran.
        self.find_occurrences_in_window(first_day, last_day).await
    }
}
