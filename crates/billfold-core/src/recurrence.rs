//! The occurrence generator: expands a [`BillSeries`] into dated candidate
//! occurrences.
//!
//! The generator is a pure function over the series definition. It performs
//! no persistence and no duplicate-checking against storage; deduplication
//! is the materializer's job (`repository::materialization`). Keeping it
//! pure means every stepping rule can be tested without a database.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::dates::{add_days, add_months_clamped};
use crate::error::CoreError;
use crate::models::{BillOccurrence, BillSeries, OccurrenceStatus, Recurrence};

/// Expands `series` into ordered candidate occurrences.
///
/// Generation starts at the series anchor date and steps by the recurrence
/// interval until the cursor passes `anchor + horizon_months` months; a
/// date exactly on that boundary is still emitted. A `deleted_from`
/// boundary halts generation before the first date on or after it.
///
/// `Recurrence::None` yields exactly one occurrence (the anchor),
/// regardless of horizon.
///
/// Candidates inherit the series name and amount verbatim and start
/// unpaid, undeleted, and [`OccurrenceStatus::Upcoming`], each with a
/// fresh id.
pub fn generate_occurrences(
    series: &BillSeries,
    horizon_months: u32,
) -> Result<Vec<BillOccurrence>, CoreError> {
    if series.recurrence == Recurrence::None {
        if past_boundary(series, series.anchor_date) {
            return Ok(Vec::new());
        }
        return Ok(vec![candidate(series, series.anchor_date)]);
    }

    let horizon_end = add_months_clamped(series.anchor_date, horizon_months)?;
    let mut occurrences = Vec::new();

    for step in 0u32.. {
        let due_on = step_from_anchor(series.anchor_date, series.recurrence, step)?;
        if due_on > horizon_end || past_boundary(series, due_on) {
            break;
        }
        occurrences.push(candidate(series, due_on));
    }

    Ok(occurrences)
}

/// Date of the `step`-th occurrence. Each step is derived from the anchor
/// rather than the previous date so a clamped month (Jan 31 -> Feb 29)
/// does not drag later occurrences off their day-of-month.
fn step_from_anchor(
    anchor: NaiveDate,
    recurrence: Recurrence,
    step: u32,
) -> Result<NaiveDate, CoreError> {
    match recurrence {
        Recurrence::None => Ok(anchor),
        Recurrence::Weekly => add_days(anchor, 7 * u64::from(step)),
        Recurrence::Monthly => add_months_clamped(anchor, step),
        Recurrence::Yearly => add_months_clamped(anchor, 12 * step),
    }
}

fn past_boundary(series: &BillSeries, due_on: NaiveDate) -> bool {
    matches!(series.deleted_from, Some(boundary) if due_on >= boundary)
}

fn candidate(series: &BillSeries, due_on: NaiveDate) -> BillOccurrence {
    let now = Utc::now();
    BillOccurrence {
        id: Uuid::now_v7(),
        series_id: series.id,
        due_on,
        name: series.name.clone(),
        amount: series.amount,
        paid: false,
        paid_on: None,
        status: OccurrenceStatus::Upcoming,
        deleted: false,
        created_at: now,
        updated_at: now,
    }
}
