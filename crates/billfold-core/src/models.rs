use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// How a bill series repeats, stepping from its anchor date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// A one-off bill: exactly one occurrence at the anchor date.
    None,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence: {0}")]
pub struct ParseRecurrenceError(String);

impl FromStr for Recurrence {
    type Err = ParseRecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Recurrence::None),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "yearly" => Ok(Recurrence::Yearly),
            _ => Err(ParseRecurrenceError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recurrence::None => write!(f, "none"),
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
            Recurrence::Yearly => write!(f, "yearly"),
        }
    }
}

/// User-visible state of a single occurrence. Purely user-set: the core
/// never flips an occurrence to `Missed` on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceStatus {
    Upcoming,
    Completed,
    Missed,
    Skipped,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid occurrence status: {0}")]
pub struct ParseOccurrenceStatusError(String);

impl FromStr for OccurrenceStatus {
    type Err = ParseOccurrenceStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(OccurrenceStatus::Upcoming),
            "completed" => Ok(OccurrenceStatus::Completed),
            "missed" => Ok(OccurrenceStatus::Missed),
            "skipped" => Ok(OccurrenceStatus::Skipped),
            _ => Err(ParseOccurrenceStatusError(s.to_string())),
        }
    }
}

/// A recurring-bill definition. One row per series; occurrences are
/// generated from it lazily and persisted separately.
///
/// After creation the only mutable field is `deleted_from`: the calendar
/// date at and after which the series produces no further occurrences.
/// Series rows are never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillSeries {
    pub id: Uuid,
    pub name: String,
    /// Base amount inherited by generated occurrences. Non-negative.
    pub amount: f64,
    /// Due date of the first occurrence; every later occurrence is
    /// derived by stepping from this date.
    pub anchor_date: NaiveDate,
    pub recurrence: Recurrence,
    pub deleted_from: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One concrete dated instance of a bill, independently payable and
/// editable. Soft-deleted rows stay in storage for history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillOccurrence {
    pub id: Uuid,
    pub series_id: Uuid,
    pub due_on: NaiveDate,
    pub name: String,
    pub amount: f64,
    pub paid: bool,
    /// Meaningful only while `paid` is set.
    pub paid_on: Option<NaiveDate>,
    pub status: OccurrenceStatus,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new bill series.
#[derive(Debug, Clone)]
pub struct NewSeriesData {
    pub name: String,
    pub amount: f64,
    pub anchor_date: NaiveDate,
    pub recurrence: Recurrence,
}

/// Partial update for an occurrence. A `Some` field overwrites the stored
/// value; `None` leaves it untouched. `paid_on` is doubly optional so a
/// paid date can be cleared explicitly.
#[derive(Debug, Clone, Default)]
pub struct OccurrencePatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    /// Only honored with [`EditScope::ThisOccurrence`]; rejected for
    /// future-scope edits before any write happens.
    pub due_on: Option<NaiveDate>,
    pub paid: Option<bool>,
    pub paid_on: Option<Option<NaiveDate>>,
    pub status: Option<OccurrenceStatus>,
}

impl OccurrencePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.due_on.is_none()
            && self.paid.is_none()
            && self.paid_on.is_none()
            && self.status.is_none()
    }
}

/// Scope for editing operations on occurrences of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditScope {
    /// Affect only the selected occurrence.
    ThisOccurrence,
    /// Affect the selected occurrence and every later one of its series.
    ThisAndFuture,
}

impl std::fmt::Display for EditScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditScope::ThisOccurrence => write!(f, "this"),
            EditScope::ThisAndFuture => write!(f, "future"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid edit scope: {0}")]
pub struct ParseEditScopeError(String);

impl FromStr for EditScope {
    type Err = ParseEditScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "this" | "occurrence" => Ok(EditScope::ThisOccurrence),
            "future" | "this_and_future" => Ok(EditScope::ThisAndFuture),
            _ => Err(ParseEditScopeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence_round_trips_through_strings() {
        for value in ["none", "weekly", "monthly", "yearly"] {
            let parsed: Recurrence = value.parse().unwrap();
            assert_eq!(parsed.to_string(), value);
        }
        assert!("fortnightly".parse::<Recurrence>().is_err());
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(
            "Skipped".parse::<OccurrenceStatus>().unwrap(),
            OccurrenceStatus::Skipped
        );
        assert!("paused".parse::<OccurrenceStatus>().is_err());
    }

    #[test]
    fn edit_scope_accepts_both_spellings() {
        assert_eq!("this".parse::<EditScope>().unwrap(), EditScope::ThisOccurrence);
        assert_eq!("future".parse::<EditScope>().unwrap(), EditScope::ThisAndFuture);
        assert!("series".parse::<EditScope>().is_err());
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(OccurrencePatch::default().is_empty());
        let patch = OccurrencePatch {
            amount: Some(12.5),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
