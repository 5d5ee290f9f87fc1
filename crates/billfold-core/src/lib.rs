//! # Billfold Core Library
//!
//! A recurring-bill engine: abstract bill definitions ("series") are
//! expanded into concrete dated occurrences, materialized lazily into
//! SQLite the first time a month is queried, and edited with split-point
//! semantics ("this occurrence" vs "this and all future") that never
//! rewrite history.
//!
//! ## Features
//!
//! - **Series-Based Recurrence**: weekly, monthly (short-month clamped),
//!   yearly, or one-off bills stepping from an anchor date
//! - **Lazy Materialization**: occurrence rows are created on first query
//!   of a month window, deduplicated by a (series, due date) uniqueness
//!   constraint, and idempotent to re-run
//! - **Split-Point Edits**: forward-propagating updates and deletes freeze
//!   the series at the edit boundary instead of mutating past occurrences
//! - **Soft Deletes**: paid history survives every delete path
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`repository`]: Data access layer with Repository pattern
//! - [`recurrence`]: Pure occurrence generation from a series definition
//! - [`dates`]: Calendar-date parsing and month arithmetic
//! - [`error`]: Error types with context
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use billfold_core::{
//!     db,
//!     models::{NewSeriesData, Recurrence},
//!     repository::{MaterializationRepository, SqliteRepository},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), billfold_core::error::CoreError> {
//!     let pool = db::establish_connection("bills.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let (series, initial_window) = repo
//!         .create_series(NewSeriesData {
//!             name: "Rent".to_string(),
//!             amount: 1200.0,
//!             anchor_date: billfold_core::dates::parse_date("2024-01-15")?,
//!             recurrence: Recurrence::Monthly,
//!         })
//!         .await?;
//!     println!("{}: {} occurrences this month", series.name, initial_window.len());
//!
//!     // Querying a month materializes whatever it is missing.
//!     let march = repo.ensure_month("2024-03").await?;
//!     println!("March holds {} bills", march.len());
//!
//!     Ok(())
//! }
//! ```

pub mod dates;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
