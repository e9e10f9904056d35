//! Domain layer for the service reports pipeline.
//!
//! Holds the typed ledger and session records, calendar buckets, the sparse
//! and dense series shapes, the expense-per-hour rate policy, configuration
//! and the shared error type.

pub mod calculations;
pub mod calendar;
pub mod error;
pub mod formatting;
pub mod models;
pub mod series;
pub mod settings;
