//! Data layer for the service reports pipeline.
//!
//! Turns ledger PDF reports into ledger CSVs, reads those CSVs and the
//! session export back as typed records, and builds the bucketed series,
//! pivots and rate tables the reports are made of.

pub mod aggregator;
pub mod artifacts;
pub mod comparison;
pub mod conversion;
pub mod expenses;
pub mod extractor;
pub mod grammar;
pub mod normalizer;
pub mod pdf_text;
pub mod pivot;
pub mod reports;
pub mod sessions;
pub mod team_cost;

pub use reports_core as core;
