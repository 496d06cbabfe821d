//! Terminal helpers for the hazardline CLI
//!
//! - Status lines and error reports
//! - Distance, age and duration formatting
//! - A spinner while sources are fetched

#![warn(missing_docs)]

pub mod output;
pub mod progress;
