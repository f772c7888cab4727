//! Tally core library
//!
//! Domain models, the database layer, and the pure expense-tracking core:
//! the aggregation engine (`aggregate`), the daily-limit evaluator
//! (`limits`), and amount validation (`money`).

pub mod aggregate;
pub mod db;
pub mod error;
pub mod limits;
pub mod models;
pub mod money;

pub use error::{Error, Result};
