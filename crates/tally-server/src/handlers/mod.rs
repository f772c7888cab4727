//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod expenses;
pub mod goals;

// Re-export all handlers for use in router
pub use analytics::*;
pub use auth::*;
pub use budgets::*;
pub use dashboard::*;
pub use expenses::*;
pub use goals::*;
