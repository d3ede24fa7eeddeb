//! Shared types for the Grist Manager UI and control plane
//!
//! This crate contains everything that does not depend on the browser:
//! - Instance and log data model (the `/api` JSON shape)
//! - Display formatting and create-form validation
//! - Log filtering, dashboard aggregation and the query cache
//! - The canonical in-memory instance store

pub mod error;
pub mod filter;
pub mod format;
pub mod models;
pub mod overview;
pub mod query;
pub mod store;
pub mod validation;

pub use error::{ApiError, ErrorBody, ParseEnumError};
pub use filter::LogFilter;
pub use models::*;
pub use overview::OverviewStats;
pub use query::{QueryCache, QueryKey, QueryState};
pub use store::InstanceStore;
pub use validation::{CreateInstanceForm, FieldErrors};
