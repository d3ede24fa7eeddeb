//! Common/Shared UI Components
//!
//! Reusable components used throughout the application.

mod badges;
mod feedback;
mod icons;

pub use badges::{LogLevelBadge, StatusBadge};
pub use feedback::{EmptyState, QueryError, Spinner, ToastStack};
pub use icons::*;
