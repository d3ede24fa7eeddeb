//! UI Components
//!
//! This module contains all UI components organized by feature:
//! - `layout`: App shell, header and sidebar
//! - `dashboard`: Overview metrics, recent activity and system health
//! - `instances`: Instance cards and the create-instance form
//! - `logs`: Deployment logs viewer
//! - `common`: Shared/reusable components

pub mod common;
pub mod dashboard;
pub mod instances;
pub mod layout;
pub mod logs;
