//! Layout Components
//!
//! This module contains the core layout components for the Grist Manager UI:
//! - `AppShell` - Main layout container with sidebar, header and content
//! - `Header` - Title bar with notification/settings buttons and "New Instance"
//! - `Sidebar` - Collapsible tab navigation

mod app_shell;
mod header;
mod sidebar;

pub use app_shell::AppShell;
pub use header::Header;
pub use sidebar::Sidebar;
