//! Grist Manager Library
//!
//! Core modules for the Grist Manager development control plane.

pub mod api;
pub mod server;

// Re-export for convenience
pub use server::{create_router, AppState, ServerConfig};
