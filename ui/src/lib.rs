//! Grist Manager UI Library
//!
//! This crate provides the Grist Manager user interface - an admin
//! dashboard for creating, starting, stopping and inspecting Grist
//! instances.
//!
//! # Architecture
//!
//! The UI supports two backends, chosen in `config.toml`:
//! - **Mock**: an in-browser store with simulated latency
//! - **HTTP**: the `/api` routes served by `grist-manager serve`
//!
//! # Modules
//!
//! - [`app`]: Root application component and tab switching
//! - [`client`]: Data-access layer (MockClient, HttpClient)
//! - [`components`]: UI components (dashboard, instances, logs, layout)
//! - [`config`]: Build-time configuration
//! - [`state`]: Global state and the query cache

pub mod app;
pub mod client;
pub mod components;
pub mod config;
pub mod state;

pub use app::App;
