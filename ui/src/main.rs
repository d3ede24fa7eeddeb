//! Grist Manager UI Entry Point
//!
//! This is the main entry point for the Grist Manager WASM application.
//! It reads the embedded configuration, initializes logging and mounts the
//! Leptos app to the DOM.

use grist_manager_ui::config::UiConfig;
use grist_manager_ui::App;
use leptos::*;
use tracing_wasm::WASMLayerConfigBuilder;

fn main() {
    let (config, config_error) = match UiConfig::embedded() {
        Ok(config) => (config, None),
        Err(e) => (UiConfig::default(), Some(e)),
    };

    // Initialize WASM tracing
    let tracing_config = WASMLayerConfigBuilder::default()
        .set_max_level(config.max_level())
        .build();
    tracing_wasm::set_as_global_default_with_config(tracing_config);

    if let Some(e) = config_error {
        tracing::warn!("{}; using defaults", e);
    }
    tracing::info!(backend = ?config.backend, "Starting Grist Manager UI");

    // Mount the app
    mount_to_body(move || view! { <App config=config.clone() /> });
}
