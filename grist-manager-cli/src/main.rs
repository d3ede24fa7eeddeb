//! Grist Manager - development control plane
//!
//! Serves the instance API (and optionally the built dashboard) from an
//! in-memory store, and offers admin subcommands against a running server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;

use grist_manager::server::{self, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "grist-manager")]
#[command(author = "Grist Manager Team")]
#[command(version)]
#[command(about = "Manage Grist omnibus deployments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Grist Manager server URL for admin commands
    #[arg(long, default_value = "http://localhost:8080", env = "GRIST_MANAGER_URL", global = true)]
    url: String,

    /// Options for `serve`, also used when no subcommand is given
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Port for the API and web UI
    #[arg(short, long, default_value = "8080", env = "GRIST_MANAGER_PORT", global = true)]
    port: u16,

    /// Directory with the built UI (index.html and wasm bundle)
    #[arg(long, env = "GRIST_MANAGER_UI_DIR", global = true)]
    ui_dir: Option<PathBuf>,

    /// Start with an empty store instead of the demo instances
    #[arg(long, global = true)]
    no_seed: bool,

    /// Artificial delay before every API call, in milliseconds
    #[arg(long, default_value = "0", global = true)]
    latency_ms: u64,

    /// Open the dashboard in a browser once the server is up
    #[arg(long, global = true)]
    open: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the API and web UI (the default)
    Serve,

    /// Manage instances on a running server
    Instances {
        #[command(subcommand)]
        command: cli::InstanceCommands,
    },

    /// Show deployment logs from a running server
    Logs {
        /// Only show logs for this instance
        #[arg(short, long)]
        instance: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = cli::OutputFormat::Table)]
        format: cli::OutputFormat,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the -v level
    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli_client = cli::CliClient::new(&cli.url);

    match cli.command {
        Some(Commands::Serve) | None => serve(cli.serve).await?,
        Some(Commands::Instances { command }) => command.execute(&cli_client).await?,
        Some(Commands::Logs { instance, format }) => {
            cli::list_logs(&cli_client, instance.as_deref(), format).await?;
        }
        Some(Commands::Version) => {
            println!("Grist Manager {}", env!("CARGO_PKG_VERSION"));
            println!("Admin dashboard for Grist omnibus deployments");
        }
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting Grist Manager...");

    let config = ServerConfig {
        port: args.port,
        ui_dir: args.ui_dir,
        seed: !args.no_seed,
        latency: Duration::from_millis(args.latency_ms),
    };
    let server_handle = server::start_server(&config).await?;

    let ui_url = format!("http://127.0.0.1:{}", config.port);
    if args.open {
        info!("Opening browser...");
        if let Err(e) = open::that(&ui_url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    info!("Grist Manager is running at {}", ui_url);
    info!("Press Ctrl+C to stop");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
        result = server_handle => {
            match result {
                Ok(Err(e)) => tracing::error!("{}", e),
                Err(e) => tracing::error!("Server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
    }

    info!("Grist Manager stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_flags_without_subcommand() {
        let cli = Cli::try_parse_from(["grist-manager", "--port", "9000", "--no-seed"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.serve.port, 9000);
        assert!(cli.serve.no_seed);
    }

    #[test]
    fn test_serve_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["grist-manager", "serve", "--port", "9001", "--latency-ms", "250"])
                .unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.serve.port, 9001);
        assert_eq!(cli.serve.latency_ms, 250);
    }

    #[test]
    fn test_ui_dir_falls_back_to_env_without_subcommand() {
        std::env::set_var("GRIST_MANAGER_UI_DIR", "/srv/grist-ui");
        let cli = Cli::try_parse_from(["grist-manager"]).unwrap();
        std::env::remove_var("GRIST_MANAGER_UI_DIR");

        assert!(cli.command.is_none());
        assert_eq!(cli.serve.ui_dir, Some(PathBuf::from("/srv/grist-ui")));
    }
}
