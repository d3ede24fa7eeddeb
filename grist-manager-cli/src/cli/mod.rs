//! CLI subcommands for Grist Manager administration
//!
//! Provides commands against a running `grist-manager serve`:
//! - Instances (list, get, start, stop, delete)
//! - Logs (list, optionally for one instance)

use clap::{Subcommand, ValueEnum};
use grist_manager_shared::format::format_uptime;
use grist_manager_shared::{DeploymentLog, ErrorBody, Instance};
use reqwest::{Client, Response};
use std::time::Duration;

/// Base URL for API calls
fn get_api_url(url: &str) -> String {
    format!("{}/api", url.trim_end_matches('/'))
}

/// CLI client for the Grist Manager API
pub struct CliClient {
    client: Client,
    base_url: String,
}

impl CliClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url: get_api_url(base_url),
        }
    }

    fn instance_url(&self, id: &str) -> String {
        format!("{}/instances/{}", self.base_url, id)
    }
}

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Turn an error status into an `anyhow` error carrying the server message
async fn check(resp: Response) -> anyhow::Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => match body.fields {
            Some(fields) => format!("{}: {}", body.error, fields),
            None => body.error,
        },
        Err(_) => "Unknown error".to_string(),
    };
    anyhow::bail!("{} ({})", message, status)
}

// =============================================================================
// Instance Commands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum InstanceCommands {
    /// List all instances
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show one instance
    Get {
        /// Instance ID
        id: String,
    },
    /// Start an instance
    Start {
        /// Instance ID
        id: String,
    },
    /// Stop an instance
    Stop {
        /// Instance ID
        id: String,
    },
    /// Delete an instance
    Delete {
        /// Instance ID
        id: String,
    },
}

impl InstanceCommands {
    pub async fn execute(&self, client: &CliClient) -> anyhow::Result<()> {
        match self {
            InstanceCommands::List { format } => {
                let resp = client
                    .client
                    .get(format!("{}/instances", client.base_url))
                    .send()
                    .await?;
                let instances: Vec<Instance> = check(resp).await?.json().await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&instances)?);
                    }
                    OutputFormat::Table => print_instances(&instances),
                }
                Ok(())
            }
            InstanceCommands::Get { id } => {
                let resp = client.client.get(client.instance_url(id)).send().await?;
                let instance: Instance = check(resp).await?.json().await?;
                println!("{}", serde_json::to_string_pretty(&instance)?);
                Ok(())
            }
            InstanceCommands::Start { id } => {
                let resp = client
                    .client
                    .post(format!("{}/start", client.instance_url(id)))
                    .send()
                    .await?;
                let instance: Instance = check(resp).await?.json().await?;
                println!("Instance {} is {}", instance.name, instance.status);
                Ok(())
            }
            InstanceCommands::Stop { id } => {
                let resp = client
                    .client
                    .post(format!("{}/stop", client.instance_url(id)))
                    .send()
                    .await?;
                let instance: Instance = check(resp).await?.json().await?;
                println!("Instance {} is {}", instance.name, instance.status);
                Ok(())
            }
            InstanceCommands::Delete { id } => {
                let resp = client.client.delete(client.instance_url(id)).send().await?;
                check(resp).await?;
                println!("Instance {} deleted", id);
                Ok(())
            }
        }
    }
}

fn print_instances(instances: &[Instance]) {
    println!(
        "{:<38} {:<24} {:<16} {:<10} {:<10}",
        "ID", "NAME", "TEAM", "STATUS", "UPTIME"
    );
    println!("{}", "-".repeat(100));
    for instance in instances {
        let uptime = instance
            .metrics
            .map(|m| format_uptime(m.uptime))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<38} {:<24} {:<16} {:<10} {:<10}",
            instance.id, instance.name, instance.team, instance.status, uptime
        );
    }
}

// =============================================================================
// Log Commands
// =============================================================================

/// Print deployment logs, newest first
pub async fn list_logs(
    client: &CliClient,
    instance: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut request = client.client.get(format!("{}/logs", client.base_url));
    if let Some(id) = instance {
        request = request.query(&[("instanceId", id)]);
    }
    let logs: Vec<DeploymentLog> = check(request.send().await?).await?.json().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&logs)?),
        OutputFormat::Table => {
            for log in &logs {
                println!(
                    "{} {:<7} {:<11} [{}] {}",
                    log.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    log.level.as_str().to_uppercase(),
                    log.source.as_str(),
                    log.instance_id,
                    log.message
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_strips_trailing_slash() {
        assert_eq!(get_api_url("http://localhost:8080/"), "http://localhost:8080/api");
        assert_eq!(get_api_url("http://localhost:8080"), "http://localhost:8080/api");
    }
}
