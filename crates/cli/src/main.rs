//! Clinicq CLI - Command-line client for the Clinicq queue daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "clinicq")]
#[command(about = "Clinicq department queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "CLINICQ_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an entity into a department queue
    CheckIn {
        /// Department (e.g. cardiology)
        #[arg(short, long)]
        department: String,

        /// Entity (patient) identifier
        entity_id: String,

        /// Priority: emergency, high, medium or low
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },

    /// Call the next waiting entity
    CallNext {
        #[arg(short, long)]
        department: String,
    },

    /// Show an entity's ticket, position and estimate
    Status {
        #[arg(short, long)]
        department: String,

        entity_id: String,
    },

    /// Set a department's average service time (minutes)
    Configure {
        #[arg(short, long)]
        department: String,

        #[arg(short, long)]
        average_wait_time: f64,
    },

    /// List queues (all departments unless one is given)
    List {
        #[arg(short, long)]
        department: Option<String>,
    },

    /// Mark an entity's entry as completed
    Complete {
        #[arg(short, long)]
        department: String,

        entity_id: String,
    },

    /// Mark a waiting entity as a no-show
    NoShow {
        #[arg(short, long)]
        department: String,

        entity_id: String,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct CheckInResult {
    department: String,
    ticket_number: u64,
    position: Option<usize>,
    estimated_wait_time: u32,
    already_checked_in: bool,
}

#[derive(Deserialize)]
struct StatusResult {
    ticket_number: u64,
    status: String,
    priority: String,
    estimated_wait_time: u32,
    position: Option<usize>,
    check_in_time: i64,
}

#[derive(Deserialize)]
struct SnapshotEntry {
    entity_id: String,
    ticket_number: u64,
    priority: String,
    status: String,
    estimated_wait_time: u32,
    position: Option<usize>,
}

#[derive(Deserialize)]
struct SnapshotStats {
    waiting: usize,
    in_progress: usize,
    completed: usize,
    no_show: usize,
}

#[derive(Deserialize)]
struct Snapshot {
    department: String,
    current_number: u64,
    average_wait_time: u32,
    stats: SnapshotStats,
    entries: Vec<SnapshotEntry>,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Ticket")]
    ticket: u64,
    #[tabled(rename = "Entity")]
    entity_id: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Est. wait (min)")]
    estimated_wait_time: u32,
}

fn position_label(position: Option<usize>) -> String {
    position.map_or_else(|| "-".to_string(), |p| p.to_string())
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn print_status(entity_id: &str, status: StatusResult) {
    println!("  {} {}", "Entity:".bold(), entity_id);
    println!("  {} {}", "Ticket:".bold(), status.ticket_number);
    println!("  {} {}", "Status:".bold(), status.status);
    println!("  {} {}", "Priority:".bold(), status.priority);
    println!("  {} {}", "Position:".bold(), position_label(status.position));
    println!(
        "  {} {} min",
        "Est. wait:".bold(),
        status.estimated_wait_time
    );
    if let Some(at) = chrono::DateTime::from_timestamp_millis(status.check_in_time) {
        println!("  {} {}", "Checked in:".bold(), at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckIn {
            department,
            entity_id,
            priority,
        } => {
            let params = json!({
                "department": department,
                "entity_id": entity_id,
                "priority": priority,
            });

            let result = call_rpc(&cli.rpc_url, "queue.check_in.v1", params).await?;
            let res: CheckInResult = serde_json::from_value(result)?;

            if res.already_checked_in {
                println!("{}", "• Already checked in".yellow().bold());
            } else {
                println!("{}", "✓ Checked in".green().bold());
            }
            println!();
            println!("  {} {}", "Department:".bold(), res.department);
            println!("  {} {}", "Ticket:".bold(), res.ticket_number);
            println!("  {} {}", "Position:".bold(), position_label(res.position));
            println!("  {} {} min", "Est. wait:".bold(), res.estimated_wait_time);
        }

        Commands::CallNext { department } => {
            let params = json!({ "department": department });
            let result = call_rpc(&cli.rpc_url, "queue.call_next.v1", params).await?;

            println!(
                "{}",
                format!(
                    "✓ Now serving ticket {} ({}, {})",
                    result["ticket_number"],
                    result["entity_id"].as_str().unwrap_or("?"),
                    result["priority"].as_str().unwrap_or("?"),
                )
                .green()
                .bold()
            );
        }

        Commands::Status {
            department,
            entity_id,
        } => {
            let params = json!({ "department": department, "entity_id": entity_id });
            let result = call_rpc(&cli.rpc_url, "queue.status.v1", params).await?;
            let status: StatusResult = serde_json::from_value(result)?;

            println!("{}", format!("Queue status ({})", department).cyan().bold());
            println!();
            print_status(&entity_id, status);
        }

        Commands::Configure {
            department,
            average_wait_time,
        } => {
            let params = json!({
                "department": department,
                "average_wait_time": average_wait_time,
            });
            let result = call_rpc(&cli.rpc_url, "queue.configure.v1", params).await?;
            let snapshot: Snapshot = serde_json::from_value(result)?;

            println!(
                "{}",
                format!(
                    "✓ {} average wait set to {} min",
                    snapshot.department, snapshot.average_wait_time
                )
                .green()
                .bold()
            );
        }

        Commands::List { department } => {
            let params = json!({ "department": department });
            let result = call_rpc(&cli.rpc_url, "queue.list.v1", params).await?;
            let snapshots: Vec<Snapshot> = serde_json::from_value(result)?;

            if snapshots.is_empty() {
                println!("{}", "No department queues".yellow());
            }

            for snapshot in snapshots {
                println!(
                    "{} {}",
                    snapshot.department.cyan().bold(),
                    format!(
                        "(avg {} min, last ticket {})",
                        snapshot.average_wait_time, snapshot.current_number
                    )
                    .dimmed()
                );
                println!(
                    "  waiting {} · in progress {} · completed {} · no-show {}",
                    snapshot.stats.waiting,
                    snapshot.stats.in_progress,
                    snapshot.stats.completed,
                    snapshot.stats.no_show
                );

                let rows: Vec<EntryRow> = snapshot
                    .entries
                    .into_iter()
                    .map(|e| EntryRow {
                        ticket: e.ticket_number,
                        entity_id: e.entity_id,
                        priority: e.priority,
                        status: e.status,
                        position: position_label(e.position),
                        estimated_wait_time: e.estimated_wait_time,
                    })
                    .collect();

                if !rows.is_empty() {
                    println!("{}", Table::new(rows));
                }
                println!();
            }
        }

        Commands::Complete {
            department,
            entity_id,
        } => {
            let params = json!({
                "department": department,
                "entity_id": entity_id,
                "status": "completed",
            });
            call_rpc(&cli.rpc_url, "queue.update_status.v1", params).await?;
            println!("{}", format!("✓ {} completed", entity_id).green().bold());
        }

        Commands::NoShow {
            department,
            entity_id,
        } => {
            let params = json!({
                "department": department,
                "entity_id": entity_id,
                "status": "no-show",
            });
            call_rpc(&cli.rpc_url, "queue.update_status.v1", params).await?;
            println!("{}", format!("✓ {} marked as no-show", entity_id).yellow().bold());
        }
    }

    Ok(())
}
