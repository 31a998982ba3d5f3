// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relay` — CLI front-end for `relayd`'s `/api/v1` surface (§6).

mod client;
mod color;
mod commands;
mod exit_error;
mod output;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};

use client::ApiClient;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "relay", version, about = "Talk to a running relayd orchestrator")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daemon status overview
    Status,
    /// Daemon and bridge health
    Health,
    /// List all known agents
    Agents,
    /// Show one agent
    Agent { name: String },
    /// List tasks, optionally filtered by status
    Tasks { status: Option<String> },
    /// Show one task
    Task { id: String },
    /// Create a task without dispatching it
    New {
        title: String,
        description: String,
        #[arg(default_value = "medium")]
        priority: String,
    },
    /// Dispatch an existing task
    Dispatch {
        id: String,
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        bridge: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Create and immediately dispatch a task
    Run {
        title: String,
        description: String,
        #[arg(default_value = "medium")]
        priority: String,
        #[arg(long)]
        agent: Option<String>,
    },
    /// Poll an async task for a result
    Poll { id: String },
    /// Reset a task to pending and re-dispatch it
    Retry { id: String },
    /// Cancel a task
    Cancel { id: String },
    /// Re-render `status` every `interval` seconds (default 2)
    Watch { interval: Option<u64> },
    /// Recent audit log entries
    Logs {
        #[arg(default_value = "50")]
        limit: usize,
    },
    /// Show the static routing table
    Routing,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e.downcast_ref::<exit_error::ExitError>().map_or(1, |c| c.code);
        let msg = e.to_string();
        if !msg.is_empty() {
            eprintln!("Error: {msg}");
        }
        std::process::exit(code);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new();
    let format = cli.output;

    dispatch(&cli.command, &client, format).await.map_err(|e| match e.downcast::<client::ClientError>() {
        Ok(client_err) => exit_error::ExitError::new(client_err.exit_code(), client_err.to_string()).into(),
        Err(other) => other,
    })
}

async fn dispatch(command: &Commands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    use commands::{agents, status, tasks, watch};

    match command {
        Commands::Status => status::status(client, format).await,
        Commands::Health => status::health(client, format).await,
        Commands::Agents => agents::list(client, format).await,
        Commands::Agent { name } => agents::get(client, format, name).await,
        Commands::Tasks { status: s } => tasks::list(client, format, s.as_deref()).await,
        Commands::Task { id } => tasks::get(client, format, id).await,
        Commands::New { title, description, priority } => tasks::new(client, format, title, description, priority).await,
        Commands::Dispatch { id, agent, bridge, model } => {
            tasks::dispatch(client, format, id, agent.as_deref(), bridge.as_deref(), model.as_deref()).await
        }
        Commands::Run { title, description, priority, agent } => {
            tasks::run(client, format, title, description, priority, agent.as_deref()).await
        }
        Commands::Poll { id } => tasks::poll(client, format, id).await,
        Commands::Retry { id } => tasks::retry(client, format, id).await,
        Commands::Cancel { id } => tasks::cancel(client, format, id).await,
        Commands::Watch { interval } => watch::run(client, format, interval.unwrap_or(2)).await,
        Commands::Logs { limit } => status::logs(client, format, *limit).await,
        Commands::Routing => status::routing(client, format).await,
    }
}
