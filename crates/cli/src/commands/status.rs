// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relay status|health|logs|routing` — daemon-wide read-only views.

use anyhow::Result;

use crate::client::ApiClient;
use crate::output::{emit, OutputFormat};

pub async fn status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let value = client.get("/status").await?;
    emit(format, &value, |v| {
        println!("uptime:       {}s", v.get("uptime_seconds").and_then(|n| n.as_u64()).unwrap_or(0));
        println!("agents:       {}", v.get("agents_total").and_then(|n| n.as_u64()).unwrap_or(0));
        if let Some(counts) = v.get("counts").and_then(|c| c.as_object()) {
            println!("tasks:");
            for (status, count) in counts {
                println!("  {status:<10} {count}");
            }
        }
    });
    Ok(())
}

pub async fn health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let value = client.get("/health").await?;
    emit(format, &value, |v| {
        let ollama = v.get("ollama").and_then(|b| b.as_bool()).unwrap_or(false);
        println!("ollama:       {}", if ollama { "up" } else { "down" });
        println!("agents:       {} active / {} idle", v.get("agents_active").and_then(|n| n.as_u64()).unwrap_or(0), v.get("agents_idle").and_then(|n| n.as_u64()).unwrap_or(0));
        println!("tasks total:  {}", v.get("tasks_total").and_then(|n| n.as_u64()).unwrap_or(0));
    });
    Ok(())
}

pub async fn logs(client: &ApiClient, format: OutputFormat, limit: usize) -> Result<()> {
    let value = client.get(&format!("/logs?limit={limit}")).await?;
    emit(format, &value, |v| {
        for line in v.as_array().into_iter().flatten().filter_map(|l| l.as_str()) {
            println!("{line}");
        }
    });
    Ok(())
}

pub async fn routing(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let value = client.get("/routing").await?;
    emit(format, &value, |v| {
        for (task_type, rule) in v.as_object().into_iter().flatten() {
            let agent = rule.get("agent_name").and_then(|s| s.as_str()).unwrap_or("-");
            let bridge = rule.get("bridge").and_then(|s| s.as_str()).unwrap_or("-");
            println!("{task_type:<16} -> {agent} ({bridge})");
        }
    });
    Ok(())
}
