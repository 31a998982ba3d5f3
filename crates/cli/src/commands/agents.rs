// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relay agents|agent <name>` — registry views.

use anyhow::Result;

use crate::client::ApiClient;
use crate::output::{emit, OutputFormat};
use crate::table::{Column, Table};

pub async fn list(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let value = client.get("/agents").await?;
    emit(format, &value, |v| {
        let mut table = Table::new(vec![
            Column::left("NAME"),
            Column::status("STATUS"),
            Column::left("BRIDGE"),
            Column::muted("TASK"),
        ]);
        for agent in v.get("agents").and_then(|a| a.as_array()).into_iter().flatten() {
            table.row(vec![
                agent.get("name").and_then(|s| s.as_str()).unwrap_or("").to_string(),
                agent.get("status").and_then(|s| s.as_str()).unwrap_or("").to_string(),
                agent.get("bridge_type").and_then(|s| s.as_str()).unwrap_or("").to_string(),
                agent.get("current_task").and_then(|s| s.as_str()).unwrap_or("-").to_string(),
            ]);
        }
        table.render(&mut std::io::stdout());
    });
    Ok(())
}

pub async fn get(client: &ApiClient, format: OutputFormat, name: &str) -> Result<()> {
    let value = client.get(&format!("/agents/{name}")).await?;
    emit(format, &value, |v| {
        println!("name:       {}", v.get("name").and_then(|s| s.as_str()).unwrap_or(""));
        println!("role:       {}", v.get("role").and_then(|s| s.as_str()).unwrap_or(""));
        println!("status:     {}", v.get("status").and_then(|s| s.as_str()).unwrap_or(""));
        println!("bridge:     {}", v.get("bridge_type").and_then(|s| s.as_str()).unwrap_or(""));
        println!("task:       {}", v.get("current_task").and_then(|s| s.as_str()).unwrap_or("-"));
        if let Some(caps) = v.get("capabilities").and_then(|c| c.as_array()) {
            let caps: Vec<&str> = caps.iter().filter_map(|c| c.as_str()).collect();
            println!("capabilities: {}", caps.join(", "));
        }
    });
    Ok(())
}
