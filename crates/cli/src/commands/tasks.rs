// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relay tasks|task|new|dispatch|run|poll|retry|cancel` — the task lifecycle
//! commands (§6).

use anyhow::Result;
use serde_json::json;

use crate::client::ApiClient;
use crate::output::{emit, OutputFormat};
use crate::table::{Column, Table};

pub async fn list(client: &ApiClient, format: OutputFormat, status: Option<&str>) -> Result<()> {
    let path = match status {
        Some(s) => format!("/tasks?status={s}"),
        None => "/tasks".to_string(),
    };
    let value = client.get(&path).await?;
    emit(format, &value, |v| {
        let mut table = Table::new(vec![
            Column::left("ID"),
            Column::status("STATUS"),
            Column::status("PRIORITY"),
            Column::muted("AGENT"),
            Column::left("TITLE"),
        ]);
        for task in v.as_array().into_iter().flatten() {
            table.row(vec![
                task.get("id").and_then(|s| s.as_str()).unwrap_or("").to_string(),
                task.get("status").and_then(|s| s.as_str()).unwrap_or("").to_string(),
                task.get("priority").and_then(|s| s.as_str()).unwrap_or("").to_string(),
                task.get("assigned_to").and_then(|s| s.as_str()).unwrap_or("-").to_string(),
                task.get("title").and_then(|s| s.as_str()).unwrap_or("").to_string(),
            ]);
        }
        table.render(&mut std::io::stdout());
    });
    Ok(())
}

pub async fn get(client: &ApiClient, format: OutputFormat, id: &str) -> Result<()> {
    let value = client.get(&format!("/tasks/{id}")).await?;
    emit(format, &value, |v| print_task(v));
    Ok(())
}

pub async fn new(client: &ApiClient, format: OutputFormat, title: &str, description: &str, priority: &str) -> Result<()> {
    let body = json!({"title": title, "description": description, "priority": priority, "assigned_to": Option::<&str>::None});
    let value = client.post("/tasks", &body).await?;
    emit(format, &value, |v| print_task(v));
    Ok(())
}

pub async fn dispatch(client: &ApiClient, format: OutputFormat, id: &str, agent: Option<&str>, bridge: Option<&str>, model: Option<&str>) -> Result<()> {
    let body = json!({"agent": agent, "bridge": bridge, "model": model});
    let value = client.post(&format!("/tasks/{id}/dispatch"), &body).await?;
    emit(format, &value, |v| print_dispatch_result(v));
    Ok(())
}

/// `run` is `new` immediately followed by `dispatch`, matching the single
/// round-trip the HTTP surface's `/dispatch` endpoint already performs.
pub async fn run(client: &ApiClient, format: OutputFormat, title: &str, description: &str, priority: &str, agent: Option<&str>) -> Result<()> {
    let body = json!({"title": title, "description": description, "priority": priority, "assigned_to": Option::<&str>::None});
    let created = client.post("/tasks", &body).await?;
    let id = created.get("id").and_then(|s| s.as_str()).unwrap_or_default().to_string();
    let dispatch_body = json!({"agent": agent, "bridge": Option::<&str>::None, "model": Option::<&str>::None});
    let value = client.post(&format!("/tasks/{id}/dispatch"), &dispatch_body).await?;
    emit(format, &value, |v| print_dispatch_result(v));
    Ok(())
}

pub async fn poll(client: &ApiClient, format: OutputFormat, id: &str) -> Result<()> {
    let value = client.post_empty(&format!("/tasks/{id}/poll")).await?;
    emit(format, &value, |v| {
        println!("status: {}", v.get("status").and_then(|s| s.as_str()).unwrap_or(""));
        if let Some(result) = v.get("result").and_then(|s| s.as_str()) {
            println!("result: {result}");
        }
        if let Some(message) = v.get("message").and_then(|s| s.as_str()) {
            println!("error:  {message}");
        }
    });
    Ok(())
}

pub async fn retry(client: &ApiClient, format: OutputFormat, id: &str) -> Result<()> {
    let value = client.post_empty(&format!("/tasks/{id}/retry")).await?;
    emit(format, &value, |v| print_dispatch_result(v));
    Ok(())
}

pub async fn cancel(client: &ApiClient, format: OutputFormat, id: &str) -> Result<()> {
    let value = client.post_empty(&format!("/tasks/{id}/cancel")).await?;
    emit(format, &value, |v| {
        println!("cancelled: {}", v.get("cancelled").and_then(|b| b.as_bool()).unwrap_or(false));
    });
    Ok(())
}

fn print_task(v: &serde_json::Value) {
    println!("id:         {}", v.get("id").and_then(|s| s.as_str()).unwrap_or(""));
    println!("title:      {}", v.get("title").and_then(|s| s.as_str()).unwrap_or(""));
    println!("status:     {}", v.get("status").and_then(|s| s.as_str()).unwrap_or(""));
    println!("priority:   {}", v.get("priority").and_then(|s| s.as_str()).unwrap_or(""));
    println!("agent:      {}", v.get("assigned_to").and_then(|s| s.as_str()).unwrap_or("-"));
    if let Some(result) = v.get("result").and_then(|s| s.as_str()) {
        println!("result:     {result}");
    }
    if let Some(error) = v.get("error").and_then(|s| s.as_str()) {
        println!("error:      {error}");
    }
}

fn print_dispatch_result(v: &serde_json::Value) {
    if let Some(routing) = v.get("routing") {
        let agent = routing.get("agent").and_then(|s| s.as_str()).unwrap_or("-");
        let bridge = routing.get("bridge").and_then(|s| s.as_str()).unwrap_or("-");
        println!("routed to:  {agent} ({bridge})");
    }
    if let Some(task) = v.get("task") {
        print_task(task);
    }
}
