// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boot-time diagnostics banner (§4.8). Every probe is best-effort: a
//! failure downgrades the banner, it never aborts startup.

use crate::config::Config;
use relay_engine::Core;
use std::net::TcpListener;
use tracing::info;

pub async fn render(config: &Config, core: &Core) {
    let ollama_online = core
        .bridges
        .get(relay_core::BridgeKind::Ollama)
        .map(|b| async move { b.health().await })
        .unwrap();
    let ollama_online = ollama_online.await;

    let agent_count = core.registry.get_all().len();
    let pending_count = core
        .tasks
        .list(Some(relay_core::TaskStatus::Pending), None, None)
        .len();
    let port_free = TcpListener::bind((config.bind_host, config.bind_port)).is_ok();
    let disk_free_mb = free_disk_mb(&config.state_dir);

    info!(
        ollama_online,
        agent_count,
        pending_count,
        port_free,
        disk_free_mb,
        bind = %format!("{}:{}", config.bind_host, config.bind_port),
        "boot diagnostics"
    );

    println!("relay daemon starting");
    println!("  bind:          {}:{}", config.bind_host, config.bind_port);
    println!("  ollama:        {}", if ollama_online { "online" } else { "unreachable" });
    println!("  agents found:  {agent_count}");
    println!("  pending tasks: {pending_count}");
    println!(
        "  port:          {}",
        if port_free { "available" } else { "already bound (may be a stale instance)" }
    );
    match disk_free_mb {
        Some(mb) => println!("  disk free:     {mb} MB"),
        None => println!("  disk free:     unknown"),
    }
}

fn free_disk_mb(_path: &std::path::Path) -> Option<u64> {
    // No portable stdlib statvfs; left as a best-effort unknown rather than
    // pulling in a platform-specific crate for one advisory field.
    None
}
