// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relayd` — the orchestrator daemon: HTTP surface, dispatch, inbox watch.

use relay_daemon::{boot, build_core, routes, Config};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let config = Config::load();
    std::fs::create_dir_all(&config.state_dir)?;
    std::fs::create_dir_all(&config.inbox_dir)?;
    std::fs::create_dir_all(&config.agents_dir)?;

    let (core, _watcher_handle) = build_core(&config);
    boot::render(&config, &core).await;

    let app = routes::build(core);
    let addr = std::net::SocketAddr::from((config.bind_host, config.bind_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "relayd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("relayd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}
