// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relay watch [interval]` — re-renders `status` in place every `interval`
//! seconds until interrupted.

use anyhow::Result;
use std::io::Write;

use crate::client::ApiClient;
use crate::commands::status;
use crate::output::OutputFormat;

const CURSOR_HOME: &str = "\x1B[H";
const CLEAR_TO_END: &str = "\x1B[J";

pub async fn run(client: &ApiClient, format: OutputFormat, interval_secs: u64) -> Result<()> {
    loop {
        print!("{CURSOR_HOME}{CLEAR_TO_END}");
        status::status(client, format).await?;
        std::io::stdout().flush()?;
        tokio::time::sleep(std::time::Duration::from_secs(interval_secs.max(1))).await;
    }
}
