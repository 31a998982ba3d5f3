// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a JSON value either pretty-printed or routed to a text renderer.
pub fn emit(format: OutputFormat, value: &serde_json::Value, text: impl FnOnce(&serde_json::Value)) {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())),
        OutputFormat::Text => text(value),
    }
}
