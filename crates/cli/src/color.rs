// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color helpers, shared by `output` and `table`.

use std::io::IsTerminal;

pub mod codes {
    /// Section headers.
    pub const HEADER: u8 = 74;
    /// Muted / secondary text.
    pub const MUTED: u8 = 240;
}

/// Priority: `NO_COLOR=1` disables, `COLOR=1` forces, otherwise a TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

pub fn apply_header(text: &str) -> String {
    format!("{}{}{}", fg256(codes::HEADER), text, RESET)
}

pub fn apply_muted(text: &str) -> String {
    format!("{}{}{}", fg256(codes::MUTED), text, RESET)
}

/// Colors a status/priority word green/yellow/red by recognized keyword,
/// leaving anything else uncolored.
pub fn apply_status(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let color = match lower.as_str() {
        "done" | "active" | "critical" => GREEN,
        "pending" | "assigned" | "idle" | "high" | "medium" => YELLOW,
        "failed" | "offline" | "low" => RED,
        _ => return text.to_string(),
    };
    format!("{color}{text}{RESET}")
}
