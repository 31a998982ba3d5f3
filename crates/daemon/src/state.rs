// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The axum shared state: just an `Arc<Core>` (§9 — no module singletons).

use relay_engine::Core;
use std::sync::Arc;

pub type AppState = Arc<Core>;
