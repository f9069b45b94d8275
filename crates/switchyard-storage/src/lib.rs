// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Switchyard.
//!
//! Opens the ledger database with WAL mode and a busy timeout, applies the
//! embedded refinery migrations, and hands out the tokio-rusqlite connection
//! the cost ledger queries through.

pub mod database;
pub mod migrations;

pub use database::{Database, map_tr_err};
