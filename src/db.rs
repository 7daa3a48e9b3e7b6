// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Bolsillo", "bolsillo"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("bolsillo.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- Amounts are canonical USD. For entries captured in VES the original
    -- amount and the exact conversion snapshot ride along and are immutable.
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('expense','income')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        is_savings INTEGER NOT NULL DEFAULT 0,
        description TEXT,
        date TEXT NOT NULL,
        created_at TEXT,
        updated_at TEXT NOT NULL,
        original_amount TEXT,
        original_currency TEXT CHECK(original_currency IN ('USD','VES') OR original_currency IS NULL),
        rate_kind TEXT CHECK(rate_kind IN ('bcv','euro','usdt') OR rate_kind IS NULL),
        rate_value TEXT,
        is_deleted INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
    CREATE INDEX IF NOT EXISTS idx_transactions_user_updated ON transactions(user_id, updated_at);

    -- Planned monthly items; period is the YYYY-MM bucket they budget for.
    CREATE TABLE IF NOT EXISTS recurring(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('expense','income')),
        day INTEGER NOT NULL DEFAULT 1,
        period TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_recurring_user_period ON recurring(user_id, period);

    CREATE TABLE IF NOT EXISTS missions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('savings_amount','tx_count')),
        target TEXT NOT NULL,
        status TEXT NOT NULL CHECK(status IN ('locked','active','completed')),
        sort_order INTEGER NOT NULL,
        UNIQUE(user_id, sort_order)
    );
    "#,
    )?;
    Ok(())
}

/// In-memory database with the full schema.
pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().context("Open in-memory DB")?;
    init_schema(&mut conn)?;
    Ok(conn)
}
