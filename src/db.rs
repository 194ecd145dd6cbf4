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

use crate::error::StoreError;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tallybook", "tallybook"));

/// Bump when the schema changes shape; opening a store written by a
/// different version fails instead of silently misreading it.
pub const SCHEMA_VERSION: i64 = 1;

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
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

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('sale','expense','investment')),
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT NOT NULL,
        date TEXT NOT NULL,
        bill_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions(owner_id, date);

    CREATE TABLE IF NOT EXISTS bills(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        file_name TEXT NOT NULL,
        file_type TEXT NOT NULL,
        upload_date TEXT NOT NULL,
        status TEXT NOT NULL CHECK(status IN ('draft','approved')),
        extracted TEXT NOT NULL -- JSON document, see models::ExtractedFields
    );
    CREATE INDEX IF NOT EXISTS idx_bills_owner ON bills(owner_id);

    CREATE TABLE IF NOT EXISTS goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('sales','profit','expense-reduction')),
        title TEXT NOT NULL,
        target_amount TEXT NOT NULL,
        deadline TEXT NOT NULL
        -- no status column: status is recomputed from live data
    );
    CREATE INDEX IF NOT EXISTS idx_goals_owner ON goals(owner_id);

    CREATE TABLE IF NOT EXISTS daily_summaries(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        date TEXT NOT NULL,
        total_sales TEXT NOT NULL,
        total_expenses TEXT NOT NULL,
        total_investment TEXT NOT NULL,
        profit TEXT NOT NULL,
        UNIQUE(owner_id, date)
    );
    "#,
    )?;
    check_schema_version(conn)?;
    Ok(())
}

fn check_schema_version(conn: &Connection) -> Result<()> {
    let found: Option<String> = {
        use rusqlite::OptionalExtension;
        conn.query_row(
            "SELECT value FROM settings WHERE key='schema_version'",
            [],
            |r| r.get(0),
        )
        .optional()?
    };
    match found {
        Some(v) => {
            let found: i64 = v
                .parse()
                .with_context(|| format!("Invalid schema_version '{}'", v))?;
            if found != SCHEMA_VERSION {
                return Err(StoreError::SchemaVersion {
                    found,
                    expected: SCHEMA_VERSION,
                }
                .into());
            }
        }
        None => {
            conn.execute(
                "INSERT INTO settings(key, value) VALUES('schema_version', ?1)",
                [SCHEMA_VERSION.to_string()],
            )?;
        }
    }
    Ok(())
}
