// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Owner id is required")]
    MissingOwner,

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },

    #[error("Stored {what} {id} is corrupt and was skipped")]
    Corrupt { what: &'static str, id: i64 },

    #[error("Schema version {found} found, expected {expected}")]
    SchemaVersion { found: i64, expected: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        StoreError::InvalidRecord(msg.into())
    }
}
