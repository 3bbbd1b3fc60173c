//! Data models
//!
//! Rust structs representing database entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tweet row
///
/// `id` is assigned by SQLite on insert. Timestamps are managed by the
/// store: both are set on insert and `updated_at` is refreshed on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
