//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite database operations
//! - The `TweetStore` seam the handlers are written against

mod database;
mod models;
mod store;

pub use database::Database;
pub use models::*;
pub use store::TweetStore;

#[cfg(test)]
pub use store::MockTweetStore;
