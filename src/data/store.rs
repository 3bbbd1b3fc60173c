//! Data-access seam used by the HTTP handlers.

use axum::async_trait;

use super::models::Tweet;
use crate::error::Result;

/// Persistence operations the tweet routes depend on
///
/// Handlers only see this trait, so the backing store can be swapped
/// (SQLite in production, mocks in tests) through `AppState`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TweetStore: Send + Sync {
    /// All tweets, ordered by ascending id
    async fn find_all(&self) -> Result<Vec<Tweet>>;

    /// Tweet with primary key `id`, if any
    async fn find_by_pk(&self, id: i64) -> Result<Option<Tweet>>;

    /// Insert a new tweet and return it with its assigned id
    async fn create(&self, message: &str) -> Result<Tweet>;

    /// Persist an in-place change to `tweet.message`
    ///
    /// Refreshes `tweet.updated_at` to the stored value.
    async fn save(&self, tweet: &mut Tweet) -> Result<()>;
}
