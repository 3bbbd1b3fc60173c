//! SQLite database operations
//!
//! All database access goes through this module.

use std::path::Path;
use std::time::Instant;

use axum::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite, SqlitePool};

use super::models::Tweet;
use super::store::TweetStore;
use crate::error::{AppError, Result};
use crate::metrics::{TWEETS_TOTAL, observe_db_query};

const TWEETS_TABLE: &str = "tweets";

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        let db = Self { pool };
        TWEETS_TOTAL.set(db.count_tweets().await?);

        tracing::info!(path = %path.display(), "Database connected and migrated successfully");

        Ok(db)
    }

    /// Number of stored tweets
    pub async fn count_tweets(&self) -> Result<i64> {
        let started = Instant::now();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tweets")
            .fetch_one(&self.pool)
            .await?;
        observe_db_query("SELECT", TWEETS_TABLE, started.elapsed());

        Ok(count)
    }
}

#[async_trait]
impl TweetStore for Database {
    async fn find_all(&self) -> Result<Vec<Tweet>> {
        let started = Instant::now();
        let tweets = sqlx::query_as::<_, Tweet>(
            "SELECT id, message, created_at, updated_at FROM tweets ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        observe_db_query("SELECT", TWEETS_TABLE, started.elapsed());

        Ok(tweets)
    }

    async fn find_by_pk(&self, id: i64) -> Result<Option<Tweet>> {
        let started = Instant::now();
        let tweet = sqlx::query_as::<_, Tweet>(
            "SELECT id, message, created_at, updated_at FROM tweets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        observe_db_query("SELECT", TWEETS_TABLE, started.elapsed());

        Ok(tweet)
    }

    async fn create(&self, message: &str) -> Result<Tweet> {
        let started = Instant::now();
        let now = Utc::now();
        let tweet = sqlx::query_as::<_, Tweet>(
            r#"
            INSERT INTO tweets (message, created_at, updated_at)
            VALUES (?, ?, ?)
            RETURNING id, message, created_at, updated_at
            "#,
        )
        .bind(message)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        observe_db_query("INSERT", TWEETS_TABLE, started.elapsed());
        TWEETS_TOTAL.inc();

        tracing::debug!(tweet_id = tweet.id, "Tweet created");

        Ok(tweet)
    }

    async fn save(&self, tweet: &mut Tweet) -> Result<()> {
        let started = Instant::now();
        let updated_at: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            UPDATE tweets
            SET message = ?, updated_at = ?
            WHERE id = ?
            RETURNING updated_at
            "#,
        )
        .bind(&tweet.message)
        .bind(Utc::now())
        .bind(tweet.id)
        .fetch_optional(&self.pool)
        .await?;
        observe_db_query("UPDATE", TWEETS_TABLE, started.elapsed());

        // The row can disappear between lookup and save.
        tweet.updated_at = updated_at.ok_or_else(|| AppError::tweet_not_found(tweet.id))?;

        tracing::debug!(tweet_id = tweet.id, "Tweet updated");

        Ok(())
    }
}
