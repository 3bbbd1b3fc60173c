//! Tweet endpoints
//!
//! - `GET  /tweets`      list every tweet
//! - `GET  /tweets/:id`  fetch one tweet
//! - `POST /tweets`      create a tweet
//! - `PUT  /tweets/:id`  replace a tweet's message
//!
//! No DELETE route is exposed. Any other method on these paths is answered
//! like an unknown route.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
};

use super::dto::{NewTweetResponse, TweetListResponse, TweetResponse};
use super::extract::{TweetForm, TweetId};
use crate::AppState;
use crate::data::Tweet;
use crate::error::Result;

/// Create tweets router
pub fn tweets_router() -> Router<AppState> {
    Router::new()
        .route(
            "/tweets",
            get(list_tweets).post(create_tweet).fallback(route_not_found),
        )
        .route(
            "/tweets/:id",
            get(get_tweet).put(update_tweet).fallback(route_not_found),
        )
}

async fn route_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// GET /tweets
pub async fn list_tweets(
    State(state): State<AppState>,
) -> Result<Json<TweetListResponse>> {
    let tweets = state.tweets.find_all().await?;

    Ok(Json(TweetListResponse { tweets }))
}

/// GET /tweets/:id
pub async fn get_tweet(
    State(state): State<AppState>,
    id: TweetId,
) -> Result<Json<TweetResponse>> {
    let tweet = find_tweet(&state, &id).await?;

    Ok(Json(TweetResponse { tweet }))
}

/// POST /tweets
pub async fn create_tweet(
    State(state): State<AppState>,
    form: TweetForm,
) -> Result<(StatusCode, Json<NewTweetResponse>)> {
    let new_tweet = state.tweets.create(&form.message).await?;

    tracing::info!(tweet_id = new_tweet.id, "Tweet posted");

    Ok((StatusCode::CREATED, Json(NewTweetResponse { new_tweet })))
}

/// PUT /tweets/:id
///
/// Answers 201 Created with the updated tweet.
pub async fn update_tweet(
    State(state): State<AppState>,
    id: TweetId,
    form: TweetForm,
) -> Result<(StatusCode, Json<TweetResponse>)> {
    let mut tweet = find_tweet(&state, &id).await?;

    tweet.message = form.message;
    state.tweets.save(&mut tweet).await?;

    tracing::info!(tweet_id = tweet.id, "Tweet edited");

    Ok((StatusCode::CREATED, Json(TweetResponse { tweet })))
}

async fn find_tweet(state: &AppState, id: &TweetId) -> Result<Tweet> {
    let Some(pk) = id.pk() else {
        return Err(id.not_found());
    };

    state
        .tweets
        .find_by_pk(pk)
        .await?
        .ok_or_else(|| id.not_found())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::data::{MockTweetStore, TweetStore};
    use crate::{AppState, build_router, config};

    fn test_config(temp_dir: &TempDir) -> config::AppConfig {
        config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: config::DatabaseConfig {
                path: temp_dir.path().join("test.db"),
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    async fn sqlite_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(test_config(&temp_dir)).await.unwrap();
        (state, temp_dir)
    }

    fn mock_state(store: MockTweetStore) -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store: Arc<dyn TweetStore> = Arc::new(store);
        (AppState::with_store(test_config(&temp_dir), store), temp_dir)
    }

    async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Option<Value>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = build_router(state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).ok();
        (status, json)
    }

    #[tokio::test]
    async fn create_then_fetch_round_trip() {
        let (state, _temp_dir) = sqlite_state().await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/tweets",
            Some(json!({ "message": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let body = body.unwrap();
        assert_eq!(body["newTweet"]["id"], 1);
        assert_eq!(body["newTweet"]["message"], "hello");
        assert!(body["newTweet"]["createdAt"].is_string());

        let (status, body) = send(&state, Method::GET, "/tweets/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap()["tweet"]["message"], "hello");
    }

    #[tokio::test]
    async fn list_returns_every_tweet() {
        let (state, _temp_dir) = sqlite_state().await;

        let (status, body) = send(&state, Method::GET, "/tweets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap(), json!({ "tweets": [] }));

        state.tweets.create("first").await.unwrap();
        state.tweets.create("second").await.unwrap();

        let (_, body) = send(&state, Method::GET, "/tweets", None).await;
        let body = body.unwrap();
        let tweets = body["tweets"].as_array().unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0]["message"], "first");
        assert_eq!(tweets[1]["message"], "second");
    }

    #[tokio::test]
    async fn update_replaces_message_and_answers_created() {
        let (state, _temp_dir) = sqlite_state().await;
        state.tweets.create("hello").await.unwrap();

        let (status, body) = send(
            &state,
            Method::PUT,
            "/tweets/1",
            Some(json!({ "message": "bye" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let body = body.unwrap();
        assert_eq!(body["tweet"]["id"], 1);
        assert_eq!(body["tweet"]["message"], "bye");

        let (_, body) = send(&state, Method::GET, "/tweets/1", None).await;
        assert_eq!(body.unwrap()["tweet"]["message"], "bye");
    }

    #[tokio::test]
    async fn missing_tweet_is_not_found() {
        let (state, _temp_dir) = sqlite_state().await;

        let (status, body) = send(&state, Method::GET, "/tweets/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body = body.unwrap();
        assert_eq!(body["title"], "Tweet Not found");
        assert_eq!(body["message"], "The tweet with id of 999 could not be found");

        let (status, body) = send(
            &state,
            Method::PUT,
            "/tweets/999",
            Some(json!({ "message": "nobody home" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap()["title"], "Tweet Not found");
    }

    #[tokio::test]
    async fn leading_zeros_are_parsed_as_decimal() {
        let (state, _temp_dir) = sqlite_state().await;
        state.tweets.create("hello").await.unwrap();

        let (status, body) = send(&state, Method::GET, "/tweets/001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap()["tweet"]["id"], 1);
    }

    #[tokio::test]
    async fn oversized_id_is_not_found() {
        let (state, _temp_dir) = sqlite_state().await;

        let (status, body) =
            send(&state, Method::GET, "/tweets/99999999999999999999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap()["title"], "Tweet Not found");
    }

    #[tokio::test]
    async fn non_digit_id_does_not_match_route() {
        let (state, _temp_dir) = sqlite_state().await;

        for uri in ["/tweets/abc", "/tweets/12abc", "/tweets/-1"] {
            let (status, body) = send(&state, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(body.is_none(), "{uri} must not carry the tweet error body");
        }

        let (status, body) = send(
            &state,
            Method::PUT,
            "/tweets/abc",
            Some(json!({ "message": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn invalid_create_is_bad_request() {
        let (state, _temp_dir) = sqlite_state().await;

        for payload in [
            json!({}),
            json!({ "message": "" }),
            json!({ "message": 5 }),
            json!({ "message": "x".repeat(281) }),
        ] {
            let (status, body) = send(&state, Method::POST, "/tweets", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let body = body.unwrap();
            assert_eq!(body["title"], "Bad request.");
            assert!(!body["errors"].as_array().unwrap().is_empty());
        }

        assert!(state.tweets.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (state, _temp_dir) = sqlite_state().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/tweets")
            .header("content-type", "application/json")
            .body(Body::from("{\"message\":"))
            .unwrap();
        let response = build_router(state.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_json_content_type_is_bad_request() {
        let (state, _temp_dir) = sqlite_state().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/tweets")
            .header("content-type", "text/plain")
            .body(Body::from(json!({ "message": "a" }).to_string()))
            .unwrap();
        let response = build_router(state.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["title"], "Bad request.");
        assert_eq!(body["errors"], json!(["Tweet message can't be empty."]));

        assert!(state.tweets.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unrouted_methods_are_not_found() {
        let (state, _temp_dir) = sqlite_state().await;
        state.tweets.create("hello").await.unwrap();

        for (method, uri) in [
            (Method::DELETE, "/tweets/abc"),
            (Method::DELETE, "/tweets/1"),
            (Method::POST, "/tweets/1"),
            (Method::PATCH, "/tweets/1"),
            (Method::DELETE, "/tweets"),
        ] {
            let (status, body) = send(&state, method.clone(), uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert!(body.is_none(), "{method} {uri}");
        }

        assert_eq!(state.tweets.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn validation_runs_before_lookup_on_update() {
        let (state, _temp_dir) = sqlite_state().await;

        let (status, body) = send(
            &state,
            Method::PUT,
            "/tweets/999",
            Some(json!({ "message": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap()["errors"][0], "Tweet message can't be empty.");
    }

    #[tokio::test]
    async fn store_failure_is_server_error() {
        let mut store = MockTweetStore::new();
        store
            .expect_find_all()
            .returning(|| Err(crate::error::AppError::Database(sqlx::Error::PoolClosed)));
        store
            .expect_find_by_pk()
            .returning(|_| Err(crate::error::AppError::Database(sqlx::Error::PoolTimedOut)));
        let (state, _temp_dir) = mock_state(store);

        let (status, body) = send(&state, Method::GET, "/tweets", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.unwrap()["title"], "Server Error");

        let (status, _) = send(&state, Method::GET, "/tweets/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn create_failure_is_server_error() {
        let mut store = MockTweetStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|_| Err(crate::error::AppError::Internal(anyhow::anyhow!("read-only"))));
        let (state, _temp_dir) = mock_state(store);

        let (status, _) = send(
            &state,
            Method::POST,
            "/tweets",
            Some(json!({ "message": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn invalid_body_never_reaches_store() {
        // No expectations: any store call would panic the mock.
        let (state, _temp_dir) = mock_state(MockTweetStore::new());

        let (status, _) = send(&state, Method::POST, "/tweets", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
