//! Request extractors for the tweet routes
//!
//! - `TweetId`: the digits-only `:id` path segment
//! - `TweetForm`: the validation gate for write requests

use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::AppError;

/// Longest accepted tweet, in characters
pub const MAX_MESSAGE_CHARS: usize = 280;

pub const MESSAGE_EMPTY: &str = "Tweet message can't be empty.";
pub const MESSAGE_NOT_TEXT: &str = "Tweet message must be text.";
pub const MESSAGE_TOO_LONG: &str = "Tweet message can't be longer than 280 characters.";

/// `:id` path segment made only of ASCII digits
///
/// Any other segment is rejected with a bare 404, the same response an
/// unmatched route gets, so `/tweets/abc` never reaches a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetId(String);

impl TweetId {
    /// Numeric primary key, or `None` when the digits overflow `i64`
    pub fn pk(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Id as shown in "not found" messages
    pub fn not_found(&self) -> AppError {
        match self.pk() {
            Some(pk) => AppError::tweet_not_found(pk),
            None => AppError::tweet_not_found(&self.0),
        }
    }
}

fn is_digits(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

#[async_trait]
impl<S> FromRequestParts<S> for TweetId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::NOT_FOUND)?;

        if is_digits(&segment) {
            Ok(TweetId(segment))
        } else {
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Body of a POST/PUT request that passed the validation gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetForm {
    pub message: String,
}

/// Run every field rule against a parsed body.
///
/// Returns the message when all rules pass, otherwise one error message per
/// failed rule in rule order.
pub fn validate_tweet_body(body: &Value) -> Result<String, Vec<String>> {
    let errors = match body.get("message") {
        Some(Value::String(message)) if message.is_empty() => vec![MESSAGE_EMPTY],
        Some(Value::String(message)) if message.chars().count() > MAX_MESSAGE_CHARS => {
            vec![MESSAGE_TOO_LONG]
        }
        Some(Value::String(message)) => return Ok(message.clone()),
        None | Some(Value::Null) => vec![MESSAGE_EMPTY],
        Some(_) => vec![MESSAGE_NOT_TEXT],
    };

    Err(errors.into_iter().map(str::to_string).collect())
}

/// Turn the JSON extractor's outcome into a body the field rules can inspect
///
/// A request without a JSON content type has no parsed body, so it is
/// validated as `{}`. Unparseable JSON fails the gate on its own.
fn body_or_empty(extracted: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match extracted {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Default::default())),
        Err(rejection) => Err(AppError::bad_request(vec![rejection.body_text()])),
    }
}

#[async_trait]
impl<S> FromRequest<S> for TweetForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extracted = Json::<Value>::from_request(request, state).await;
        let body = body_or_empty(extracted).map_err(IntoResponse::into_response)?;

        validate_tweet_body(&body)
            .map(|message| TweetForm { message })
            .map_err(|errors| AppError::bad_request(errors).into_response())
    }
}
