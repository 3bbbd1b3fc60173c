//! Response envelopes for the tweet routes

use serde::Serialize;

use crate::data::Tweet;

/// `GET /tweets`
#[derive(Debug, Serialize)]
pub struct TweetListResponse {
    pub tweets: Vec<Tweet>,
}

/// `GET /tweets/:id` and `PUT /tweets/:id`
#[derive(Debug, Serialize)]
pub struct TweetResponse {
    pub tweet: Tweet,
}

/// `POST /tweets`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTweetResponse {
    pub new_tweet: Tweet,
}
