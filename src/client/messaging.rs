// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Topic subscription through the Instance ID REST API.
//!
//! For agents that hold an FCM registration token but no mobile SDK. The
//! OAuth token needs the `firebase.messaging` scope.

use super::platform::{PlatformError, TopicMessaging};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const IID_BATCH_ADD_URL: &str = "https://iid.googleapis.com/iid/v1:batchAdd";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct BatchAddRequest<'a> {
    to: String,
    registration_tokens: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct BatchAddResponse {
    #[serde(default)]
    results: Vec<BatchAddResult>,
}

#[derive(Debug, Deserialize)]
struct BatchAddResult {
    error: Option<String>,
}

/// Subscribes one registration token to topics.
pub struct FcmTopicMessaging {
    http: reqwest::Client,
    url: String,
    registration_token: String,
    access_token: String,
}

impl FcmTopicMessaging {
    pub fn new(
        registration_token: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, PlatformError> {
        Self::with_url(IID_BATCH_ADD_URL, registration_token, access_token)
    }

    /// Point at a different endpoint (local fakes).
    pub fn with_url(
        url: &str,
        registration_token: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| PlatformError::Unavailable(format!("failed building HTTP client: {e}")))?;

        Ok(Self {
            http,
            url: url.to_string(),
            registration_token: registration_token.into(),
            access_token: access_token.into(),
        })
    }

    async fn batch_add(&self, topic: &str) -> Result<(), PlatformError> {
        let request = BatchAddRequest {
            to: format!("/topics/{}", topic),
            registration_tokens: [self.registration_token.as_str()],
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.access_token)
            .header("access_token_auth", "true")
            .json(&request)
            .send()
            .await
            .map_err(|e| PlatformError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Rejected(format!("status {status}: {body}")));
        }

        let body: BatchAddResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::Rejected(format!("invalid response JSON: {e}")))?;

        first_error(&body).map_or(Ok(()), |e| Err(PlatformError::Rejected(e.to_string())))
    }
}

fn first_error(response: &BatchAddResponse) -> Option<&str> {
    response
        .results
        .iter()
        .find_map(|result| result.error.as_deref())
}

impl TopicMessaging for FcmTopicMessaging {
    fn subscribe_to_topic<'a>(&'a self, topic: &'a str) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(self.batch_add(topic))
    }
}
