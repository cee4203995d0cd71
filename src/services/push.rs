// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push gateway client (Firebase Cloud Messaging HTTP v1).
//!
//! One send per call. Nothing here retries; callers decide what a failure
//! means for them.

use crate::models::PushMessage;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
// Refresh a little before the metadata server's stated expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Push delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push request failed: {0}")]
    Transport(String),

    #[error("push rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("could not obtain access token: {0}")]
    Auth(String),
}

/// Anything that can deliver a topic message to subscribed devices.
pub trait PushGateway: Send + Sync {
    fn send<'a>(&'a self, message: &'a PushMessage) -> BoxFuture<'a, Result<(), PushError>>;
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// FCM HTTP v1 client authenticated with the runtime service account.
pub struct FcmClient {
    http: reqwest::Client,
    send_url: String,
    token: RwLock<Option<CachedToken>>,
}

impl FcmClient {
    /// Create a client for `{endpoint}/v1/projects/{project}/messages:send`.
    pub fn new(endpoint: &str, project_id: &str) -> Result<Self, PushError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| PushError::Transport(format!("failed building HTTP client: {e}")))?;

        Ok(Self {
            http,
            send_url: format!(
                "{}/v1/projects/{}/messages:send",
                endpoint.trim_end_matches('/'),
                project_id
            ),
            token: RwLock::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, PushError> {
        {
            let cache = self.token.read().await;
            if let Some(token) = cache
                .as_ref()
                .filter(|token| token.expires_at > Instant::now())
            {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .http
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| PushError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PushError::Auth(format!(
                "metadata server returned status {}",
                response.status()
            )));
        }

        let token: MetadataToken = response
            .json()
            .await
            .map_err(|e| PushError::Auth(format!("invalid token JSON: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *self.token.write().await = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        tracing::debug!(ttl_secs = lifetime.as_secs(), "FCM access token refreshed");
        Ok(token.access_token)
    }

    async fn send_message(&self, message: &PushMessage) -> Result<(), PushError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(&self.send_url)
            .bearer_auth(token)
            .json(message)
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(topic = %message.message.topic, "FCM accepted message");
        Ok(())
    }
}

impl PushGateway for FcmClient {
    fn send<'a>(&'a self, message: &'a PushMessage) -> BoxFuture<'a, Result<(), PushError>> {
        Box::pin(self.send_message(message))
    }
}

/// In-process gateway that records messages instead of sending them.
#[derive(Clone, Default)]
pub struct MockPushGateway {
    sent: Arc<Mutex<Vec<PushMessage>>>,
    fail: Arc<AtomicBool>,
}

impl MockPushGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail with a transport error.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl PushGateway for MockPushGateway {
    fn send<'a>(&'a self, message: &'a PushMessage) -> BoxFuture<'a, Result<(), PushError>> {
        Box::pin(async move {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PushError::Transport("mock gateway unavailable".to_string()));
            }
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(message.clone());
            }
            Ok(())
        })
    }
}
