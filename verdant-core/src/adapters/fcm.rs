//! FCM push dispatcher
//!
//! Talks to the Firebase Cloud Messaging legacy HTTP endpoint with a server
//! key. Every dispatch is a single bounded-timeout request; delivery is
//! best-effort and callers own the failure policy.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::ports::PushDispatcher;

const FCM_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

/// A stalled dispatch must not bleed into the next sweep tick
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Dispatch(err.to_string())
    }
}

/// FCM client
pub struct FcmDispatcher {
    client: reqwest::Client,
    server_key: String,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    to: &'a str,
    notification: FcmNotification<'a>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    success: i64,
    #[serde(default)]
    failure: i64,
    #[serde(default)]
    results: Vec<FcmResult>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    #[serde(default)]
    error: Option<String>,
}

impl FcmDispatcher {
    pub fn new(server_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DISPATCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            server_key: server_key.into(),
        })
    }
}

#[async_trait]
impl PushDispatcher for FcmDispatcher {
    async fn dispatch(&self, token: &str, title: &str, body: &str) -> Result<()> {
        let message = FcmMessage {
            to: token,
            notification: FcmNotification { title, body },
        };

        let response = self
            .client
            .post(FCM_ENDPOINT)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::dispatch(format!(
                "FCM returned HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: FcmResponse = response.json().await?;
        if parsed.failure > 0 {
            let reason = parsed
                .results
                .iter()
                .find_map(|r| r.error.clone())
                .unwrap_or_else(|| "unknown FCM error".to_string());
            return Err(Error::dispatch(reason));
        }

        debug!(success = parsed.success, "FCM dispatch accepted");
        Ok(())
    }
}

/// Stand-in used when no FCM server key is configured. Dispatch attempts
/// fail with a clear message instead of pretending delivery happened.
pub struct DisabledDispatcher;

#[async_trait]
impl PushDispatcher for DisabledDispatcher {
    async fn dispatch(&self, _token: &str, _title: &str, _body: &str) -> Result<()> {
        Err(Error::dispatch("push delivery is not configured"))
    }
}
