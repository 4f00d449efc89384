//! Push dispatcher port

use async_trait::async_trait;

use crate::domain::result::Result;

/// Best-effort push notification delivery
///
/// One call is one attempt to deliver one notification to one destination
/// token. There are no retries at this boundary; callers decide whether a
/// failure is logged (the reminder sweep) or surfaced (the test endpoint).
#[async_trait]
pub trait PushDispatcher: Send + Sync {
    /// Deliver `title`/`body` to the device addressed by `token`
    async fn dispatch(&self, token: &str, title: &str, body: &str) -> Result<()>;
}
