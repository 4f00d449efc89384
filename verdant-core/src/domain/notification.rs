//! Notification history record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One delivered (or attempted) push notification, kept for per-user history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user: Uuid,
    pub title: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(user: Uuid, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            title: title.into(),
            body: body.into(),
            sent_at: Utc::now(),
        }
    }
}
