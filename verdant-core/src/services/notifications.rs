//! Notification service - device tokens, test sends, and history

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::NotificationRecord;
use crate::ports::{PushDispatcher, Repository};

const TEST_TITLE: &str = "reminder";
const TEST_BODY: &str = "take care of Aloe Vera";

/// Push-token registration and on-demand notification delivery.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn Repository>,
    dispatcher: Arc<dyn PushDispatcher>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn Repository>, dispatcher: Arc<dyn PushDispatcher>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Store the device token pushes for this user are sent to.
    pub async fn save_token(&self, user_id: Uuid, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            return Err(Error::validation("FCM token is required."));
        }
        let mut user = self
            .repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;
        user.fcm_token = Some(token.to_string());
        self.repository.update_user(&user).await?;
        info!(user = %user_id, "saved push token");
        Ok(())
    }

    /// Send a fixed test notification to the caller's registered device
    /// and record it in the history.
    pub async fn send_test(&self, user_id: Uuid) -> Result<()> {
        let user = self
            .repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let token = user
            .fcm_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::validation("FCM token not found for user."))?;

        self.dispatcher.dispatch(token, TEST_TITLE, TEST_BODY).await?;
        let record = NotificationRecord::new(user_id, TEST_TITLE, TEST_BODY);
        self.repository.insert_notification(&record).await?;
        Ok(())
    }

    /// Delivered notifications for this user, newest first.
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<NotificationRecord>> {
        self.repository.notifications_for_user(user_id).await
    }
}
