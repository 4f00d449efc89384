//! Integration tests for account and notification flows
//!
//! Registration, login, profile patching, push-token handling, and the
//! test-notification path, all against the in-memory store.
//!
//! Run with: cargo test --test account_service_tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use uuid::Uuid;

use verdant_core::adapters::MemoryRepository;
use verdant_core::ports::{PushDispatcher, Repository};
use verdant_core::services::{AccountService, NotificationService};
use verdant_core::{Error, NotificationRecord, Preferences, Result, UserPatch};

// ============================================================================
// Test Helpers
// ============================================================================

/// Dispatcher that records every push instead of sending it.
#[derive(Default)]
struct RecordingDispatcher {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingDispatcher {
    fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushDispatcher for RecordingDispatcher {
    async fn dispatch(&self, token: &str, title: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), title.to_string(), body.to_string()));
        Ok(())
    }
}

fn account_service() -> AccountService {
    AccountService::new(Arc::new(MemoryRepository::new()))
}

// ============================================================================
// Account Flows
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let service = account_service();

    let user = service
        .register("ada@leafy.test", "hunter22")
        .await
        .unwrap();
    assert_eq!(user.email, "ada@leafy.test");

    let logged_in = service.login("ada@leafy.test", "hunter22").await.unwrap();
    assert_eq!(logged_in.id, user.id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let service = account_service();
    service
        .register("ada@leafy.test", "hunter22")
        .await
        .unwrap();

    let wrong_password = service
        .login("ada@leafy.test", "wrong")
        .await
        .unwrap_err();
    let unknown_email = service
        .login("nobody@leafy.test", "hunter22")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), "Invalid credentials");
    assert_eq!(unknown_email.to_string(), "Invalid credentials");
    assert!(matches!(wrong_password, Error::Auth(_)));
    assert!(matches!(unknown_email, Error::Auth(_)));
}

#[tokio::test]
async fn test_register_validates_input() {
    let service = account_service();

    let err = service.register("", "hunter22").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email");

    let err = service.register("ada@leafy.test", "").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid password");

    let err = service.register("not-an-email", "hunter22").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email format");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let service = account_service();
    service
        .register("ada@leafy.test", "hunter22")
        .await
        .unwrap();

    let err = service
        .register("ada@leafy.test", "different")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "User already exists");
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let service = account_service();
    let user = service
        .register("ada@leafy.test", "hunter22")
        .await
        .unwrap();

    assert_ne!(user.password_hash, "hunter22");
    assert!(user.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_profile_lookup_and_patch() {
    let service = account_service();
    let user = service
        .register("ada@leafy.test", "hunter22")
        .await
        .unwrap();

    let profile = service.profile(user.id).await.unwrap();
    assert_eq!(profile.email, "ada@leafy.test");
    assert_eq!(profile.username, None);

    let updated = service
        .update_profile(
            user.id,
            UserPatch {
                username: Some("ada".to_string()),
                preferences: Some(Preferences {
                    theme: Some("dark".to_string()),
                    export_format: None,
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username.as_deref(), Some("ada"));
    assert_eq!(
        updated.preferences.as_ref().unwrap().theme.as_deref(),
        Some("dark")
    );

    // And the patch persisted.
    let profile = service.profile(user.id).await.unwrap();
    assert_eq!(profile.username.as_deref(), Some("ada"));

    let err = service.profile(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.to_string(), "User not found");
}

// ============================================================================
// Notification Flows
// ============================================================================

#[tokio::test]
async fn test_save_token_then_send_test_notification() {
    let repo = Arc::new(MemoryRepository::new());
    let recorder = Arc::new(RecordingDispatcher::default());
    let accounts = AccountService::new(repo.clone());
    let notifications = NotificationService::new(repo.clone(), recorder.clone());

    let user = accounts
        .register("ada@leafy.test", "hunter22")
        .await
        .unwrap();

    // No token saved yet.
    let err = notifications.send_test(user.id).await.unwrap_err();
    assert_eq!(err.to_string(), "FCM token not found for user.");

    // Blank tokens are rejected outright.
    let err = notifications.save_token(user.id, "  ").await.unwrap_err();
    assert_eq!(err.to_string(), "FCM token is required.");

    notifications.save_token(user.id, "device-9").await.unwrap();
    notifications.send_test(user.id).await.unwrap();

    let sent = recorder.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        (
            "device-9".to_string(),
            "reminder".to_string(),
            "take care of Aloe Vera".to_string()
        )
    );

    let history = notifications.history(user.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title, "reminder");
    assert_eq!(history[0].body, "take care of Aloe Vera");
}

#[tokio::test]
async fn test_history_is_newest_first_and_per_user() {
    let repo = Arc::new(MemoryRepository::new());
    let notifications =
        NotificationService::new(repo.clone(), Arc::new(RecordingDispatcher::default()));

    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    let early = NotificationRecord {
        id: Uuid::new_v4(),
        user: owner,
        title: "first".to_string(),
        body: "b".to_string(),
        sent_at: Utc::now() - ChronoDuration::hours(1),
    };
    let late = NotificationRecord {
        id: Uuid::new_v4(),
        user: owner,
        title: "second".to_string(),
        body: "b".to_string(),
        sent_at: Utc::now(),
    };
    repo.insert_notification(&early).await.unwrap();
    repo.insert_notification(&late).await.unwrap();
    repo.insert_notification(&NotificationRecord::new(other, "noise", "n"))
        .await
        .unwrap();

    let history = notifications.history(owner).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].title, "second");
    assert_eq!(history[1].title, "first");
}
