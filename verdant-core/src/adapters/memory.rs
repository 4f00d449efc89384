//! In-memory repository implementation
//!
//! Backs the `VERDANT_STORE=memory` development mode and the test suites.
//! Implements the same contract as the MongoDB adapter with process-local
//! state; nothing survives a restart.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{NotificationRecord, Plant, User};
use crate::ports::Repository;

/// Process-local repository
#[derive(Default)]
pub struct MemoryRepository {
    users: RwLock<HashMap<Uuid, User>>,
    plants: RwLock<HashMap<Uuid, Plant>>,
    notifications: RwLock<Vec<NotificationRecord>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    // === Users ===

    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(Error::validation("User already exists"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().unwrap();
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(Error::store(format!("no such user: {}", user.id))),
        }
    }

    // === Plants ===

    async fn insert_plant(&self, plant: &Plant) -> Result<()> {
        self.plants.write().unwrap().insert(plant.id, plant.clone());
        Ok(())
    }

    async fn plants_for_owner(&self, owner: Uuid) -> Result<Vec<Plant>> {
        let plants = self.plants.read().unwrap();
        Ok(plants.values().filter(|p| p.owner == owner).cloned().collect())
    }

    async fn find_plant(&self, owner: Uuid, id: Uuid) -> Result<Option<Plant>> {
        let plants = self.plants.read().unwrap();
        Ok(plants.get(&id).filter(|p| p.owner == owner).cloned())
    }

    async fn replace_plant(&self, plant: &Plant) -> Result<()> {
        let mut plants = self.plants.write().unwrap();
        match plants.get_mut(&plant.id) {
            Some(existing) => {
                *existing = plant.clone();
                Ok(())
            }
            None => Err(Error::store(format!("no such plant: {}", plant.id))),
        }
    }

    async fn delete_plant(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let mut plants = self.plants.write().unwrap();
        match plants.get(&id) {
            Some(p) if p.owner == owner => {
                plants.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn plants_with_open_reminders(&self) -> Result<Vec<Plant>> {
        let plants = self.plants.read().unwrap();
        Ok(plants
            .values()
            .filter(|p| p.reminders.iter().any(|r| !r.is_completed))
            .cloned()
            .collect())
    }

    // === Notifications ===

    async fn insert_notification(&self, record: &NotificationRecord) -> Result<()> {
        self.notifications.write().unwrap().push(record.clone());
        Ok(())
    }

    async fn notifications_for_user(&self, user: Uuid) -> Result<Vec<NotificationRecord>> {
        let notifications = self.notifications.read().unwrap();
        let mut history: Vec<NotificationRecord> = notifications
            .iter()
            .filter(|n| n.user == user)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlantDraft, Reminder, ReminderKind};
    use chrono::Utc;

    fn plant_named(owner: Uuid, name: &str) -> Plant {
        Plant::from_draft(
            owner,
            PlantDraft {
                name: Some(name.to_string()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = MemoryRepository::new();
        repo.insert_user(&User::new("a@b.com", "h1")).await.unwrap();
        let err = repo.insert_user(&User::new("a@b.com", "h2")).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_find_plant_is_owner_scoped() {
        let repo = MemoryRepository::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let plant = plant_named(owner, "Fern");
        repo.insert_plant(&plant).await.unwrap();

        assert!(repo.find_plant(owner, plant.id).await.unwrap().is_some());
        assert!(repo.find_plant(stranger, plant.id).await.unwrap().is_none());
        assert!(!repo.delete_plant(stranger, plant.id).await.unwrap());
        assert!(repo.delete_plant(owner, plant.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_open_reminder_filter() {
        let repo = MemoryRepository::new();
        let owner = Uuid::new_v4();

        let mut with_open = plant_named(owner, "Fern");
        with_open.reminders.push(Reminder {
            reminder_id: "r1".to_string(),
            kind: ReminderKind::Watering,
            date: Utc::now(),
            notes: None,
            is_completed: false,
        });

        let mut all_done = plant_named(owner, "Cactus");
        all_done.reminders.push(Reminder {
            reminder_id: "r1".to_string(),
            kind: ReminderKind::Watering,
            date: Utc::now(),
            notes: None,
            is_completed: true,
        });

        let bare = plant_named(owner, "Moss");

        repo.insert_plant(&with_open).await.unwrap();
        repo.insert_plant(&all_done).await.unwrap();
        repo.insert_plant(&bare).await.unwrap();

        let candidates = repo.plants_with_open_reminders().await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, with_open.id);
    }

    #[tokio::test]
    async fn test_notification_history_newest_first() {
        let repo = MemoryRepository::new();
        let user = Uuid::new_v4();

        let mut first = NotificationRecord::new(user, "one", "body");
        first.sent_at = Utc::now() - chrono::Duration::minutes(5);
        let second = NotificationRecord::new(user, "two", "body");

        repo.insert_notification(&first).await.unwrap();
        repo.insert_notification(&second).await.unwrap();
        repo.insert_notification(&NotificationRecord::new(Uuid::new_v4(), "other", "body"))
            .await
            .unwrap();

        let history = repo.notifications_for_user(user).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].title, "two");
        assert_eq!(history[1].title, "one");
    }
}
