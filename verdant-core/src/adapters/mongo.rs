//! MongoDB repository implementation
//!
//! Documents serialize through the same serde shapes the API uses: ids and
//! datetimes land in the store as strings. Range queries on dates are
//! therefore not pushed down to the server; callers that need a due-date cut
//! (the reminder sweep) apply it client-side.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::info;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{NotificationRecord, Plant, User};
use crate::ports::Repository;

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Error::Store(err.to_string())
    }
}

/// MongoDB repository
pub struct MongoRepository {
    users: Collection<User>,
    plants: Collection<Plant>,
    notifications: Collection<NotificationRecord>,
}

impl MongoRepository {
    /// Connect to MongoDB, verify the connection with a ping, and ensure
    /// the unique email index exists
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)?;

        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;

        let repo = Self {
            users: db.collection("users"),
            plants: db.collection("plants"),
            notifications: db.collection("notifications"),
        };
        repo.ensure_indexes().await?;

        info!(database = db_name, "connected to MongoDB");
        Ok(repo)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(email_index).await?;
        Ok(())
    }
}

/// Duplicate-key inserts on the unique email index surface as the same
/// validation error the pre-insert existence check produces
fn map_user_insert_error(err: mongodb::error::Error) -> Error {
    if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(ref we)) =
        *err.kind
    {
        if we.code == 11000 {
            return Error::validation("User already exists");
        }
    }
    Error::Store(err.to_string())
}

#[async_trait]
impl Repository for MongoRepository {
    // === Users ===

    async fn insert_user(&self, user: &User) -> Result<()> {
        self.users
            .insert_one(user)
            .await
            .map_err(map_user_insert_error)?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .find_one(doc! { "_id": id.to_string() })
            .await?)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let result = self
            .users
            .replace_one(doc! { "_id": user.id.to_string() }, user)
            .await?;
        if result.matched_count == 0 {
            return Err(Error::store(format!("no such user: {}", user.id)));
        }
        Ok(())
    }

    // === Plants ===

    async fn insert_plant(&self, plant: &Plant) -> Result<()> {
        self.plants.insert_one(plant).await?;
        Ok(())
    }

    async fn plants_for_owner(&self, owner: Uuid) -> Result<Vec<Plant>> {
        let mut cursor = self
            .plants
            .find(doc! { "userId": owner.to_string() })
            .await?;
        let mut plants = Vec::new();
        while let Some(plant) = cursor.try_next().await? {
            plants.push(plant);
        }
        Ok(plants)
    }

    async fn find_plant(&self, owner: Uuid, id: Uuid) -> Result<Option<Plant>> {
        Ok(self
            .plants
            .find_one(doc! { "_id": id.to_string(), "userId": owner.to_string() })
            .await?)
    }

    async fn replace_plant(&self, plant: &Plant) -> Result<()> {
        let result = self
            .plants
            .replace_one(doc! { "_id": plant.id.to_string() }, plant)
            .await?;
        if result.matched_count == 0 {
            return Err(Error::store(format!("no such plant: {}", plant.id)));
        }
        Ok(())
    }

    async fn delete_plant(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let result = self
            .plants
            .delete_one(doc! { "_id": id.to_string(), "userId": owner.to_string() })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn plants_with_open_reminders(&self) -> Result<Vec<Plant>> {
        // Completion flag only; the due-date predicate runs in the sweep
        let mut cursor = self
            .plants
            .find(doc! { "reminders.isCompleted": false })
            .await?;
        let mut plants = Vec::new();
        while let Some(plant) = cursor.try_next().await? {
            plants.push(plant);
        }
        Ok(plants)
    }

    // === Notifications ===

    async fn insert_notification(&self, record: &NotificationRecord) -> Result<()> {
        self.notifications.insert_one(record).await?;
        Ok(())
    }

    async fn notifications_for_user(&self, user: Uuid) -> Result<Vec<NotificationRecord>> {
        let mut cursor = self
            .notifications
            .find(doc! { "userId": user.to_string() })
            .sort(doc! { "sentAt": -1 })
            .await?;
        let mut history = Vec::new();
        while let Some(record) = cursor.try_next().await? {
            history.push(record);
        }
        Ok(history)
    }
}
