//! Repository port - document store abstraction

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{NotificationRecord, Plant, User};

/// Document store abstraction
///
/// This trait defines all persistence operations. Implementations (adapters)
/// provide the actual store access logic. Plants are read and written as
/// whole documents; the store's per-document atomicity is what keeps the
/// embedded journal/reminder arrays consistent.
#[async_trait]
pub trait Repository: Send + Sync {
    // === Users ===

    /// Insert a new user
    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Look up a user by exact email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by id
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Replace an existing user document
    async fn update_user(&self, user: &User) -> Result<()>;

    // === Plants ===

    /// Insert a new plant
    async fn insert_plant(&self, plant: &Plant) -> Result<()>;

    /// All plants owned by `owner`, store-defined order
    async fn plants_for_owner(&self, owner: Uuid) -> Result<Vec<Plant>>;

    /// Owner-scoped fetch: the plant iff it exists AND belongs to `owner`.
    /// Absence and foreign ownership both come back as `None`.
    async fn find_plant(&self, owner: Uuid, id: Uuid) -> Result<Option<Plant>>;

    /// Replace a whole plant document (last write wins)
    async fn replace_plant(&self, plant: &Plant) -> Result<()>;

    /// Delete an owned plant; returns false when absent or not owned
    async fn delete_plant(&self, owner: Uuid, id: Uuid) -> Result<bool>;

    /// Plants containing at least one incomplete reminder, across all owners.
    /// The due-date cut is applied by the caller.
    async fn plants_with_open_reminders(&self) -> Result<Vec<Plant>>;

    // === Notifications ===

    /// Append a notification history record
    async fn insert_notification(&self, record: &NotificationRecord) -> Result<()>;

    /// A user's notification history, newest first
    async fn notifications_for_user(&self, user: Uuid) -> Result<Vec<NotificationRecord>>;
}
