//! Verdant Core - Business logic for the plant care companion
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Plant, JournalEntry, etc.)
//! - **ports**: Trait definitions for external dependencies (Repository, PushDispatcher)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (MongoDB, FCM, in-memory)

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

use std::sync::Arc;

use ports::{PushDispatcher, Repository};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{
    CareTips, JournalEntry, JournalEntryPatch, NotificationRecord, Plant, PlantDraft, PlantPatch,
    Preferences, PublicUser, Reminder, ReminderKind, Toxicity, User, UserPatch,
};

/// Main context for Verdant operations
///
/// This is the primary entry point for all business logic. It holds the
/// store and push ports plus all services built on top of them.
pub struct VerdantContext {
    pub repository: Arc<dyn Repository>,
    pub accounts: AccountService,
    pub plants: PlantService,
    pub notifications: NotificationService,
    pub export: ExportService,
    pub sweep: Arc<ReminderSweep>,
}

impl VerdantContext {
    /// Wire every service onto the given store and push dispatcher.
    pub fn new(repository: Arc<dyn Repository>, dispatcher: Arc<dyn PushDispatcher>) -> Self {
        let accounts = AccountService::new(Arc::clone(&repository));
        let plants = PlantService::new(Arc::clone(&repository));
        let notifications =
            NotificationService::new(Arc::clone(&repository), Arc::clone(&dispatcher));
        let export = ExportService::new(Arc::clone(&repository));
        let sweep = Arc::new(ReminderSweep::new(Arc::clone(&repository), dispatcher));

        Self {
            repository,
            accounts,
            plants,
            notifications,
            export,
            sweep,
        }
    }
}
