//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod notification;
mod plant;
pub mod result;
mod user;

pub use notification::NotificationRecord;
pub use plant::{
    CareTips, JournalEntry, JournalEntryPatch, Plant, PlantDraft, PlantPatch, Reminder,
    ReminderKind, Toxicity,
};
pub use user::{validate_email, Preferences, PublicUser, User, UserPatch};
