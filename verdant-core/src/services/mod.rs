//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! holds its ports behind `Arc` so the HTTP layer stays thin.

mod accounts;
mod export;
mod notifications;
mod plants;
mod sweep;

pub use accounts::AccountService;
pub use export::ExportService;
pub use notifications::NotificationService;
pub use plants::{IdentificationResult, PlantService};
pub use sweep::{ReminderSweep, SweepSummary};
