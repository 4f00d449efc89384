//! Reminder sweep - periodic scan that pushes due care reminders
//!
//! Each tick scans plants with open reminders, applies the due-date cut,
//! and dispatches one push per due reminder. The sweep only ever reads
//! reminder state; completing a reminder is a user action.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::domain::result::Result;
use crate::domain::{NotificationRecord, Plant, Reminder};
use crate::ports::{PushDispatcher, Repository};

/// Counters for one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub plants_scanned: usize,
    pub reminders_due: usize,
    pub dispatched: usize,
    pub skipped_no_token: usize,
    pub failures: usize,
}

/// Periodic reminder scanner.
pub struct ReminderSweep {
    repository: Arc<dyn Repository>,
    dispatcher: Arc<dyn PushDispatcher>,
}

impl ReminderSweep {
    pub fn new(repository: Arc<dyn Repository>, dispatcher: Arc<dyn PushDispatcher>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// One sweep pass over all open reminders due at `now`.
    ///
    /// A failed dispatch is counted and logged without stopping the
    /// pass; the reminder stays open and is retried next tick.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<SweepSummary> {
        let plants = self.repository.plants_with_open_reminders().await?;
        let mut summary = SweepSummary {
            plants_scanned: plants.len(),
            ..Default::default()
        };

        for plant in &plants {
            let due = plant.due_reminders(now);
            if due.is_empty() {
                continue;
            }
            summary.reminders_due += due.len();

            let owner = match self.repository.find_user_by_id(plant.owner).await? {
                Some(owner) => owner,
                None => {
                    warn!(plant = %plant.id, "plant owner no longer exists, skipping");
                    continue;
                }
            };
            let Some(token) = owner.fcm_token.as_deref().filter(|t| !t.is_empty()) else {
                summary.skipped_no_token += due.len();
                continue;
            };

            for reminder in due {
                self.push_reminder(plant, reminder, token, &mut summary)
                    .await;
            }
        }

        Ok(summary)
    }

    async fn push_reminder(
        &self,
        plant: &Plant,
        reminder: &Reminder,
        token: &str,
        summary: &mut SweepSummary,
    ) {
        let title = format!("Reminder: {} your plant {}", reminder.kind, plant.name);
        let body = format!("Don't forget to {} your {} today!", reminder.kind, plant.name);

        match self.dispatcher.dispatch(token, &title, &body).await {
            Ok(()) => {
                summary.dispatched += 1;
                // History is best effort; a write failure must not fail
                // the reminder that was already delivered.
                let record = NotificationRecord::new(plant.owner, &title, &body);
                if let Err(e) = self.repository.insert_notification(&record).await {
                    warn!(error = %e, "could not record sweep notification");
                }
            }
            Err(e) => {
                summary.failures += 1;
                warn!(
                    plant = %plant.id,
                    reminder = %reminder.reminder_id,
                    error = %e,
                    "reminder dispatch failed"
                );
            }
        }
    }

    /// Run the sweep on a fixed cadence until `shutdown` fires.
    ///
    /// The first pass lands one full interval after startup, the same
    /// rhythm as an hourly cron job.
    pub fn spawn(
        self: &Arc<Self>,
        every: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let sweep = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match sweep.run_once(Utc::now()).await {
                            Ok(summary) => info!(
                                plants = summary.plants_scanned,
                                due = summary.reminders_due,
                                dispatched = summary.dispatched,
                                skipped = summary.skipped_no_token,
                                failures = summary.failures,
                                "reminder sweep finished"
                            ),
                            Err(e) => error!(error = %e, "reminder sweep failed"),
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("reminder sweep stopping");
                        break;
                    }
                }
            }
        })
    }
}
