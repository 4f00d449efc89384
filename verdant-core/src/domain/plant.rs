//! Plant domain model
//!
//! The Plant aggregate owns its journal entries and reminders outright: both
//! live as embedded arrays, have no identity outside their parent, and are
//! persisted and deleted atomically with it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};

/// A plant in a user's collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owning user; set at creation and never patchable
    #[serde(rename = "userId")]
    pub owner: Uuid,
    pub name: String,
    #[serde(default)]
    pub scientific_name: String,
    #[serde(default)]
    pub common_name: String,
    /// Identification confidence from the AR pipeline, 0.0..=1.0
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub care_tips: CareTips,
    pub toxicity: Option<Toxicity>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    pub found_location: Option<String>,
    pub planted_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Care guidance attached to a plant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareTips {
    pub light: Option<String>,
    pub water: Option<String>,
    pub soil: Option<String>,
    pub temperature: Option<String>,
    pub growth_tips: Option<String>,
    pub maintenance_frequency: Option<String>,
    #[serde(default)]
    pub indoor_suitability: bool,
    #[serde(default)]
    pub outdoor_suitability: bool,
}

/// Per-species toxicity information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toxicity {
    #[serde(default)]
    pub is_toxic_to_cats: bool,
    #[serde(default)]
    pub is_toxic_to_dogs: bool,
    #[serde(default)]
    pub is_toxic_to_humans: bool,
    pub symptoms: Option<String>,
    pub severity: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// A dated journal entry embedded in a plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Unique within the parent plant, not globally
    pub entry_id: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub notes: String,
    pub photo_url: Option<String>,
}

/// A scheduled care reminder embedded in a plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Unique within the parent plant; supplied by the client
    pub reminder_id: String,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    /// When the reminder is due
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    /// Set true by a user action only; the sweep never flips this
    #[serde(default)]
    pub is_completed: bool,
}

/// The fixed set of reminder types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Watering,
    Fertilizing,
    Pruning,
    Repotting,
    General,
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Watering => "watering",
            Self::Fertilizing => "fertilizing",
            Self::Pruning => "pruning",
            Self::Repotting => "repotting",
            Self::General => "general",
        };
        f.write_str(s)
    }
}

impl Reminder {
    /// Due means incomplete with a due date at or before `now`
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.date <= now
    }
}

/// Incoming body for plant creation
///
/// There is no owner field here; ownership comes from the authenticated
/// caller, and a `userId` key in the request body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDraft {
    pub name: Option<String>,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
    pub confidence_score: Option<f64>,
    pub care_tips: Option<CareTips>,
    pub toxicity: Option<Toxicity>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    pub found_location: Option<String>,
    pub planted_date: Option<DateTime<Utc>>,
}

/// Partial update for a plant; fields absent from the patch are unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantPatch {
    pub name: Option<String>,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
    pub confidence_score: Option<f64>,
    pub care_tips: Option<CareTips>,
    pub toxicity: Option<Toxicity>,
    /// Wholesale replacement of the entries array
    pub journal_entries: Option<Vec<JournalEntry>>,
    /// Wholesale replacement of the reminders array; this is also how
    /// reminders are created and completed
    pub reminders: Option<Vec<Reminder>>,
    pub found_location: Option<String>,
    pub planted_date: Option<DateTime<Utc>>,
}

/// Partial update for a single journal entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryPatch {
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

impl Plant {
    /// Build a new plant for `owner` from a client draft
    pub fn from_draft(owner: Uuid, draft: PlantDraft) -> Result<Self> {
        let name = draft.name.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() {
            return Err(invalid_name());
        }
        if let Some(score) = draft.confidence_score {
            validate_confidence(score)?;
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            name: name.to_string(),
            scientific_name: draft.scientific_name.unwrap_or_default(),
            common_name: draft.common_name.unwrap_or_default(),
            confidence_score: draft.confidence_score,
            care_tips: draft.care_tips.unwrap_or_default(),
            toxicity: draft.toxicity,
            journal_entries: draft.journal_entries,
            reminders: draft.reminders,
            found_location: draft.found_location,
            planted_date: draft.planted_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update and refresh `updated_at`
    pub fn apply_patch(&mut self, patch: PlantPatch) -> Result<()> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid_name());
            }
            self.name = name.to_string();
        }
        if let Some(score) = patch.confidence_score {
            validate_confidence(score)?;
            self.confidence_score = Some(score);
        }
        if let Some(scientific_name) = patch.scientific_name {
            self.scientific_name = scientific_name;
        }
        if let Some(common_name) = patch.common_name {
            self.common_name = common_name;
        }
        if let Some(care_tips) = patch.care_tips {
            self.care_tips = care_tips;
        }
        if let Some(toxicity) = patch.toxicity {
            self.toxicity = Some(toxicity);
        }
        if let Some(entries) = patch.journal_entries {
            self.journal_entries = entries;
        }
        if let Some(reminders) = patch.reminders {
            self.reminders = reminders;
        }
        if let Some(found_location) = patch.found_location {
            self.found_location = Some(found_location);
        }
        if let Some(planted_date) = patch.planted_date {
            self.planted_date = Some(planted_date);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Next journal entry id: epoch milliseconds, bumped until unique
    /// within this plant so rapid successive adds cannot collide
    pub fn next_entry_id(&self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis();
        while self
            .journal_entries
            .iter()
            .any(|e| e.entry_id == candidate.to_string())
        {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Reminders due at `now`
    pub fn due_reminders(&self, now: DateTime<Utc>) -> Vec<&Reminder> {
        self.reminders.iter().filter(|r| r.is_due_at(now)).collect()
    }
}

fn invalid_name() -> Error {
    Error::invalid_input(
        "Invalid plant data",
        "Plant name is required and must be a string",
    )
}

fn validate_confidence(score: f64) -> Result<()> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(Error::invalid_input(
            "Invalid plant data",
            "Confidence score must be between 0 and 1",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(name: &str) -> PlantDraft {
        PlantDraft {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_draft_requires_name() {
        let owner = Uuid::new_v4();
        assert!(Plant::from_draft(owner, PlantDraft::default()).is_err());
        assert!(Plant::from_draft(owner, draft("   ")).is_err());

        let plant = Plant::from_draft(owner, draft("  Fern  ")).unwrap();
        assert_eq!(plant.name, "Fern");
        assert_eq!(plant.owner, owner);
        assert!(plant.journal_entries.is_empty());
    }

    #[test]
    fn test_confidence_score_range() {
        let owner = Uuid::new_v4();
        let mut d = draft("Fern");
        d.confidence_score = Some(1.5);
        assert!(Plant::from_draft(owner, d).is_err());

        let mut d = draft("Fern");
        d.confidence_score = Some(0.95);
        let plant = Plant::from_draft(owner, d).unwrap();
        assert_eq!(plant.confidence_score, Some(0.95));
    }

    #[test]
    fn test_patch_changes_only_given_fields() {
        let owner = Uuid::new_v4();
        let mut d = draft("Fern");
        d.scientific_name = Some("Polypodiopsida".to_string());
        let mut plant = Plant::from_draft(owner, d).unwrap();

        plant
            .apply_patch(PlantPatch {
                common_name: Some("Garden fern".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(plant.name, "Fern");
        assert_eq!(plant.scientific_name, "Polypodiopsida");
        assert_eq!(plant.common_name, "Garden fern");
    }

    #[test]
    fn test_patch_rejects_empty_name() {
        let mut plant = Plant::from_draft(Uuid::new_v4(), draft("Fern")).unwrap();
        let result = plant.apply_patch(PlantPatch {
            name: Some("  ".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(plant.name, "Fern");
    }

    #[test]
    fn test_next_entry_id_bumps_on_collision() {
        let mut plant = Plant::from_draft(Uuid::new_v4(), draft("Fern")).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let first = plant.next_entry_id(now);
        plant.journal_entries.push(JournalEntry {
            entry_id: first.clone(),
            timestamp: now,
            notes: "watered".to_string(),
            photo_url: None,
        });

        let second = plant.next_entry_id(now);
        assert_ne!(first, second);
        assert_eq!(
            second.parse::<i64>().unwrap(),
            first.parse::<i64>().unwrap() + 1
        );
    }

    #[test]
    fn test_reminder_due_rules() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut reminder = Reminder {
            reminder_id: "r1".to_string(),
            kind: ReminderKind::Watering,
            date: now - chrono::Duration::hours(1),
            notes: None,
            is_completed: false,
        };
        assert!(reminder.is_due_at(now));

        reminder.is_completed = true;
        assert!(!reminder.is_due_at(now));

        reminder.is_completed = false;
        reminder.date = now + chrono::Duration::hours(1);
        assert!(!reminder.is_due_at(now));
    }

    #[test]
    fn test_wire_field_names() {
        let owner = Uuid::new_v4();
        let mut plant = Plant::from_draft(owner, draft("Fern")).unwrap();
        plant.journal_entries.push(JournalEntry {
            entry_id: "1".to_string(),
            timestamp: Utc::now(),
            notes: "sprouted".to_string(),
            photo_url: Some("https://img.example/1.png".to_string()),
        });
        plant.reminders.push(Reminder {
            reminder_id: "r1".to_string(),
            kind: ReminderKind::Fertilizing,
            date: Utc::now(),
            notes: None,
            is_completed: false,
        });

        let json = serde_json::to_value(&plant).unwrap();
        assert!(json.get("_id").is_some());
        assert_eq!(json["userId"], serde_json::json!(owner.to_string()));
        assert_eq!(json["journalEntries"][0]["entryId"], "1");
        assert!(json["journalEntries"][0].get("photoUrl").is_some());
        assert_eq!(json["reminders"][0]["type"], "fertilizing");
        assert_eq!(json["reminders"][0]["isCompleted"], false);
    }

    #[test]
    fn test_reminder_kind_round_trip() {
        for (kind, text) in [
            (ReminderKind::Watering, "watering"),
            (ReminderKind::Fertilizing, "fertilizing"),
            (ReminderKind::Pruning, "pruning"),
            (ReminderKind::Repotting, "repotting"),
            (ReminderKind::General, "general"),
        ] {
            assert_eq!(kind.to_string(), text);
            let parsed: ReminderKind =
                serde_json::from_value(serde_json::json!(text)).unwrap();
            assert_eq!(parsed, kind);
        }
        assert!(serde_json::from_value::<ReminderKind>(serde_json::json!("mowing")).is_err());
    }
}
