//! Plant service - ownership-scoped plant records and their journals

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    CareTips, JournalEntry, JournalEntryPatch, Plant, PlantDraft, PlantPatch, Toxicity,
};
use crate::ports::Repository;

/// Outcome of the identification stub.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    pub scientific_name: String,
    pub common_name: String,
    pub confidence_score: f64,
    pub care_tips: CareTips,
    pub toxicity: Toxicity,
}

/// CRUD, journals, and lookups for a user's plants.
///
/// Every operation is scoped to the calling owner. A plant that exists
/// but belongs to someone else is indistinguishable from one that does
/// not exist at all.
#[derive(Clone)]
pub struct PlantService {
    repository: Arc<dyn Repository>,
}

impl PlantService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, owner: Uuid, draft: PlantDraft) -> Result<Plant> {
        let plant = Plant::from_draft(owner, draft)?;
        self.repository.insert_plant(&plant).await?;
        info!(plant = %plant.id, owner = %owner, "added plant");
        Ok(plant)
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<Plant>> {
        self.repository.plants_for_owner(owner).await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Plant> {
        self.fetch(
            owner,
            id,
            "Plant not found or you do not have access to this plant.",
        )
        .await
    }

    /// Replace the fields present in the patch and bump `updatedAt`.
    /// Concurrent updates resolve last-write-wins.
    pub async fn update(&self, owner: Uuid, id: Uuid, patch: PlantPatch) -> Result<Plant> {
        let mut plant = self
            .fetch(
                owner,
                id,
                "Plant not found or you do not have access to update this plant.",
            )
            .await?;
        plant.apply_patch(patch)?;
        self.repository.replace_plant(&plant).await?;
        Ok(plant)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()> {
        if self.repository.delete_plant(owner, id).await? {
            info!(plant = %id, owner = %owner, "deleted plant");
            Ok(())
        } else {
            Err(Error::not_found(
                "Plant not found or you do not have access to delete this plant.",
            ))
        }
    }

    /// Append a journal entry and return the updated plant.
    pub async fn add_journal_entry(
        &self,
        owner: Uuid,
        plant_id: Uuid,
        notes: &str,
        photo_url: Option<String>,
    ) -> Result<Plant> {
        if notes.trim().is_empty() {
            return Err(Error::validation("Journal entry notes cannot be empty."));
        }
        let mut plant = self
            .fetch(
                owner,
                plant_id,
                "Plant not found or you do not have access to add a journal entry to this plant.",
            )
            .await?;

        let now = Utc::now();
        plant.journal_entries.push(JournalEntry {
            entry_id: plant.next_entry_id(now),
            timestamp: now,
            notes: notes.to_string(),
            photo_url,
        });
        plant.updated_at = now;
        self.repository.replace_plant(&plant).await?;
        Ok(plant)
    }

    /// Patch one journal entry in place. The entry's timestamp is
    /// refreshed to the time of the edit.
    pub async fn update_journal_entry(
        &self,
        owner: Uuid,
        plant_id: Uuid,
        entry_id: &str,
        patch: JournalEntryPatch,
    ) -> Result<Plant> {
        let mut plant = self
            .fetch(owner, plant_id, "Plant not found or you do not have access.")
            .await?;

        let now = Utc::now();
        let entry = plant
            .journal_entries
            .iter_mut()
            .find(|e| e.entry_id == entry_id)
            .ok_or(Error::EntryNotFound)?;
        if let Some(notes) = patch.notes {
            entry.notes = notes;
        }
        if let Some(photo_url) = patch.photo_url {
            entry.photo_url = Some(photo_url);
        }
        entry.timestamp = now;
        plant.updated_at = now;
        self.repository.replace_plant(&plant).await?;
        Ok(plant)
    }

    pub async fn delete_journal_entry(
        &self,
        owner: Uuid,
        plant_id: Uuid,
        entry_id: &str,
    ) -> Result<Plant> {
        let mut plant = self
            .fetch(owner, plant_id, "Plant not found or you do not have access.")
            .await?;

        let before = plant.journal_entries.len();
        plant.journal_entries.retain(|e| e.entry_id != entry_id);
        if plant.journal_entries.len() == before {
            return Err(Error::EntryNotFound);
        }
        plant.updated_at = Utc::now();
        self.repository.replace_plant(&plant).await?;
        Ok(plant)
    }

    pub async fn toxicity_info(&self, owner: Uuid, id: Uuid) -> Result<Toxicity> {
        let plant = self
            .fetch(owner, id, "Plant not found or you do not have access.")
            .await?;
        plant.toxicity.ok_or_else(|| {
            Error::not_found("Toxicity information not available for this plant.")
        })
    }

    /// Identification stub. The real image model lives outside this
    /// service; until it is wired in, every photo is a Monstera.
    pub fn identify(&self, image_url: &str) -> Result<IdentificationResult> {
        if image_url.trim().is_empty() {
            return Err(Error::validation(
                "Image URL is required for identification.",
            ));
        }
        Ok(IdentificationResult {
            scientific_name: "Monstera deliciosa".to_string(),
            common_name: "Swiss Cheese Plant".to_string(),
            confidence_score: 0.95,
            care_tips: CareTips {
                light: Some("Bright indirect light".to_string()),
                water: Some("Water when top inch of soil is dry".to_string()),
                soil: Some("Well-draining potting mix".to_string()),
                temperature: Some("65-80°F (18-27°C)".to_string()),
                ..CareTips::default()
            },
            toxicity: Toxicity {
                is_toxic_to_cats: true,
                is_toxic_to_dogs: true,
                is_toxic_to_humans: false,
                symptoms: Some(
                    "Oral irritation, pain and swelling of mouth, tongue and lips, vomiting, \
                     difficulty swallowing."
                        .to_string(),
                ),
                severity: None,
                notes: None,
                sources: Vec::new(),
            },
        })
    }

    /// Care-tip stub keyed by species name.
    pub fn care_tips_for_species(&self, species: &str) -> CareTips {
        CareTips {
            light: Some("Indirect sunlight".to_string()),
            water: Some("Water regularly".to_string()),
            soil: Some("Well-drained soil".to_string()),
            temperature: Some("Moderate".to_string()),
            growth_tips: Some(format!(
                "Optimal conditions for {species} include consistent humidity and avoiding \
                 direct harsh sunlight."
            )),
            maintenance_frequency: Some("Weekly".to_string()),
            indoor_suitability: true,
            outdoor_suitability: false,
        }
    }

    async fn fetch(&self, owner: Uuid, id: Uuid, denial: &str) -> Result<Plant> {
        self.repository
            .find_plant(owner, id)
            .await?
            .ok_or_else(|| Error::not_found(denial))
    }
}
