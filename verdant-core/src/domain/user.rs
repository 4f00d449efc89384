//! User domain model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};

/// A registered user account
///
/// Serialization matches the document shape in the store; the password hash
/// travels with it, so API layers must use [`User::public`] projections
/// instead of serializing this struct directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    /// Push-notification destination token; absent until the client saves one
    pub fcm_token: Option<String>,
    pub preferences: Option<Preferences>,
}

/// Client-facing display preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Option<String>,
    pub export_format: Option<String>,
}

/// Partial update for mutable profile fields
///
/// Email and the password hash are not reachable from here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub username: Option<String>,
    pub photo_url: Option<String>,
    pub preferences: Option<Preferences>,
}

/// User as exposed through the API: everything except the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl User {
    /// Create a new user with a freshly generated id
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            username: None,
            photo_url: None,
            fcm_token: None,
            preferences: None,
        }
    }

    /// Apply a profile patch; fields absent from the patch are unchanged
    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = Some(username);
        }
        if let Some(photo_url) = patch.photo_url {
            self.photo_url = Some(photo_url);
        }
        if let Some(preferences) = patch.preferences {
            self.preferences = Some(preferences);
        }
    }

    /// Projection without the password hash
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            photo_url: self.photo_url.clone(),
            fcm_token: self.fcm_token.clone(),
            preferences: self.preferences.clone(),
        }
    }
}

/// Validate an email address: one `@`, no whitespace, a dot in the domain
pub fn validate_email(email: &str) -> Result<()> {
    // Same shape the mobile clients validate against
    let re = regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex");
    if re.is_match(email) {
        Ok(())
    } else {
        Err(Error::invalid_input(
            "Invalid email format",
            "Please provide a valid email address",
        ))
    }
}
