//! Account service - registration, credential checks, and profile updates

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::info;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{validate_email, User, UserPatch};
use crate::ports::Repository;

/// Registration, login, and profile management.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn Repository>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Create a new account and return the stored record.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        if email.trim().is_empty() {
            return Err(Error::invalid_input(
                "Invalid email",
                "Email is required and must be a string",
            ));
        }
        if password.is_empty() {
            return Err(Error::invalid_input(
                "Invalid password",
                "Password is required and must be a string",
            ));
        }
        validate_email(email)?;

        if self.repository.find_user_by_email(email).await?.is_some() {
            return Err(Error::validation("User already exists"));
        }

        let user = User::new(email, hash_password(password)?);
        self.repository.insert_user(&user).await?;
        info!(user = %user.id, "registered new user");
        Ok(user)
    }

    /// Check credentials. The caller never learns whether the email or
    /// the password was the wrong half.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .repository
            .find_user_by_email(email)
            .await?
            .ok_or_else(invalid_credentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(invalid_credentials());
        }
        Ok(user)
    }

    pub async fn profile(&self, id: Uuid) -> Result<User> {
        self.repository
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Apply a partial profile update and return the new state.
    pub async fn update_profile(&self, id: Uuid, patch: UserPatch) -> Result<User> {
        let mut user = self.profile(id).await?;
        user.apply_patch(patch);
        self.repository.update_user(&user).await?;
        Ok(user)
    }
}

fn invalid_credentials() -> Error {
    Error::auth("Invalid credentials")
}

/// Hash a password into an Argon2id PHC string with a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::store(format!("Password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string. Malformed stored
/// hashes count as a mismatch rather than an error.
fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
