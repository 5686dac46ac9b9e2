//! User accounts.
//!
//! # Invariants
//! - Usernames and emails are stored trimmed; emails lowercased.
//! - The password is stored only as an argon2 hash.
//! - An inactive account cannot authenticate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cropsight_core::{DomainError, DomainResult, UserId};

use crate::password::{hash_password, verify_password};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub is_premium: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile fields the user may change after registration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl UserAccount {
    /// Register a new account, hashing the password.
    pub fn register(
        username: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        phone_number: Option<String>,
    ) -> DomainResult<Self> {
        let username = normalize_username(username.into())?;
        let email = normalize_email(email.into())?;
        if password.len() < 8 {
            return Err(DomainError::validation(
                "password must be at least 8 characters",
            ));
        }
        let password_hash = hash_password(password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        Ok(Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            phone_number,
            is_premium: false,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    /// Check a login attempt. Inactive accounts never authenticate.
    pub fn authenticate(&self, password: &str) -> bool {
        self.is_active && verify_password(&self.password_hash, password)
    }

    /// Apply a profile patch. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: ProfilePatch) -> DomainResult<()> {
        if let Some(username) = patch.username {
            self.username = normalize_username(username)?;
        }
        if let Some(email) = patch.email {
            self.email = normalize_email(email)?;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = Some(phone_number);
        }
        Ok(())
    }
}

fn normalize_username(raw: String) -> DomainResult<String> {
    let username = raw.trim().to_string();
    if username.is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    Ok(username)
}

fn normalize_email(raw: String) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_normalizes_and_hashes() {
        let account =
            UserAccount::register("  alice ", " Alice@Example.COM ", "correct-horse", None)
                .unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.email, "alice@example.com");
        assert_ne!(account.password_hash, "correct-horse");
        assert!(account.authenticate("correct-horse"));
        assert!(!account.authenticate("wrong"));
    }

    #[test]
    fn rejects_bad_email_and_short_password() {
        assert!(UserAccount::register("alice", "no-at-sign", "correct-horse", None).is_err());
        assert!(UserAccount::register("alice", "a@b.c", "short", None).is_err());
    }

    #[test]
    fn inactive_accounts_cannot_authenticate() {
        let mut account =
            UserAccount::register("bob", "bob@example.com", "correct-horse", None).unwrap();
        account.is_active = false;
        assert!(!account.authenticate("correct-horse"));
    }

    #[test]
    fn profile_patch_keeps_unset_fields() {
        let mut account =
            UserAccount::register("carol", "carol@example.com", "correct-horse", None).unwrap();
        account
            .apply(ProfilePatch {
                phone_number: Some("5551234567".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(account.username, "carol");
        assert_eq!(account.phone_number.as_deref(), Some("5551234567"));
    }
}
