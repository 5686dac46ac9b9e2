use cropsight_auth::UserAccount;
use cropsight_core::{DomainError, DomainResult, UserId};

use crate::memory::Table;

/// User account storage.
#[derive(Debug, Default)]
pub struct UserRepo {
    users: Table<UserId, UserAccount>,
}

impl UserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new account. Usernames and emails are unique.
    pub fn insert(&self, account: UserAccount) -> DomainResult<()> {
        if self.find_by_email(&account.email).is_some() {
            return Err(DomainError::conflict("email already registered"));
        }
        if self
            .users
            .find(|u| u.username == account.username)
            .is_some()
        {
            return Err(DomainError::conflict("username already taken"));
        }
        self.users.insert(account.id, account);
        Ok(())
    }

    pub fn get(&self, id: UserId) -> DomainResult<UserAccount> {
        self.users.get(&id).ok_or(DomainError::NotFound("user"))
    }

    pub fn exists(&self, id: UserId) -> bool {
        self.users.contains(&id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<UserAccount> {
        let email = email.trim().to_lowercase();
        self.users.find(|u| u.email == email)
    }

    pub fn list(&self) -> Vec<UserAccount> {
        let mut users = self.users.all();
        users.sort_by_key(|u| u.created_at);
        users
    }

    pub fn update(&self, account: &UserAccount) -> DomainResult<()> {
        if !self.users.contains(&account.id) {
            return Err(DomainError::NotFound("user"));
        }
        self.users.insert(account.id, account.clone());
        Ok(())
    }

    pub fn remove(&self, id: UserId) -> DomainResult<()> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::NotFound("user"))
    }
}
