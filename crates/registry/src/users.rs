//! In-memory user directory.

use std::collections::HashMap;

use fuzzhub_core::error::CoreError;
use fuzzhub_core::roles;
use fuzzhub_core::types::DbId;
use tokio::sync::RwLock;

use crate::user::{NewUser, User};

struct Inner {
    users: HashMap<DbId, User>,
    next_id: DbId,
}

/// Directory of dashboard accounts, keyed by user id. Email addresses are
/// unique.
pub struct UserDirectory {
    inner: RwLock<Inner>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Create an account. Fails with `Conflict` if the email is taken and
    /// `Validation` if the role is unknown.
    pub async fn create(&self, new: NewUser) -> Result<User, CoreError> {
        if !roles::is_valid_role(&new.role) {
            return Err(CoreError::Validation(format!(
                "Unknown role: {}",
                new.role
            )));
        }

        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == new.email) {
            return Err(CoreError::Conflict(format!(
                "User with email {} already exists",
                new.email
            )));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let user = User {
            id,
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            created_at: chrono::Utc::now(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    /// All accounts, ordered by id.
    pub async fn list(&self) -> Vec<User> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    pub async fn get(&self, id: DbId) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Change an account's role.
    pub async fn update_role(&self, id: DbId, role: &str) -> Result<User, CoreError> {
        if !roles::is_valid_role(role) {
            return Err(CoreError::Validation(format!("Unknown role: {role}")));
        }

        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "User", id })?;
        user.role = role.to_string();
        Ok(user.clone())
    }

    /// Delete an account. Returns `NotFound` if it does not exist.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        inner
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(CoreError::NotFound { entity: "User", id })
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
