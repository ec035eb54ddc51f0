//! User directory entry types.

use fuzzhub_core::types::{DbId, Timestamp};
use serde::Serialize;

/// A dashboard account. The password hash never leaves this crate's
/// consumers unredacted; HTTP responses use [`User::to_public`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: DbId,
    pub email: String,
    /// Argon2id PHC-formatted hash.
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Role name, one of `fuzzhub_core::roles`.
    pub role: String,
    pub created_at: Timestamp,
}

/// Public projection of a [`User`] safe to serialize into responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: DbId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
}

impl User {
    /// Strip the password hash for wire use.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role.clone(),
        }
    }
}

/// Payload for creating an account. The caller hashes the password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
}
