// models/src/medical/user.rs

use bcrypt::{BcryptError, DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationResult;
use crate::identifiers::new_record_id;
use crate::schema::{PayloadReader, non_empty_string};

pub const DEFAULT_ROLE: &str = "health_worker";

/// Registration payload. Holds the plaintext password only until it is hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

impl NewUser {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id", "passwordHash", "createdAt"]);
        let username = r.required("username", non_empty_string);
        let password = r.required("password", non_empty_string);
        let name = r.required("name", non_empty_string);
        let role = r.optional("role", non_empty_string);
        r.finish(|| NewUser {
            username: username.unwrap_or_default(),
            password: password.unwrap_or_default(),
            name: name.unwrap_or_default(),
            role: role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        })
    }
}

/// Stored user. Contains the password hash, never the plaintext password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn hash_password(password: &str) -> Result<String, BcryptError> {
        hash(password, DEFAULT_COST)
    }

    pub fn verify_password(&self, password: &str) -> Result<bool, BcryptError> {
        verify(password, &self.password_hash)
    }

    /// Builds the stored record from a registration payload, hashing the password.
    pub fn from_new_user(new_user: NewUser) -> Result<Self, BcryptError> {
        let password_hash = Self::hash_password(&new_user.password)?;
        Ok(User {
            id: new_record_id(),
            username: new_user.username,
            password_hash,
            name: new_user.name,
            role: new_user.role,
            created_at: Utc::now(),
        })
    }
}
