// models/src/errors.rs

use std::fmt;

use serde::{Deserialize, Serialize};
pub use thiserror::Error;

#[cfg(feature = "bincode-errors")]
use bincode::error::{DecodeError, EncodeError};

#[derive(Debug, Error)]
pub enum HealthError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashing(#[from] bcrypt::BcryptError),

    #[cfg(feature = "sled-errors")]
    #[error(transparent)]
    Sled(#[from] sled::Error),

    #[cfg(feature = "bincode-errors")]
    #[error(transparent)]
    BincodeDecode(#[from] DecodeError),

    #[cfg(feature = "bincode-errors")]
    #[error(transparent)]
    BincodeEncode(#[from] EncodeError),
}

impl HealthError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        HealthError::NotFound { entity, id: id.into() }
    }

    /// Shorthand for a single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.push(field, message);
        HealthError::Validation(errors)
    }
}

/// A single violated constraint on a payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every constraint a payload violated, in the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// Returns `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> ValidationResult<T> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, e) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A type alias for a `Result` that returns a `HealthError` on failure.
pub type HealthResult<T> = Result<T, HealthError>;

/// A type alias for a `Result` that returns `ValidationErrors` on failure.
pub type ValidationResult<T> = Result<T, ValidationErrors>;
