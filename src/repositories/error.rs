//! Storage errors
//!
//! Constraint violations get their own variants so callers can react to them
//! (re-render a form, ignore a repeated follow) without inspecting driver codes.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE or PRIMARY KEY constraint rejected the write
    #[error("duplicate key value violates unique constraint: {constraint}")]
    DuplicateKey { constraint: String },

    /// A FOREIGN KEY constraint rejected the write
    #[error("referenced row does not exist: {constraint}")]
    MissingReference { constraint: String },

    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.message().to_string();
            if db_err.is_unique_violation() || constraint.starts_with("UNIQUE constraint failed") {
                return Self::DuplicateKey { constraint };
            }
            if db_err.is_foreign_key_violation() || constraint.starts_with("FOREIGN KEY constraint failed") {
                return Self::MissingReference { constraint };
            }
        }
        Self::Database(err)
    }
}
