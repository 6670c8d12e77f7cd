//! User entity - User with password hashing helpers

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};

/// Image shown for users that never picked one
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

/// Banner shown on profiles without a custom header
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

/// Bounds bcrypt accepts for the hashing cost
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    // never leaves the server
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    /// Verify if target_password matches the stored hashed password.
    ///
    /// A stored value that is not a bcrypt hash never matches.
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with the given cost
    pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, cost)?;
        Ok(hash)
    }
}
