//! User DTOs - Data Transfer Objects for users

use super::empty_string_as_none;
use crate::entities::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO to insert a new user (without id). `password` is already hashed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateUserDTO {
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
}

/// Update of a user profile.
///
/// `username`, `email` and the two image URLs are written only when `Some(_)`.
/// `bio` and `location` are always written: `None` clears them.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateUserDTO {
    pub username: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 50, message = "Username must be between 1 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "Image URL is too long"))]
    pub image_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Profile edit form. `password` is the current password, checked before saving.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 50, message = "Username must be between 1 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "Image URL is too long"))]
    pub image_url: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "Header image URL is too long"))]
    pub header_image_url: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub bio: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 100, message = "Location is too long"))]
    pub location: Option<String>,

    #[serde(default)]
    pub password: String,
}

impl From<ProfileForm> for UpdateUserDTO {
    fn from(value: ProfileForm) -> Self {
        Self {
            username: Some(value.username),
            email: Some(value.email),
            image_url: value.image_url,
            header_image_url: value.header_image_url,
            bio: value.bio,
            location: value.location,
        }
    }
}

/// A user as listed in follower/following/search pages
#[derive(Debug, Clone)]
pub struct UserCardDTO {
    pub user: User,
    /// Whether the viewer follows this user
    pub followed_by_viewer: bool,
}
