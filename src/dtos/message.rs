//! Message DTOs - Data Transfer Objects for messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A message joined with the author fields needed to display it
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct MessageDTO {
    pub id: i32,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i32,
    pub username: String,
    pub image_url: String,
}

/// DTO to insert a new message (without id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMessageDTO {
    pub user_id: i32,

    #[validate(length(min = 1, max = 140, message = "Message must be between 1 and 140 characters"))]
    pub text: String,

    pub timestamp: DateTime<Utc>,
}

/// Form posted to `/messages/new`. The author is always the session user.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct MessageForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 140, message = "Message must be between 1 and 140 characters"))]
    pub text: String,
}
