//! Message entity - A short message authored by a user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on the length of a message text, in characters
pub const MAX_MESSAGE_LENGTH: usize = 140;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Message {
    pub id: i32,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i32,
}

impl Message {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}
