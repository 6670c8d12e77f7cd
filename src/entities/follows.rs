//! Follows entity - Directed edge of the follow graph

use serde::{Deserialize, Serialize};

/// `user_following_id` follows `user_being_followed_id`.
///
/// The pair is the primary key of the table, so an edge exists at most once.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct Follows {
    pub user_being_followed_id: i32,
    pub user_following_id: i32,
}

impl Follows {
    pub fn new(user_following_id: i32, user_being_followed_id: i32) -> Self {
        Self {
            user_being_followed_id,
            user_following_id,
        }
    }

    pub fn is_self_follow(&self) -> bool {
        self.user_following_id == self.user_being_followed_id
    }
}
