//! FollowsRepository - Repository for the follow graph
//!
//! Keys are `(follower_id, followed_id)` tuples.

use super::{Create, Delete, Read, StoreResult};
use crate::entities::{Follows, User};
use sqlx::SqlitePool;

// FOLLOWS REPO
pub struct FollowsRepository {
    connection_pool: SqlitePool,
}

impl FollowsRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// True iff `user_id` follows `other_id`
    pub async fn is_following(&self, user_id: &i32, other_id: &i32) -> StoreResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE user_following_id = ? AND user_being_followed_id = ?",
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count > 0)
    }

    /// True iff `other_id` follows `user_id`
    pub async fn is_followed_by(&self, user_id: &i32, other_id: &i32) -> StoreResult<bool> {
        self.is_following(other_id, user_id).await
    }

    /// Users following `user_id`
    pub async fn followers_of(&self, user_id: &i32) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.username, u.image_url, u.header_image_url, u.bio, u.location, u.password
            FROM users u
            JOIN follows f ON f.user_following_id = u.id
            WHERE f.user_being_followed_id = ?
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(users)
    }

    /// Users followed by `user_id`
    pub async fn following_of(&self, user_id: &i32) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.username, u.image_url, u.header_image_url, u.bio, u.location, u.password
            FROM users u
            JOIN follows f ON f.user_being_followed_id = u.id
            WHERE f.user_following_id = ?
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(users)
    }

    /// Ids of the users followed by `user_id`
    pub async fn following_ids(&self, user_id: &i32) -> StoreResult<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            "SELECT user_being_followed_id FROM follows WHERE user_following_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(ids)
    }

    pub async fn count_followers(&self, user_id: &i32) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE user_being_followed_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count)
    }

    pub async fn count_following(&self, user_id: &i32) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE user_following_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count)
    }
}

impl Create<Follows, Follows> for FollowsRepository {
    /// A repeated edge fails with `StoreError::DuplicateKey`
    async fn create(&self, data: &Follows) -> StoreResult<Follows> {
        sqlx::query(
            "INSERT INTO follows (user_being_followed_id, user_following_id) VALUES (?, ?)",
        )
        .bind(data.user_being_followed_id)
        .bind(data.user_following_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(*data)
    }
}

impl Read<Follows, (i32, i32)> for FollowsRepository {
    async fn read(&self, id: &(i32, i32)) -> StoreResult<Option<Follows>> {
        let (follower_id, followed_id) = id;
        let follows = sqlx::query_as::<_, Follows>(
            r#"
            SELECT user_being_followed_id, user_following_id
            FROM follows
            WHERE user_following_id = ? AND user_being_followed_id = ?
            "#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(follows)
    }
}

impl Delete<(i32, i32)> for FollowsRepository {
    async fn delete(&self, id: &(i32, i32)) -> StoreResult<()> {
        let (follower_id, followed_id) = id;
        sqlx::query(
            "DELETE FROM follows WHERE user_following_id = ? AND user_being_followed_id = ?",
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(())
    }
}
