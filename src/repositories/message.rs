//! MessageRepository - Repository for messages

use super::{Create, Delete, Read, StoreResult};
use crate::dtos::{CreateMessageDTO, MessageDTO};
use crate::entities::Message;
use sqlx::SqlitePool;

/// Number of messages shown on the home timeline
pub const TIMELINE_LIMIT: i64 = 100;

// MESSAGE REPO
pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Messages authored by `user_id`, newest first
    pub async fn find_many_by_user_id(&self, user_id: &i32) -> StoreResult<Vec<MessageDTO>> {
        let messages = sqlx::query_as::<_, MessageDTO>(
            r#"
            SELECT
                m.id,
                m.text,
                m.timestamp,
                m.user_id,
                u.username,
                u.image_url
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.user_id = ?
            ORDER BY m.timestamp DESC, m.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(messages)
    }

    /// Home timeline of `user_id`: the newest `limit` messages written by the
    /// user or by anyone the user follows
    pub async fn timeline(&self, user_id: &i32, limit: i64) -> StoreResult<Vec<MessageDTO>> {
        let messages = sqlx::query_as::<_, MessageDTO>(
            r#"
            SELECT
                m.id,
                m.text,
                m.timestamp,
                m.user_id,
                u.username,
                u.image_url
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.user_id = ?
               OR m.user_id IN (
                    SELECT user_being_followed_id FROM follows WHERE user_following_id = ?
               )
            ORDER BY m.timestamp DESC, m.id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(messages)
    }

    pub async fn count_by_user_id(&self, user_id: &i32) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count)
    }
}

impl Create<Message, CreateMessageDTO> for MessageRepository {
    async fn create(&self, data: &CreateMessageDTO) -> StoreResult<Message> {
        let result = sqlx::query("INSERT INTO messages (text, timestamp, user_id) VALUES (?, ?, ?)")
            .bind(&data.text)
            .bind(data.timestamp)
            .bind(data.user_id)
            .execute(&self.connection_pool)
            .await?;

        let new_id = result.last_insert_rowid() as i32;

        Ok(Message {
            id: new_id,
            text: data.text.clone(),
            timestamp: data.timestamp,
            user_id: data.user_id,
        })
    }
}

impl Read<Message, i32> for MessageRepository {
    async fn read(&self, id: &i32) -> StoreResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT id, text, timestamp, user_id FROM messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(message)
    }
}

impl Delete<i32> for MessageRepository {
    async fn delete(&self, id: &i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
