//! UserRepository - Repository for users, signup and authentication

use super::{Create, Delete, Read, StoreResult, Update};
use crate::dtos::{CreateUserDTO, UpdateUserDTO};
use crate::entities::User;
use crate::entities::user::DEFAULT_IMAGE_URL;
use bcrypt::DEFAULT_COST;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

const USER_COLUMNS: &str =
    "id, email, username, image_url, header_image_url, bio, location, password";

/// Escapes the `LIKE` wildcards of `pattern`, so it matches literally
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// USER REPO
pub struct UserRepository {
    connection_pool: SqlitePool,
    hash_cost: u32,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self {
            connection_pool,
            hash_cost: DEFAULT_COST,
        }
    }

    /// bcrypt cost used by [`signup`](Self::signup)
    pub fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    /// Find user by exact username match
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// Search users whose username contains `pattern`, or every user when `None`
    pub async fn search_by_username_partial(&self, pattern: Option<&str>) -> StoreResult<Vec<User>> {
        let users = match pattern {
            Some(pattern) => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE username LIKE ? ESCAPE '\\' ORDER BY username"
                ))
                .bind(format!("%{}%", escape_like(pattern)))
                .fetch_all(&self.connection_pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY username"
                ))
                .fetch_all(&self.connection_pool)
                .await?
            }
        };

        Ok(users)
    }

    /// Hash the raw password and persist a new user.
    ///
    /// Fails with `StoreError::DuplicateKey` when the username or the email
    /// already belongs to someone.
    #[instrument(skip(self, password, image_url))]
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        image_url: Option<&str>,
    ) -> StoreResult<User> {
        debug!("Hashing password for new user");
        let hashed = User::hash_password(password, self.hash_cost)?;

        self.create(&CreateUserDTO {
            username: username.to_string(),
            email: email.to_string(),
            password: hashed,
            image_url: image_url.map(str::to_string),
        })
        .await
    }

    /// Returns the user when `username` exists and `password` matches its hash.
    ///
    /// Unknown username and wrong password both give `Ok(None)`.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> StoreResult<Option<User>> {
        let user = self.find_by_username(username).await?;
        Ok(user.filter(|u| u.verify_password(password)))
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> StoreResult<User> {
        let image_url = data
            .image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_IMAGE_URL);

        let result = sqlx::query(
            "INSERT INTO users (username, email, password, image_url) VALUES (?, ?, ?, ?)",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password)
        .bind(image_url)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;

        // header_image_url comes from the column default
        self.read(&new_id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }
}

impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Update<User, UpdateUserDTO, i32> for UserRepository {
    async fn update(&self, id: &i32, data: &UpdateUserDTO) -> StoreResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = COALESCE(?, username),
                email = COALESCE(?, email),
                image_url = COALESCE(?, image_url),
                header_image_url = COALESCE(?, header_image_url),
                bio = ?,
                location = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.image_url)
        .bind(&data.header_image_url)
        .bind(&data.bio)
        .bind(&data.location)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound.into());
        }

        self.read(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }
}

impl Delete<i32> for UserRepository {
    /// Messages and follow edges of the user go with it (ON DELETE CASCADE)
    async fn delete(&self, id: &i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::StoreError;

    fn repo(pool: SqlitePool) -> UserRepository {
        UserRepository::new(pool).with_hash_cost(crate::entities::user::MIN_BCRYPT_COST)
    }

    #[sqlx::test]
    async fn test_signup_then_authenticate(pool: SqlitePool) -> Result<(), StoreError> {
        let users = repo(pool);

        let user = users
            .signup("testuser", "test@test.com", "HASHED_PASSWORD", Some("image_url"))
            .await?;
        assert_ne!(user.password, "HASHED_PASSWORD", "password must be stored hashed");
        assert_eq!(user.image_url, "image_url");

        let auth_user = users.authenticate("testuser", "HASHED_PASSWORD").await?;
        assert_eq!(auth_user.map(|u| u.id), Some(user.id));
        Ok(())
    }

    #[sqlx::test]
    async fn test_signup_without_image_uses_default(pool: SqlitePool) -> Result<(), StoreError> {
        let user = repo(pool)
            .signup("testuser", "test@test.com", "HASHED_PASSWORD", None)
            .await?;

        assert_eq!(user.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(user.header_image_url, crate::entities::user::DEFAULT_HEADER_IMAGE_URL);
        Ok(())
    }

    #[sqlx::test]
    async fn test_authenticate_username_fail(pool: SqlitePool) -> Result<(), StoreError> {
        let users = repo(pool);
        users
            .signup("testuser", "test@test.com", "HASHED_PASSWORD", None)
            .await?;

        assert!(users.authenticate("testuse", "HASHED_PASSWORD").await?.is_none());
        Ok(())
    }

    #[sqlx::test]
    async fn test_authenticate_password_fail(pool: SqlitePool) -> Result<(), StoreError> {
        let users = repo(pool);
        users
            .signup("testuser", "test@test.com", "HASHED_PASSWORD", None)
            .await?;

        assert!(users.authenticate("testuser", "HASHED_PASSWOR").await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_duplicate_username_is_rejected(pool: SqlitePool) -> Result<(), StoreError> {
        let users = repo(pool);

        let err = users
            .create(&CreateUserDTO {
                username: "testuser1".to_string(),
                email: "other@test.com".to_string(),
                password: "HASHED_PASSWORD".to_string(),
                image_url: None,
            })
            .await
            .unwrap_err();

        assert!(err.is_duplicate_key(), "unexpected error: {err:?}");
        assert!(err.to_string().contains("duplicate key value violates unique constraint"));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_duplicate_email_is_rejected(pool: SqlitePool) -> Result<(), StoreError> {
        let err = repo(pool)
            .signup("brandnew", "test1@test.com", "HASHED_PASSWORD", None)
            .await
            .unwrap_err();

        assert!(err.is_duplicate_key(), "unexpected error: {err:?}");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_search_by_username_partial(pool: SqlitePool) -> Result<(), StoreError> {
        let users = repo(pool);

        assert_eq!(users.search_by_username_partial(None).await?.len(), 3);

        let found = users.search_by_username_partial(Some("user2")).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "testuser2");

        assert!(users.search_by_username_partial(Some("nobody")).await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("user_1"), "user\\_1");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_search_wildcards_match_literally(pool: SqlitePool) -> Result<(), StoreError> {
        let users = repo(pool);

        assert!(users.search_by_username_partial(Some("_")).await?.is_empty());
        assert!(users.search_by_username_partial(Some("%")).await?.is_empty());
        assert_eq!(users.search_by_username_partial(Some("user")).await?.len(), 3);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_update_keeps_missing_names_and_images(pool: SqlitePool) -> Result<(), StoreError> {
        let users = repo(pool);

        let updated = users
            .update(
                &1,
                &UpdateUserDTO {
                    bio: Some("new bio".to_string()),
                    location: Some("Milano".to_string()),
                    ..Default::default()
                },
            )
            .await?;

        assert_eq!(updated.bio.as_deref(), Some("new bio"));
        assert_eq!(updated.username, "testuser1");
        assert_eq!(updated.email, "test1@test.com");
        assert_eq!(updated.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(updated.location.as_deref(), Some("Milano"));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_update_without_bio_clears_it(pool: SqlitePool) -> Result<(), StoreError> {
        let users = repo(pool);

        let updated = users.update(&1, &UpdateUserDTO::default()).await?;

        assert_eq!(updated.bio, None);
        assert_eq!(updated.location, None);
        assert_eq!(updated.username, "testuser1");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_update_to_taken_username_is_rejected(pool: SqlitePool) -> Result<(), StoreError> {
        let err = repo(pool)
            .update(
                &1,
                &UpdateUserDTO {
                    username: Some("testuser2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_duplicate_key());
        Ok(())
    }
}
