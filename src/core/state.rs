//! Application State - Shared application state
//!
//! Holds the repositories and the settings the handlers need. It is built
//! once at startup and never mutated afterwards.

use crate::core::Config;
use crate::repositories::{FollowsRepository, MessageRepository, UserRepository};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// State shared by every route and middleware
pub struct AppState {
    /// Repository for users
    pub user: UserRepository,

    /// Repository for messages
    pub msg: MessageRepository,

    /// Repository for the follow graph
    pub follows: FollowsRepository,

    /// Key signing the session cookie
    pub secret_key: String,

    /// Whether a user may follow themselves
    pub allow_self_follow: bool,
}

impl AppState {
    /// Builds the state over `pool` with the default bcrypt cost and
    /// self-follow disabled.
    pub fn new(pool: SqlitePool, secret_key: String) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            msg: MessageRepository::new(pool.clone()),
            follows: FollowsRepository::new(pool),
            secret_key,
            allow_self_follow: false,
        }
    }

    pub fn from_config(pool: SqlitePool, config: &Config) -> Self {
        Self::new(pool, config.secret_key.clone())
            .with_hash_cost(config.bcrypt_cost)
            .with_self_follow(config.allow_self_follow)
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.user = self.user.with_hash_cost(cost);
        self
    }

    pub fn with_self_follow(mut self, allow: bool) -> Self {
        self.allow_self_follow = allow;
        self
    }
}

/// Opens the pool (creating the SQLite file if needed) and applies the
/// migrations in `migrations/`
pub async fn connect_database(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    info!("Database ready, migrations applied");

    Ok(pool)
}
