//! DTOs module - Data Transfer Objects
//!
//! Forms posted by the browser, query strings, and the row shapes the
//! repositories read and write. They keep the HTTP representation apart from
//! the entities.

pub mod message;
pub mod query;
pub mod user;

pub use message::{CreateMessageDTO, MessageDTO, MessageForm};
pub use query::UserSearchQuery;
pub use user::{CreateUserDTO, LoginForm, ProfileForm, SignupForm, UpdateUserDTO, UserCardDTO};

use serde::{Deserialize, Deserializer};

/// HTML forms submit blank inputs as empty strings: treat those as missing.
pub fn empty_string_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(de)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
