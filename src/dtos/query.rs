//! Query DTOs - Query string parameters

use serde::Deserialize;

/// `/users?q=...`
#[derive(Deserialize, Debug, Default)]
pub struct UserSearchQuery {
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub q: Option<String>,
}
