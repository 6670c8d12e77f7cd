//! Entities module - Domain entities
//!
//! Every entity maps one table of the database. Relationship collections are
//! not loaded lazily: they are read through the repositories.

pub mod follows;
pub mod message;
pub mod user;

pub use follows::Follows;
pub use message::{MAX_MESSAGE_LENGTH, Message};
pub use user::User;
