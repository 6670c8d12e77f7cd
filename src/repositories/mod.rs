//! Repositories module - One repository per table
//!
//! Each repository owns a clone of the connection pool and runs its queries
//! directly against it: every write is a single statement, so a failed write
//! never leaves a half-applied change behind.
//!
//! Queries are built with `sqlx::query_as::<_, T>` and bound at runtime, which
//! keeps the crate buildable without a live database.

// ************************* MODULI REPOSITORY ************************* //

pub mod error;
pub mod follows;
pub mod message;
pub mod traits;
pub mod user;

pub use error::{StoreError, StoreResult};
pub use traits::{Create, Delete, Read, Update};

pub use follows::FollowsRepository;
pub use message::MessageRepository;
pub use user::UserRepository;
