//! Core Module - Infrastructure of the application
//!
//! - Session cookie and flash messages
//! - Authentication middleware
//! - Configuration
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

pub use auth::{authentication_middleware, current_user, deny_access};
pub use config::Config;
pub use error::AppError;
pub use session::{ACCESS_UNAUTHORIZED, Flash, FlashCategory, SESSION_COOKIE, Session};
pub use state::{AppState, connect_database};
