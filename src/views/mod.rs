//! View models for the HTML pages
//!
//! Each view is an askama template struct. Handlers build one from entities
//! and DTOs, then hand it to [`render`]. Every page extends `base.html`, which
//! reads the [`Layout`] for the navigation bar and the flash messages.

pub mod error;
pub mod forms;
pub mod home;
pub mod messages;
pub mod users;

pub use error::ErrorView;
pub use forms::{LoginView, MessageFormView, ProfileEditView, SignupView};
pub use home::{AnonHomeView, HomeView};
pub use messages::MessageDetailView;
pub use users::{UserDetailView, UserListView};

use crate::core::{AppError, Flash, Session};
use crate::entities::User;
use askama::Template;
use axum::response::Html;

/// Data every page needs: who is logged in and what to notify
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub current_user: Option<User>,
    pub flashes: Vec<Flash>,
}

impl Layout {
    /// Consumes the pending flashes of `session`
    pub fn new(current_user: Option<User>, session: &mut Session) -> Self {
        Self {
            current_user,
            flashes: session.take_flashes(),
        }
    }
}

/// Render a template into an HTML body
pub fn render<T: Template>(template: T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}
