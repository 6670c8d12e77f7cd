//! Services module - HTTP handlers
//!
//! Each sub-module handles the endpoints of one area of the site. Handlers
//! receive the [`Session`] explicitly, render a view or redirect, and always
//! write the session back through it.

pub mod auth;
pub mod message;
pub mod user;

pub use auth::{login, login_form, logout, signup, signup_form};
pub use message::{create_message, delete_message, new_message_form, show_message};
pub use user::{
    delete_user, edit_profile, edit_profile_form, follow_user, list_users, show_followers,
    show_following, show_user, stop_following,
};

use crate::core::{AppError, AppState, Session, current_user};
use crate::repositories::message::TIMELINE_LIMIT;
use crate::views::{AnonHomeView, HomeView, Layout, render};
use axum::{extract::State, response::Response};
use std::sync::Arc;
use tracing::{debug, instrument};
use validator::ValidationErrors;

/// Home page: the timeline for a logged-in user, the landing page otherwise
#[instrument(skip(state, session))]
pub async fn homepage(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<Response, AppError> {
    let Some(user) = current_user(&state, &session).await? else {
        // id di un utente che non esiste più: si riparte da una sessione anonima
        session.logout();
        let view = AnonHomeView {
            layout: Layout::new(None, &mut session),
        };
        return session.respond(&state.secret_key, render(view)?);
    };

    debug!("Loading timeline for user {}", user.id);
    let messages = state.msg.timeline(&user.id, TIMELINE_LIMIT).await?;
    let message_count = state.msg.count_by_user_id(&user.id).await?;
    let following_count = state.follows.count_following(&user.id).await?;
    let follower_count = state.follows.count_followers(&user.id).await?;

    let view = HomeView {
        layout: Layout::new(Some(user.clone()), &mut session),
        user,
        messages,
        message_count,
        following_count,
        follower_count,
    };
    session.respond(&state.secret_key, render(view)?)
}

/// Joins the messages of a failed form validation into one flash
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(" ")
}
