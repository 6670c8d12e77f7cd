//! Message services - Writing, reading and deleting messages

use super::validation_message;
use crate::core::{AppError, AppState, FlashCategory, Session, current_user, deny_access};
use crate::dtos::{CreateMessageDTO, MessageForm};
use crate::entities::{MAX_MESSAGE_LENGTH, Message, User};
use crate::repositories::{Create, Delete, Read};
use crate::views::{Layout, MessageDetailView, MessageFormView, render};
use axum::{
    Extension,
    extract::{Form, Path, State},
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

async fn find_message(state: &AppState, message_id: i32) -> Result<Message, AppError> {
    state.msg.read(&message_id).await?.ok_or_else(|| {
        warn!("Message {} not found", message_id);
        AppError::not_found("Message not found")
    })
}

pub async fn new_message_form(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Extension(current_user): Extension<User>,
) -> Result<Response, AppError> {
    let view = MessageFormView {
        layout: Layout::new(Some(current_user), &mut session),
        text: String::new(),
        max_length: MAX_MESSAGE_LENGTH,
    };
    session.respond(&state.secret_key, render(view)?)
}

#[instrument(skip(state, session, current_user, form), fields(user_id = current_user.id))]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Extension(current_user): Extension<User>, // inserito dall'authentication_middleware
    Form(form): Form<MessageForm>,
) -> Result<Response, AppError> {
    // 1. Validare il testo (1..=140 caratteri)
    // 2. L'autore è sempre l'utente della sessione, mai un campo del form
    // 3. Redirect al profilo dell'autore
    let new_message = CreateMessageDTO {
        user_id: current_user.id,
        text: form.text,
        timestamp: Utc::now(),
    };

    if let Err(e) = new_message.validate() {
        warn!("Message rejected: {}", e);
        session.flash(FlashCategory::Danger, validation_message(&e));
        let view = MessageFormView {
            layout: Layout::new(Some(current_user), &mut session),
            text: new_message.text,
            max_length: MAX_MESSAGE_LENGTH,
        };
        return session.respond(&state.secret_key, render(view)?);
    }

    let message = state.msg.create(&new_message).await?;
    info!("Message {} created", message.id);

    session.redirect(&state.secret_key, &format!("/users/{}", current_user.id))
}

#[instrument(skip(state, session))]
pub async fn show_message(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Path(message_id): Path<i32>,
) -> Result<Response, AppError> {
    let message = find_message(&state, message_id).await?;
    let author = state
        .user
        .read(&message.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let viewer = current_user(&state, &session).await?;

    let view = MessageDetailView {
        is_owner: viewer.as_ref().is_some_and(|v| message.is_owned_by(v.id)),
        layout: Layout::new(viewer, &mut session),
        message,
        author,
    };
    session.respond(&state.secret_key, render(view)?)
}

#[instrument(skip(state, session, current_user), fields(user_id = current_user.id))]
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(current_user): Extension<User>,
    Path(message_id): Path<i32>,
) -> Result<Response, AppError> {
    let message = find_message(&state, message_id).await?;

    if !message.is_owned_by(current_user.id) {
        warn!(
            "User {} tried to delete message {} owned by {}",
            current_user.id, message.id, message.user_id
        );
        return deny_access(&state, session);
    }

    state.msg.delete(&message.id).await?;
    debug!("Message {} deleted", message.id);

    session.redirect(&state.secret_key, &format!("/users/{}", current_user.id))
}
