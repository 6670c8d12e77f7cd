//! Auth services - Signup, login and logout

use super::validation_message;
use crate::core::{AppError, AppState, FlashCategory, Session, current_user};
use crate::dtos::{LoginForm, SignupForm};
use crate::views::{Layout, LoginView, SignupView, render};
use axum::{
    extract::{Form, State},
    response::Response,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

async fn render_signup(
    state: &AppState,
    mut session: Session,
    form: Option<&SignupForm>,
) -> Result<Response, AppError> {
    let user = current_user(state, &session).await?;
    let view = SignupView {
        layout: Layout::new(user, &mut session),
        username: form.map(|f| f.username.clone()).unwrap_or_default(),
        email: form.map(|f| f.email.clone()).unwrap_or_default(),
        image_url: form.and_then(|f| f.image_url.clone()).unwrap_or_default(),
    };
    session.respond(&state.secret_key, render(view)?)
}

async fn render_login(
    state: &AppState,
    mut session: Session,
    username: &str,
) -> Result<Response, AppError> {
    let user = current_user(state, &session).await?;
    let view = LoginView {
        layout: Layout::new(user, &mut session),
        username: username.to_string(),
    };
    session.respond(&state.secret_key, render(view)?)
}

pub async fn signup_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, AppError> {
    render_signup(&state, session, None).await
}

#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    // 1. Validare il form (lunghezze, formato email)
    // 2. Creare l'utente con la password hashata
    // 3. Username o email già presenti -> form di nuovo con flash
    // 4. Login del nuovo utente e redirect alla home
    if let Err(e) = form.validate() {
        warn!("Signup form rejected: {}", e);
        session.flash(FlashCategory::Danger, validation_message(&e));
        return render_signup(&state, session, Some(&form)).await;
    }

    let created = state
        .user
        .signup(
            &form.username,
            &form.email,
            &form.password,
            form.image_url.as_deref(),
        )
        .await;

    match created {
        Ok(user) => {
            info!("User {} signed up", user.id);
            session.login(user.id);
            session.redirect(&state.secret_key, "/")
        }
        Err(e) if e.is_duplicate_key() => {
            warn!("Signup rejected: {}", e);
            session.flash(FlashCategory::Danger, "Username already taken");
            render_signup(&state, session, Some(&form)).await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, AppError> {
    render_login(&state, session, "").await
}

#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if let Err(e) = form.validate() {
        session.flash(FlashCategory::Danger, validation_message(&e));
        return render_login(&state, session, &form.username).await;
    }

    match state.user.authenticate(&form.username, &form.password).await? {
        Some(user) => {
            info!("User {} logged in", user.id);
            session.login(user.id);
            session.flash(FlashCategory::Success, format!("Hello, {}!", user.username));
            session.redirect(&state.secret_key, "/")
        }
        None => {
            warn!("Invalid credentials");
            session.flash(FlashCategory::Danger, "Invalid credentials.");
            render_login(&state, session, &form.username).await
        }
    }
}

#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<Response, AppError> {
    if let Some(user_id) = session.user_id() {
        info!("User {} logged out", user_id);
    }
    session.logout();
    session.flash(FlashCategory::Success, "Successfully logged out.");
    session.redirect(&state.secret_key, "/login")
}
