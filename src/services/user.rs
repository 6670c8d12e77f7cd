//! User services - Profiles, follow graph and account management

use super::validation_message;
use crate::core::{AppError, AppState, FlashCategory, Session, current_user};
use crate::dtos::{ProfileForm, UpdateUserDTO, UserCardDTO, UserSearchQuery};
use crate::entities::{Follows, User};
use crate::repositories::{Create, Delete, Read, Update};
use crate::views::{Layout, ProfileEditView, UserDetailView, UserListView, render};
use axum::{
    Extension,
    extract::{Form, Path, Query, State},
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Marks which of `users` the viewer follows
async fn user_cards(
    state: &AppState,
    viewer: Option<&User>,
    users: Vec<User>,
) -> Result<Vec<UserCardDTO>, AppError> {
    let followed = match viewer {
        Some(viewer) => state.follows.following_ids(&viewer.id).await?,
        None => Vec::new(),
    };

    Ok(users
        .into_iter()
        .map(|user| UserCardDTO {
            followed_by_viewer: followed.contains(&user.id),
            user,
        })
        .collect())
}

async fn render_user_list(
    state: &AppState,
    mut session: Session,
    viewer: Option<User>,
    heading: String,
    users: Vec<User>,
) -> Result<Response, AppError> {
    let users = user_cards(state, viewer.as_ref(), users).await?;
    let view = UserListView {
        heading,
        users,
        logged_in: viewer.is_some(),
        viewer_id: viewer.as_ref().map(|v| v.id).unwrap_or_default(),
        layout: Layout::new(viewer, &mut session),
    };
    session.respond(&state.secret_key, render(view)?)
}

async fn find_user(state: &AppState, user_id: i32) -> Result<User, AppError> {
    state.user.read(&user_id).await?.ok_or_else(|| {
        warn!("User {} not found", user_id);
        AppError::not_found("User not found")
    })
}

#[instrument(skip(state, session), fields(q = ?params.q))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(params): Query<UserSearchQuery>, // query params /users?q=username
) -> Result<Response, AppError> {
    let viewer = current_user(&state, &session).await?;
    let users = state
        .user
        .search_by_username_partial(params.q.as_deref())
        .await?;
    info!("Found {} users matching search criteria", users.len());

    let heading = match &params.q {
        Some(q) => format!("Users matching \"{}\"", q),
        None => "Users".to_string(),
    };
    render_user_list(&state, session, viewer, heading, users).await
}

#[instrument(skip(state, session))]
pub async fn show_user(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Path(user_id): Path<i32>, // parametro dalla URL /users/{user_id}
) -> Result<Response, AppError> {
    let user = find_user(&state, user_id).await?;
    let viewer = current_user(&state, &session).await?;

    let messages = state.msg.find_many_by_user_id(&user.id).await?;
    let message_count = messages.len() as i64;
    let following_count = state.follows.count_following(&user.id).await?;
    let follower_count = state.follows.count_followers(&user.id).await?;

    let is_own_profile = viewer.as_ref().is_some_and(|v| v.id == user.id);
    let viewer_follows = match &viewer {
        Some(v) => state.follows.is_following(&v.id, &user.id).await?,
        None => false,
    };
    let can_follow = viewer.is_some() && (!is_own_profile || state.allow_self_follow);

    let view = UserDetailView {
        layout: Layout::new(viewer, &mut session),
        user,
        messages,
        message_count,
        following_count,
        follower_count,
        is_own_profile,
        viewer_follows,
        can_follow,
    };
    session.respond(&state.secret_key, render(view)?)
}

#[instrument(skip(state, session, current_user), fields(viewer = current_user.id))]
pub async fn show_following(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(current_user): Extension<User>, // inserito dall'authentication_middleware
    Path(user_id): Path<i32>,
) -> Result<Response, AppError> {
    let user = find_user(&state, user_id).await?;
    let following = state.follows.following_of(&user.id).await?;
    debug!("User {} follows {} users", user.id, following.len());

    let heading = format!("@{} is following", user.username);
    render_user_list(&state, session, Some(current_user), heading, following).await
}

#[instrument(skip(state, session, current_user), fields(viewer = current_user.id))]
pub async fn show_followers(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i32>,
) -> Result<Response, AppError> {
    let user = find_user(&state, user_id).await?;
    let followers = state.follows.followers_of(&user.id).await?;
    debug!("User {} has {} followers", user.id, followers.len());

    let heading = format!("@{}'s followers", user.username);
    render_user_list(&state, session, Some(current_user), heading, followers).await
}

#[instrument(skip(state, session, current_user), fields(user_id = current_user.id))]
pub async fn follow_user(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Extension(current_user): Extension<User>,
    Path(follow_id): Path<i32>,
) -> Result<Response, AppError> {
    // 1. L'utente da seguire deve esistere
    // 2. Seguire sé stessi è permesso solo se abilitato in configurazione
    // 3. Un follow già presente non è un errore
    let followed = find_user(&state, follow_id).await?;
    let edge = Follows::new(current_user.id, followed.id);
    let back_to = format!("/users/{}/following", current_user.id);

    if edge.is_self_follow() && !state.allow_self_follow {
        warn!("Self follow rejected");
        session.flash(FlashCategory::Warning, "You cannot follow yourself.");
        return session.redirect(&state.secret_key, &back_to);
    }

    match state.follows.create(&edge).await {
        Ok(_) => info!("User {} now follows {}", current_user.id, followed.id),
        Err(e) if e.is_duplicate_key() => debug!("Already following {}", followed.id),
        Err(e) => return Err(e.into()),
    }

    session.redirect(&state.secret_key, &back_to)
}

#[instrument(skip(state, session, current_user), fields(user_id = current_user.id))]
pub async fn stop_following(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(current_user): Extension<User>,
    Path(follow_id): Path<i32>,
) -> Result<Response, AppError> {
    state.follows.delete(&(current_user.id, follow_id)).await?;
    info!("User {} stopped following {}", current_user.id, follow_id);

    session.redirect(
        &state.secret_key,
        &format!("/users/{}/following", current_user.id),
    )
}

fn profile_view(layout: Layout, user_id: i32, form: &ProfileForm) -> ProfileEditView {
    ProfileEditView {
        layout,
        user_id,
        username: form.username.clone(),
        email: form.email.clone(),
        image_url: form.image_url.clone().unwrap_or_default(),
        header_image_url: form.header_image_url.clone().unwrap_or_default(),
        bio: form.bio.clone().unwrap_or_default(),
        location: form.location.clone().unwrap_or_default(),
    }
}

pub async fn edit_profile_form(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Extension(current_user): Extension<User>,
) -> Result<Response, AppError> {
    let view = ProfileEditView {
        user_id: current_user.id,
        username: current_user.username.clone(),
        email: current_user.email.clone(),
        image_url: current_user.image_url.clone(),
        header_image_url: current_user.header_image_url.clone(),
        bio: current_user.bio.clone().unwrap_or_default(),
        location: current_user.location.clone().unwrap_or_default(),
        layout: Layout::new(Some(current_user), &mut session),
    };
    session.respond(&state.secret_key, render(view)?)
}

#[instrument(skip(state, session, current_user, form), fields(user_id = current_user.id))]
pub async fn edit_profile(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Extension(current_user): Extension<User>,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    // 1. Verificare la password attuale prima di qualunque modifica
    // 2. Validare il form
    // 3. Salvare, gestendo username/email già in uso
    if state
        .user
        .authenticate(&current_user.username, &form.password)
        .await?
        .is_none()
    {
        warn!("Wrong password on profile edit");
        session.flash(FlashCategory::Danger, "Wrong password, please try again.");
        return session.redirect(&state.secret_key, "/");
    }

    if let Err(e) = form.validate() {
        session.flash(FlashCategory::Danger, validation_message(&e));
        let view = profile_view(Layout::new(Some(current_user.clone()), &mut session), current_user.id, &form);
        return session.respond(&state.secret_key, render(view)?);
    }

    let user_id = current_user.id;
    let changes = UpdateUserDTO::from(form.clone());
    match state.user.update(&user_id, &changes).await {
        Ok(updated) => {
            info!("Profile of user {} updated", updated.id);
            session.flash(FlashCategory::Success, "Profile updated.");
            session.redirect(&state.secret_key, &format!("/users/{}", updated.id))
        }
        Err(e) if e.is_duplicate_key() => {
            warn!("Profile update rejected: {}", e);
            session.flash(FlashCategory::Danger, "Username or email already taken");
            let view = profile_view(Layout::new(Some(current_user), &mut session), user_id, &form);
            session.respond(&state.secret_key, render(view)?)
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state, session, current_user), fields(user_id = current_user.id, username = %current_user.username))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Extension(current_user): Extension<User>,
) -> Result<Response, AppError> {
    info!("User account deletion initiated");
    // messaggi e follow spariscono con ON DELETE CASCADE
    state.user.delete(&current_user.id).await?;

    session.logout();
    session.flash(FlashCategory::Info, "Your account has been deleted.");
    info!("Account deleted successfully");
    session.redirect(&state.secret_key, "/signup")
}
