//! Warbler - a small social network: users, short messages and follows.
//!
//! The library exposes the router so the binary and the integration tests
//! build the exact same application.

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod views;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, config};
pub use services::homepage;

use axum::{Router, middleware, routing::{get, post}};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(homepage))
        .merge(configure_auth_routes())
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/messages", configure_message_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Signup, login and logout: public
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

/// User routes. Listing and profiles are public, the rest goes through the
/// authentication middleware
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let public_routes = Router::new()
        .route("/", get(list_users))
        .route("/{user_id}", get(show_user));

    let private_routes = Router::new()
        .route("/{user_id}/following", get(show_following))
        .route("/{user_id}/followers", get(show_followers))
        .route("/follow/{follow_id}", post(follow_user))
        .route("/stop-following/{follow_id}", post(stop_following))
        .route("/profile", get(edit_profile_form).post(edit_profile))
        .route("/delete", post(delete_user))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(private_routes)
}

/// Message routes. Reading one message is public
fn configure_message_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let public_routes = Router::new().route("/{message_id}", get(show_message));

    let private_routes = Router::new()
        .route("/new", get(new_message_form).post(create_message))
        .route("/{message_id}/delete", post(delete_message))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(private_routes)
}
