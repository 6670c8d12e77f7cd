use crate::core::session::{ACCESS_UNAUTHORIZED, FlashCategory, Session};
use crate::core::{AppError, AppState};
use crate::entities::User;
use crate::repositories::Read;
use axum::extract::State;
use axum::{body::Body, extract::Request, http::Response, middleware::Next};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Loads the user named by the session, if it still exists
pub async fn current_user(state: &AppState, session: &Session) -> Result<Option<User>, AppError> {
    match session.user_id() {
        Some(user_id) => Ok(state.user.read(&user_id).await?),
        None => Ok(None),
    }
}

/// Flash "Access unauthorized." and send the browser back to the home page
pub fn deny_access(state: &AppState, mut session: Session) -> Result<Response<Body>, AppError> {
    session.flash(FlashCategory::Danger, ACCESS_UNAUTHORIZED);
    session.redirect(&state.secret_key, "/")
}

/// Gate for the private routes.
///
/// Without a valid session user the request never reaches the handler: the
/// browser is redirected to `/` with the "Access unauthorized." flash. With
/// one, the loaded `User` is inserted in the request extensions.
#[instrument(skip(state, req, next), fields(path = %req.uri().path()))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let mut session = Session::from_headers(req.headers(), &state.secret_key);

    let current_user = match current_user(&state, &session).await? {
        Some(user) => {
            info!("User authenticated: {}", user.username);
            user
        }
        None => {
            if let Some(stale_id) = session.user_id() {
                // l'utente è stato cancellato nel frattempo
                warn!("Session names user {} that no longer exists", stale_id);
                session.logout();
            } else {
                warn!("Missing session user");
            }
            return deny_access(&state, session);
        }
    };

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}
