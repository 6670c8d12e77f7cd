//! Session - Client-side session stored in a signed cookie
//!
//! The cookie holds an HS256 JWT whose claims are the id of the logged-in
//! user and the pending flash messages. A missing, tampered or expired cookie
//! reads as an empty session. Handlers receive the session as an extractor and
//! write it back on every response they build through it.

use crate::core::{AppError, AppState};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "warbler_session";

/// Flash shown whenever a route refuses the current session
pub const ACCESS_UNAUTHORIZED: &str = "Access unauthorized.";

const SESSION_TTL_HOURS: i64 = 24;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Warning,
    Danger,
}

impl fmt::Display for FlashCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        };
        f.write_str(name)
    }
}

/// One-shot notification, removed from the session by the next rendered page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

// struct che codifica il contenuto del cookie di sessione
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub exp: usize, // Expiry time of the session
    pub iat: usize, // Time of the last write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curr_user: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<Flash>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    curr_user: Option<i32>,
    flashes: Vec<Flash>,
}

impl Session {
    /// Id stored under the current-user key, if any
    pub fn user_id(&self) -> Option<i32> {
        self.curr_user
    }

    pub fn login(&mut self, user_id: i32) {
        self.curr_user = Some(user_id);
    }

    pub fn logout(&mut self) {
        self.curr_user = None;
    }

    pub fn flash(&mut self, category: FlashCategory, message: impl Into<String>) {
        self.flashes.push(Flash {
            category,
            message: message.into(),
        });
    }

    /// Removes the pending flashes, so they are shown exactly once
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }

    pub fn is_empty(&self) -> bool {
        self.curr_user.is_none() && self.flashes.is_empty()
    }

    /// Reads the session cookie out of the request headers
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Self {
        let Some(token) = session_token(headers) else {
            return Self::default();
        };
        if token.is_empty() {
            return Self::default();
        }

        decode_session(token, secret).unwrap_or_else(|_| {
            warn!("Discarding invalid session cookie");
            Self::default()
        })
    }

    /// `Set-Cookie` value persisting this session, or clearing the cookie
    /// when there is nothing left to store
    pub fn set_cookie(&self, secret: &str) -> Result<HeaderValue, AppError> {
        let cookie = if self.is_empty() {
            format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
        } else {
            let token = encode_session(self, secret)?;
            format!(
                "{SESSION_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
                token,
                SESSION_TTL_HOURS * 60 * 60
            )
        };

        HeaderValue::from_str(&cookie).map_err(|e| {
            AppError::internal_server_error("Session encoding error").with_details(e.to_string())
        })
    }

    /// `303 See Other` to `to`, carrying the session
    pub fn redirect(&self, secret: &str, to: &str) -> Result<Response, AppError> {
        self.respond(secret, Redirect::to(to))
    }

    /// Attaches the session cookie to `body`
    pub fn respond(&self, secret: &str, body: impl IntoResponse) -> Result<Response, AppError> {
        let cookie = self.set_cookie(secret)?;
        Ok(([(header::SET_COOKIE, cookie)], body).into_response())
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Session::from_headers(&parts.headers, &state.secret_key))
    }
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
}

#[instrument(skip(session, secret), fields(curr_user = ?session.curr_user))]
pub fn encode_session(session: &Session, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    debug!("Encoding session cookie");
    let now = Utc::now();
    let expire = Duration::hours(SESSION_TTL_HOURS);
    let claims = SessionClaims {
        exp: (now + expire).timestamp() as usize,
        iat: now.timestamp() as usize,
        curr_user: session.curr_user,
        flashes: session.flashes.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[instrument(skip(token, secret))]
pub fn decode_session(token: &str, secret: &str) -> Result<Session, jsonwebtoken::errors::Error> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(Session {
        curr_user: data.claims.curr_user,
        flashes: data.claims.flashes,
    })
}
