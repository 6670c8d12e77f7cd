#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use sqlx::SqlitePool;
use std::sync::Arc;
use warbler::core::{AppState, SESSION_COOKIE};
pub use warbler::entities::user::MIN_BCRYPT_COST;

pub const TEST_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Crea un AppState per i test
///
/// # Arguments
/// * `pool` - Connection pool SQLite creato da `#[sqlx::test]`
///
/// # Returns
/// Arc<AppState> con il secret di test e il costo bcrypt minimo
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_SECRET.to_string()).with_hash_cost(MIN_BCRYPT_COST))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = warbler::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Firma un cookie di sessione per `user_id`, come dopo un login
///
/// # Returns
/// Valore pronto per l'header `Cookie`
pub fn session_cookie_for(user_id: i32) -> HeaderValue {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        exp: usize,
        iat: usize,
        curr_user: i32,
    }

    let now = Utc::now();
    let claims = Claims {
        exp: (now + Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
        curr_user: user_id,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to create session token");

    HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}")).expect("valid cookie header")
}

pub fn cookie_header() -> HeaderName {
    HeaderName::from_static("cookie")
}

/// `name=value` part of the session `Set-Cookie`, if the response wrote one
pub fn session_from(response: &TestResponse) -> Option<HeaderValue> {
    let set_cookie = response.maybe_header("set-cookie")?;
    let pair = set_cookie.to_str().ok()?.split(';').next()?.to_string();
    HeaderValue::from_str(&pair).ok()
}

/// Asserts a `303 See Other` to `location`
pub fn assert_redirect(response: &TestResponse, location: &str) {
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), location);
}

/// Follows a redirect with the cookie the response set, like a browser would
pub async fn follow_redirect(server: &TestServer, response: &TestResponse) -> TestResponse {
    response.assert_status(StatusCode::SEE_OTHER);
    let location = response
        .header("location")
        .to_str()
        .expect("ascii location")
        .to_string();

    let request = server.get(&location);
    match session_from(response) {
        Some(cookie) => request.add_header(cookie_header(), cookie).await,
        None => request.await,
    }
}

/// Signs up `username` through the form and returns the session cookie
pub async fn signup(server: &TestServer, username: &str, password: &str) -> HeaderValue {
    let email = format!("{username}@warbler.test");
    let response = server
        .post("/signup")
        .form(&[
            ("username", username),
            ("email", email.as_str()),
            ("password", password),
        ])
        .await;

    assert_redirect(&response, "/");
    session_from(&response).expect("signup sets the session cookie")
}
