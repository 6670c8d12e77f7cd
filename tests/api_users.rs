//! Integration tests per gli endpoints /users
//!
//! Test per:
//! - GET /users (ricerca)
//! - GET /users/{id}, /users/{id}/following, /users/{id}/followers
//! - POST /users/follow/{id}, /users/stop-following/{id}
//! - GET|POST /users/profile
//! - POST /users/delete

mod common;

#[cfg(test)]
mod user_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use sqlx::SqlitePool;
    use std::sync::Arc;
    use warbler::core::AppState;
    use warbler::repositories::Read;

    // ============================================================
    // Test per GET /users
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_list_all_users(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/users").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("@testuser1"));
        assert!(html.contains("@testuser2"));
        assert!(html.contains("@testuser3"));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_search_users_by_partial_name(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/users").add_query_param("q", "user2").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("@testuser2"));
        assert!(!html.contains("@testuser1"));

        let response = server.get("/users").add_query_param("q", "nobody").await;
        assert!(response.text().contains("Sorry, no users found."));

        // i caratteri jolly di LIKE sono cercati letteralmente
        let response = server.get("/users").add_query_param("q", "_").await;
        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Sorry, no users found."));
        assert!(!html.contains("@testuser1"));

        Ok(())
    }

    // ============================================================
    // Test per GET /users/{id}
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "messages", "follows")))]
    async fn test_show_user(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/users/1").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("id=\"user-1\""));
        assert!(html.contains("First test user"));
        assert!(html.contains("Milano"));
        assert!(html.contains("first warble from testuser1"));
        assert!(!html.contains("hello from testuser2"));
        // anonimo: nessun pulsante follow
        assert!(!html.contains("/users/follow/1"));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_show_user_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/users/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("User not found"));

        Ok(())
    }

    // ============================================================
    // Test per GET /users/{id}/followers e /following
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "follows")))]
    async fn test_followers_page_logged_in(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .get("/users/2/followers")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("id=\"users-following\""));
        assert!(html.contains("user-card-1"));
        assert!(!html.contains("user-card-3"));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "follows")))]
    async fn test_following_page_logged_in(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .get("/users/1/following")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("user-card-2"));
        assert!(html.contains("/users/stop-following/2"));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "follows")))]
    async fn test_followers_page_logged_out(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/users/2/followers").await;

        assert_redirect(&response, "/");
        let home = follow_redirect(&server, &response).await;
        let html = home.text();
        assert!(html.contains("Access unauthorized."));
        assert!(!html.contains("user-card-1"));

        Ok(())
    }

    // ============================================================
    // Test per POST /users/follow/{id} e /users/stop-following/{id}
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "follows")))]
    async fn test_follow_and_unfollow(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());

        let response = server
            .post("/users/follow/3")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        assert_redirect(&response, "/users/1/following");
        assert!(state.follows.is_following(&1, &3).await.unwrap());
        assert!(!state.follows.is_following(&3, &1).await.unwrap());

        // un secondo follow non è un errore
        let response = server
            .post("/users/follow/3")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;
        assert_redirect(&response, "/users/1/following");

        let response = server
            .post("/users/stop-following/3")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        assert_redirect(&response, "/users/1/following");
        assert!(!state.follows.is_following(&1, &3).await.unwrap());
        assert!(state.follows.is_following(&1, &2).await.unwrap());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_follow_logged_out(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());

        let response = server.post("/users/follow/2").await;

        assert_redirect(&response, "/");
        assert_eq!(state.follows.count_followers(&2).await.unwrap(), 0);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_follow_missing_user(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .post("/users/follow/999")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_self_follow_rejected_by_default(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());

        let response = server
            .post("/users/follow/1")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        assert_redirect(&response, "/users/1/following");
        assert!(!state.follows.is_following(&1, &1).await.unwrap());
        let page = follow_redirect(&server, &response).await;
        assert!(page.text().contains("You cannot follow yourself."));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_self_follow_when_enabled(pool: SqlitePool) -> sqlx::Result<()> {
        let state = Arc::new(
            AppState::new(pool, TEST_SECRET.to_string())
                .with_hash_cost(MIN_BCRYPT_COST)
                .with_self_follow(true),
        );
        let server = create_test_server(state.clone());

        let response = server
            .post("/users/follow/1")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        assert_redirect(&response, "/users/1/following");
        assert!(state.follows.is_following(&1, &1).await.unwrap());

        Ok(())
    }

    // ============================================================
    // Test per GET|POST /users/profile
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_edit_profile_form_prefilled(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .get("/users/profile")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("value=\"testuser1\""));
        assert!(html.contains("value=\"test1@test.com\""));
        assert!(html.contains("First test user"));

        Ok(())
    }

    #[sqlx::test]
    async fn test_edit_profile(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());
        let cookie = signup(&server, "editbird", "password1").await;

        let response = server
            .post("/users/profile")
            .add_header(cookie_header(), cookie)
            .form(&[
                ("username", "editedbird"),
                ("email", "edited@warbler.test"),
                ("bio", "Chirping since today"),
                ("location", "Torino"),
                ("image_url", ""),
                ("header_image_url", ""),
                ("password", "password1"),
            ])
            .await;

        let user = state.user.find_by_username("editedbird").await.unwrap().unwrap();
        assert_redirect(&response, &format!("/users/{}", user.id));
        assert_eq!(user.email, "edited@warbler.test");
        assert_eq!(user.bio.as_deref(), Some("Chirping since today"));
        assert_eq!(user.location.as_deref(), Some("Torino"));
        assert!(!user.image_url.is_empty());

        Ok(())
    }

    #[sqlx::test]
    async fn test_edit_profile_blank_bio_clears_it(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());
        let cookie = signup(&server, "editbird", "password1").await;

        let edit = |bio: &'static str, location: &'static str| {
            server
                .post("/users/profile")
                .add_header(cookie_header(), cookie.clone())
                .form(&[
                    ("username", "editbird"),
                    ("email", "editbird@warbler.test"),
                    ("bio", bio),
                    ("location", location),
                    ("password", "password1"),
                ])
        };

        let response = edit("Chirping since today", "Torino").await;
        response.assert_status(StatusCode::SEE_OTHER);
        let user = state.user.find_by_username("editbird").await.unwrap().unwrap();
        assert_eq!(user.bio.as_deref(), Some("Chirping since today"));

        let response = edit("", "").await;
        response.assert_status(StatusCode::SEE_OTHER);
        let user = state.user.find_by_username("editbird").await.unwrap().unwrap();
        assert_eq!(user.bio, None);
        assert_eq!(user.location, None);

        Ok(())
    }

    #[sqlx::test]
    async fn test_edit_profile_wrong_password(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());
        let cookie = signup(&server, "editbird", "password1").await;

        let response = server
            .post("/users/profile")
            .add_header(cookie_header(), cookie)
            .form(&[
                ("username", "hijacked"),
                ("email", "editbird@warbler.test"),
                ("password", "not-my-password"),
            ])
            .await;

        assert_redirect(&response, "/");
        let home = follow_redirect(&server, &response).await;
        assert!(home.text().contains("Wrong password, please try again."));
        assert!(state.user.find_by_username("editbird").await.unwrap().is_some());
        assert!(state.user.find_by_username("hijacked").await.unwrap().is_none());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_edit_profile_logged_out(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/users/profile").await;

        assert_redirect(&response, "/");

        Ok(())
    }

    // ============================================================
    // Test per POST /users/delete
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "messages", "follows")))]
    async fn test_delete_user_cascades(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());

        let response = server
            .post("/users/delete")
            .add_header(cookie_header(), session_cookie_for(1))
            .await;

        assert_redirect(&response, "/signup");
        let page = follow_redirect(&server, &response).await;
        assert!(!page.text().contains("Log out"));

        assert!(state.user.read(&1).await.unwrap().is_none());
        assert!(state.msg.read(&1).await.unwrap().is_none());
        assert!(state.msg.read(&2).await.unwrap().is_none());
        assert!(state.msg.read(&3).await.unwrap().is_some());
        assert_eq!(state.follows.count_followers(&2).await.unwrap(), 0);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_delete_user_logged_out(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());

        let response = server.post("/users/delete").await;

        assert_redirect(&response, "/");
        assert!(state.user.read(&1).await.unwrap().is_some());

        Ok(())
    }
}

