use crate::repositories::StoreError;
use crate::views::ErrorView;
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use tracing::{error, warn};

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),

            sqlx::Error::Database(db_err) => {
                Self::bad_request("Database error").with_details(db_err.message().to_string())
            }

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::service_unavailable("Database unavailable")
            }

            other => Self::internal_server_error("Internal server error").with_details(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { constraint } => {
                Self::conflict("Already exists").with_details(constraint)
            }
            StoreError::MissingReference { constraint } => {
                Self::bad_request("Referenced resource does not exist").with_details(constraint)
            }
            StoreError::Hash(e) => {
                Self::internal_server_error("Failed to hash password").with_details(e.to_string())
            }
            StoreError::Database(e) => e.into(),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        Self::internal_server_error("Template rendering error").with_details(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::internal_server_error("Session encoding error").with_details(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // i dettagli restano nei log, al client arriva solo il messaggio
        if self.status.is_server_error() {
            error!(status = %self.status, details = ?self.details, "{}", self.message);
        } else {
            warn!(status = %self.status, details = ?self.details, "{}", self.message);
        }

        let view = ErrorView {
            status: self.status.as_u16(),
            message: self.message,
        };

        match view.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(e) => {
                error!("Error page rendering failed: {}", e);
                (self.status, self.message).into_response()
            }
        }
    }
}
