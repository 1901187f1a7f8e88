//! Error taxonomy for the HTTP layer. Database failures are logged
//! server-side and answered with a generic body so details never reach the
//! client.

use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required field")]
    Validation,
    #[error("no matching row")]
    NotFound,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("role not permitted")]
    Forbidden,
    #[error("login required")]
    LoginRequired,
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Database(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::LoginRequired => StatusCode::FOUND,
            ApiError::Hashing(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation => bad("Missing fields", StatusCode::BAD_REQUEST),
            ApiError::NotFound => bad("Not found", StatusCode::NOT_FOUND),
            ApiError::Unauthorized => bad("Invalid credentials", StatusCode::UNAUTHORIZED),
            ApiError::Forbidden => HttpResponse::Forbidden().body("Forbidden"),
            // Unauthenticated page hits bounce to the login form.
            ApiError::LoginRequired => HttpResponse::Found()
                .insert_header((header::LOCATION, "/login.html"))
                .finish(),
            ApiError::Hashing(cause) => {
                error!(%cause, "password hashing failed");
                bad("Internal error", StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Database(cause) => {
                error!(%cause, "database error");
                bad("Database error", StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

fn bad(message: &str, status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_taxonomy() {
        assert_eq!(ApiError::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::LoginRequired.status_code(), StatusCode::FOUND);
    }

    #[test]
    fn login_required_redirects_to_the_login_page() {
        let resp = ApiError::LoginRequired.error_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login.html"
        );
    }

    #[test]
    fn database_error_body_is_generic() {
        let resp = ApiError::Database(StoreError::Canceled).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
