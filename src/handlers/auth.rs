use actix_web::{cookie::Cookie, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::models::{LoginRequest, RegisterRequest, Role, User};
use crate::session::{Session, SessionRegistry, SessionUser, SESSION_COOKIE};
use crate::store::Store;

/// Registration always creates a customer; admins are seeded out-of-band.
/// A duplicate username is left to the unique constraint and surfaces as a
/// database error.
pub async fn register(
    request: web::Json<RegisterRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let (username, password, email) = match (
        nonempty(request.username),
        nonempty(request.password),
        nonempty(request.email),
    ) {
        (Some(username), Some(password), Some(email)) => (username, password, email),
        _ => return Err(ApiError::Validation),
    };

    let password_hash = hash(&password, DEFAULT_COST)?;
    store
        .insert_user(User {
            username: username.clone(),
            password_hash,
            role: Role::Customer,
            email,
        })
        .await?;
    info!(%username, "user registered");
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Compares against the stored bcrypt hash. A failed login leaves the
/// session anonymous.
pub async fn login(
    request: web::Json<LoginRequest>,
    store: web::Data<dyn Store>,
    sessions: web::Data<SessionRegistry>,
    session: Session,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest { username, password } = request.into_inner();
    let user = store
        .find_user(username)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    if !verify(&password, &user.password_hash).unwrap_or(false) {
        return Err(ApiError::Unauthorized);
    }

    // A re-login replaces any session the old cookie pointed at.
    if let Some(old) = session.id.as_deref() {
        sessions.close(old);
    }
    let role = user.role;
    let id = sessions.open(SessionUser {
        username: user.username.clone(),
        role,
    });
    info!(username = %user.username, role = role.as_str(), "login");

    let cookie = Cookie::build(SESSION_COOKIE, id)
        .path("/")
        .http_only(true)
        .finish();
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "ok": true, "role": role })))
}

/// Unconditional and idempotent; answers ok whether or not a session existed.
pub async fn logout(session: Session, sessions: web::Data<SessionRegistry>) -> HttpResponse {
    if let Some(id) = session.id.as_deref() {
        sessions.close(id);
    }
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();
    HttpResponse::Ok()
        .cookie(removal)
        .json(json!({ "ok": true }))
}

fn nonempty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}
