//! Cookie-carried sessions. The registry holds `{username, role}` per
//! session id; a request is either anonymous or fully authenticated, never
//! in between. State machine:
//! `Anonymous --login ok--> Authenticated(role) --logout--> Anonymous`.

use std::collections::HashMap;
use std::future::{ready, Ready};
use std::sync::RwLock;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Role;

pub const SESSION_COOKIE: &str = "bookstore_sid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
}

/// Process-local session store keyed by the cookie-carried id. Swappable
/// for an external store later; nothing outside this module touches the map.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionUser>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh session for `user` and returns its id.
    pub fn open(&self, user: SessionUser) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .expect("session registry lock poisoned")
            .insert(id.clone(), user);
        id
    }

    pub fn get(&self, id: &str) -> Option<SessionUser> {
        self.sessions
            .read()
            .expect("session registry lock poisoned")
            .get(id)
            .cloned()
    }

    /// Idempotent; closing an unknown or already-closed id is fine.
    pub fn close(&self, id: &str) {
        self.sessions
            .write()
            .expect("session registry lock poisoned")
            .remove(id);
    }
}

/// Request-scoped view of the caller's session, resolved from the cookie at
/// extraction time. A stale or missing cookie yields an anonymous session.
pub struct Session {
    pub id: Option<String>,
    user: Option<SessionUser>,
}

impl Session {
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req
            .cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string());
        let user = match (req.app_data::<web::Data<SessionRegistry>>(), id.as_deref()) {
            (Some(registry), Some(id)) => registry.get(id),
            _ => None,
        };
        ready(Ok(Session { id, user }))
    }
}

/// Passes through only when the session holds a user; anonymous callers are
/// redirected to the login page.
pub fn require_login(session: &Session) -> Result<&SessionUser, ApiError> {
    session.user().ok_or(ApiError::LoginRequired)
}

/// Exact role match, or 403. Runs after `require_login`, so an anonymous
/// request to a role-gated page redirects instead of being forbidden.
pub fn require_role(user: &SessionUser, role: Role) -> Result<(), ApiError> {
    if user.role == role {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> SessionUser {
        SessionUser {
            username: "alice".to_string(),
            role: Role::Customer,
        }
    }

    #[test]
    fn open_then_get_then_close() {
        let registry = SessionRegistry::new();
        let id = registry.open(customer());
        assert_eq!(registry.get(&id), Some(customer()));
        registry.close(&id);
        assert_eq!(registry.get(&id), None);
        // closing again is a no-op
        registry.close(&id);
    }

    #[test]
    fn sessions_do_not_collide() {
        let registry = SessionRegistry::new();
        let a = registry.open(customer());
        let b = registry.open(SessionUser {
            username: "bob".to_string(),
            role: Role::Admin,
        });
        assert_ne!(a, b);
        assert_eq!(registry.get(&a).unwrap().username, "alice");
        assert_eq!(registry.get(&b).unwrap().role, Role::Admin);
    }

    #[test]
    fn guards_compose_login_before_role() {
        let anonymous = Session {
            id: None,
            user: None,
        };
        assert!(matches!(
            require_login(&anonymous),
            Err(ApiError::LoginRequired)
        ));

        let session = Session {
            id: Some("sid".to_string()),
            user: Some(customer()),
        };
        let user = require_login(&session).unwrap();
        assert!(require_role(user, Role::Customer).is_ok());
        assert!(matches!(
            require_role(user, Role::Admin),
            Err(ApiError::Forbidden)
        ));
    }
}
