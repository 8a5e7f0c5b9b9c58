use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "hustle_session";

/// The authenticated user behind a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
}

/// Per-client sessions keyed by an opaque random id.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionUser>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, user: SessionUser) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().insert(id, user);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<SessionUser> {
        self.lock().get(id).cloned()
    }

    pub fn remove(&self, id: &Uuid) -> Option<SessionUser> {
        self.lock().remove(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionUser>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Session id from the session cookie, falling back to a bearer token.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    let jar = CookieJar::from_headers(headers);
    if let Some(id) = jar.get(SESSION_COOKIE).and_then(|c| c.value().parse().ok()) {
        return Some(id);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .and_then(|token| token.trim().parse().ok())
}

pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
