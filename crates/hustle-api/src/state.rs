use std::sync::Arc;

use anyhow::anyhow;
use axum::http::HeaderMap;
use tracing::error;

use hustle_db::Database;

use crate::error::ApiError;
use crate::session::{SessionStore, SessionUser, session_id};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionStore,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self {
            db,
            sessions: SessionStore::new(),
        })
    }

    /// The user whose session the request carries, if it is still live.
    pub fn current_user(&self, headers: &HeaderMap) -> Option<SessionUser> {
        session_id(headers).and_then(|id| self.sessions.get(&id))
    }
}

/// Run blocking database work off the async runtime.
pub async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("blocking task failed: {e}"))
        })?
        .map_err(ApiError::Internal)
}
