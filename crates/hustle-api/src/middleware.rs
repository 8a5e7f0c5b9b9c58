use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the request's session and expose the user as an extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = state
        .current_user(req.headers())
        .ok_or(ApiError::NotLoggedIn)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
