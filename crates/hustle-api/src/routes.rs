use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::require_session;
use crate::state::AppState;
use crate::{auth, products, transactions};

/// All API routes. Static assets and outer layers are added by the server.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/checkLogin", get(auth::check_login))
        .route("/product/{id}", get(products::get_product))
        .route("/husky-hustle/sign-up-new-users", post(auth::sign_up))
        .route("/husky-hustle/display-all-Items", get(products::display_all_items))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/process-transaction", post(transactions::process_transaction))
        .route("/transactions", get(transactions::get_transactions))
        .route("/husky-hustle/postItems", post(products::post_items))
        .route("/husky-hustle/posted-items-curUser", get(products::posted_items))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
