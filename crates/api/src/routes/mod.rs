pub mod health;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /variants/resolve            POST  resolve a listing's active variant
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/variants/resolve", post(handlers::variants::resolve))
}
