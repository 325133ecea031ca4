pub mod avatar;
pub mod error;
pub mod livecomments;
pub mod middleware;
pub mod moderation;
pub mod ngwords;
pub mod profile;
pub mod reports;
pub mod spam;
pub mod state;

use axum::{
    Json, Router,
    routing::{get, post},
};

use crate::middleware::require_auth;
use crate::state::AppState;

/// Build the HTTP surface. Listing comments is public; everything else
/// goes through the session gate.
pub fn router(state: AppState) -> Router {
    let auth = axum::middleware::from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/livestream/{livestream_id}/livecomment",
            get(livecomments::get_livecomments)
                .merge(post(livecomments::post_livecomment).route_layer(auth.clone())),
        )
        .route(
            "/api/livestream/{livestream_id}/livecomment/{livecomment_id}/report",
            post(reports::report_livecomment).route_layer(auth.clone()),
        )
        .route(
            "/api/livestream/{livestream_id}/ngwords",
            get(ngwords::get_ng_words).route_layer(auth.clone()),
        )
        .route(
            "/api/livestream/{livestream_id}/moderate",
            post(ngwords::moderate).route_layer(auth),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
