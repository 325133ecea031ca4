use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use livepipe_types::api::{Claims, ModerateRequest, ModerateResponse};

use crate::error::{ApiError, ApiResult};
use crate::moderation;
use crate::state::{AppState, blocking};

pub async fn get_ng_words(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(livestream_id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let words = blocking(&state, move |s| {
        s.db.read(|tx| moderation::list_ng_words(tx, claims.sub, livestream_id))
    })
    .await?;

    Ok(Json(words))
}

/// Register an NG word on the caller's own livestream and purge the
/// comments it hits.
pub async fn moderate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(livestream_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<ModerateRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let caller_id = claims.sub;

    let registration = blocking(&state, move |s| {
        s.db.write(|tx| moderation::register_ng_word(tx, caller_id, livestream_id, &req.ng_word))
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ModerateResponse {
            word_id: registration.word_id,
            purged_count: registration.purged_count,
        }),
    ))
}
