use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::info;

use livepipe_db::Connection;
use livepipe_db::livecomments::{get_livecomment_context, insert_livecomment, list_livecomments};
use livepipe_db::queries::get_livestream;
use livepipe_types::api::{Claims, PostLivecommentRequest};
use livepipe_types::models::Livecomment;

use crate::avatar::FallbackAvatar;
use crate::error::{ApiError, ApiResult};
use crate::moderation;
use crate::profile;
use crate::state::{AppState, blocking};

#[derive(Debug, Deserialize)]
pub struct LivecommentQuery {
    /// Maximum number of comments to return, newest first.
    pub limit: Option<String>,
}

impl LivecommentQuery {
    fn limit(&self) -> ApiResult<Option<i64>> {
        match self.limit.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|n| *n >= 0)
                .map(Some)
                .ok_or_else(|| {
                    ApiError::InvalidArgument(
                        "limit query parameter must be a non-negative integer".into(),
                    )
                }),
        }
    }
}

/// Comments of a livestream, newest first.
pub fn list(
    conn: &Connection,
    fallback: &FallbackAvatar,
    livestream_id: i64,
    limit: Option<i64>,
) -> ApiResult<Vec<Livecomment>> {
    let rows = list_livecomments(conn, livestream_id, limit)?;
    Ok(rows.iter().map(|row| profile::livecomment(row, fallback)).collect())
}

/// Screen, store and return a new comment.
pub fn submit(
    conn: &Connection,
    fallback: &FallbackAvatar,
    caller_id: i64,
    livestream_id: i64,
    req: &PostLivecommentRequest,
) -> ApiResult<Livecomment> {
    if req.tip < 0 {
        return Err(ApiError::InvalidArgument("tip must not be negative".into()));
    }

    let livestream = get_livestream(conn, livestream_id)?
        .ok_or_else(|| ApiError::NotFound("livestream not found".into()))?;

    moderation::check_submission(conn, &livestream, &req.comment)?;

    let id = insert_livecomment(conn, caller_id, livestream_id, &req.comment, req.tip)?;

    let ctx = get_livecomment_context(conn, id)?
        .ok_or_else(|| ApiError::Internal(format!("livecomment {} vanished after insert", id)))?;

    Ok(profile::livecomment(&ctx, fallback))
}

pub async fn get_livecomments(
    State(state): State<AppState>,
    WithRejection(Path(livestream_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<LivecommentQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let limit = query.limit()?;

    let livecomments = blocking(&state, move |s| {
        s.db.read(|tx| list(tx, &s.fallback_avatar, livestream_id, limit))
    })
    .await?;

    Ok(Json(livecomments))
}

pub async fn post_livecomment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(livestream_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<PostLivecommentRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let caller_id = claims.sub;

    let livecomment = blocking(&state, move |s| {
        s.db.write(|tx| submit(tx, &s.fallback_avatar, caller_id, livestream_id, &req))
    })
    .await?;

    info!(
        "Livecomment {} posted on livestream {} by {}",
        livecomment.id, livestream_id, claims.username
    );

    Ok((StatusCode::CREATED, Json(livecomment)))
}
