use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};

use livepipe_db::Connection;
use livepipe_db::livecomments::get_livecomment;
use livepipe_db::queries::get_livestream;
use livepipe_db::reports::{count_reports_for_livecomment, get_report_context, insert_report};
use livepipe_types::api::Claims;
use livepipe_types::models::LivecommentReport;

use crate::avatar::FallbackAvatar;
use crate::error::{ApiError, ApiResult};
use crate::profile;
use crate::state::{AppState, blocking};

/// File a report against a livecomment of the given livestream.
pub fn file_report(
    conn: &Connection,
    fallback: &FallbackAvatar,
    reporter_id: i64,
    livestream_id: i64,
    livecomment_id: i64,
) -> ApiResult<LivecommentReport> {
    get_livestream(conn, livestream_id)?
        .ok_or_else(|| ApiError::NotFound("livestream not found".into()))?;

    let livecomment = get_livecomment(conn, livecomment_id)?
        .filter(|lc| lc.livestream_id == livestream_id)
        .ok_or_else(|| ApiError::NotFound("livecomment not found".into()))?;

    let id = insert_report(conn, reporter_id, livestream_id, livecomment.id)?;
    let total = count_reports_for_livecomment(conn, livecomment.id)?;
    debug!("Livecomment {} has {} reports", livecomment.id, total);

    let ctx = get_report_context(conn, id)?
        .ok_or_else(|| ApiError::Internal(format!("report {} vanished after insert", id)))?;

    Ok(profile::report(&ctx, fallback))
}

pub async fn report_livecomment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path((livestream_id, livecomment_id)), _): WithRejection<Path<(i64, i64)>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let reporter_id = claims.sub;

    let report = blocking(&state, move |s| {
        s.db.write(|tx| file_report(tx, &s.fallback_avatar, reporter_id, livestream_id, livecomment_id))
    })
    .await?;

    info!(
        "Report {} filed by {} against livecomment {}",
        report.id, claims.username, livecomment_id
    );

    Ok((StatusCode::CREATED, Json(report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepipe_db::models::NewLivestream;
    use livepipe_db::queries::{create_livestream, create_user, set_icon};
    use livepipe_db::livecomments::insert_livecomment;
    use livepipe_db::{Database, StoreError};

    use crate::avatar::icon_hash;

    struct Fixture {
        db: Database,
        fallback: FallbackAvatar,
        author: i64,
        reporter: i64,
        stream: i64,
        other_stream: i64,
        comment: i64,
    }

    fn fixture() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let (author, reporter, stream, other_stream, comment) = db
            .write(|tx| {
                let owner = create_user(tx, "owner", "", "", false)?;
                let author = create_user(tx, "author", "", "", false)?;
                let reporter = create_user(tx, "reporter", "", "", true)?;
                set_icon(tx, author, b"author-icon")?;
                let stream = create_livestream(
                    tx,
                    &NewLivestream { user_id: owner, title: "a".into(), ..Default::default() },
                )?;
                let other_stream = create_livestream(
                    tx,
                    &NewLivestream { user_id: owner, title: "b".into(), ..Default::default() },
                )?;
                let comment = insert_livecomment(tx, author, stream, "you are bad", 0)?;
                Ok::<_, StoreError>((author, reporter, stream, other_stream, comment))
            })
            .unwrap();

        Fixture {
            db,
            fallback: FallbackAvatar::from_bytes(b"fallback".to_vec()),
            author,
            reporter,
            stream,
            other_stream,
            comment,
        }
    }

    fn report_count(f: &Fixture) -> i64 {
        f.db.read(|tx| count_reports_for_livecomment(tx, f.comment)).unwrap()
    }

    #[test]
    fn report_resolves_two_profiles() {
        let f = fixture();
        let report = f
            .db
            .write(|tx| file_report(tx, &f.fallback, f.reporter, f.stream, f.comment))
            .unwrap();

        assert_eq!(report.reporter.id, f.reporter);
        assert_eq!(report.reporter.icon_hash, f.fallback.hash());
        assert_eq!(report.livecomment.id, f.comment);
        assert_eq!(report.livecomment.user.id, f.author);
        assert_eq!(report.livecomment.user.icon_hash, icon_hash(b"author-icon"));
        assert_eq!(report.livecomment.livestream.id, f.stream);
    }

    #[test]
    fn missing_livecomment_is_not_found_and_writes_nothing() {
        let f = fixture();
        let err = f
            .db
            .write(|tx| file_report(tx, &f.fallback, f.reporter, f.stream, 4242))
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        let total: i64 = f
            .db
            .read(|tx| {
                tx.query_row("SELECT COUNT(*) FROM livecomment_reports", [], |r| r.get(0))
                    .map_err(StoreError::from)
            })
            .unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn livecomment_of_another_stream_is_not_found() {
        let f = fixture();
        let err = f
            .db
            .write(|tx| file_report(tx, &f.fallback, f.reporter, f.other_stream, f.comment))
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(report_count(&f), 0);
    }

    #[test]
    fn missing_livestream_is_not_found() {
        let f = fixture();
        let err = f
            .db
            .write(|tx| file_report(tx, &f.fallback, f.reporter, 999, f.comment))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn repeated_reports_are_kept() {
        let f = fixture();
        for _ in 0..3 {
            f.db.write(|tx| file_report(tx, &f.fallback, f.reporter, f.stream, f.comment))
                .unwrap();
        }
        assert_eq!(report_count(&f), 3);
    }
}
