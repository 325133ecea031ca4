use rusqlite::Connection;

use crate::error::{OptionalExt, StoreResult};
use crate::livecomments::{LIVECOMMENT_COLUMNS, LIVECOMMENT_JOINS, livecomment_context_at};
use crate::models::{ReportContextRow, ReportRow};
use crate::queries::{PROFILE_WIDTH, profile_at};

const REPORT_WIDTH: usize = 5;

/// File a report against a livecomment. Duplicate reports are allowed.
pub fn insert_report(
    conn: &Connection,
    user_id: i64,
    livestream_id: i64,
    livecomment_id: i64,
) -> StoreResult<i64> {
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO livecomment_reports (user_id, livestream_id, livecomment_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![user_id, livestream_id, livecomment_id, now],
    )?;

    Ok(conn.last_insert_rowid())
}

/// A report with its reporter profile and the full context of the reported
/// livecomment.
pub fn get_report_context(conn: &Connection, id: i64) -> StoreResult<Option<ReportContextRow>> {
    let sql = format!(
        "SELECT lr.id, lr.user_id, lr.livestream_id, lr.livecomment_id, lr.created_at,
                ru.id, ru.name, ru.display_name, ru.description, rt.id, rt.dark_mode, ri.image,
                {LIVECOMMENT_COLUMNS}
         FROM livecomment_reports lr
         JOIN users ru ON ru.id = lr.user_id
         JOIN themes rt ON rt.user_id = ru.id
         LEFT JOIN icons ri ON ri.user_id = ru.id
         JOIN livecomments lc ON lc.id = lr.livecomment_id
         {LIVECOMMENT_JOINS}
         WHERE lr.id = ?1"
    );
    let mut stmt = conn.prepare_cached(&sql)?;

    stmt.query_row([id], |row| {
        let reporter_at = REPORT_WIDTH;
        let livecomment_at = reporter_at + PROFILE_WIDTH;

        Ok(ReportContextRow {
            report: ReportRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                livestream_id: row.get(2)?,
                livecomment_id: row.get(3)?,
                created_at: row.get(4)?,
            },
            reporter: profile_at(row, reporter_at)?,
            livecomment: livecomment_context_at(row, livecomment_at)?,
        })
    })
    .optional()
}

pub fn count_reports_for_livecomment(conn: &Connection, livecomment_id: i64) -> StoreResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM livecomment_reports WHERE livecomment_id = ?1",
        [livecomment_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::error::StoreError;
    use crate::livecomments::{delete_livecomments_matching, insert_livecomment};
    use crate::models::NewLivestream;
    use crate::queries::{create_livestream, create_user, set_icon};

    fn seed(db: &Database) -> (i64, i64, i64, i64) {
        db.write(|tx| {
            let owner = create_user(tx, "owner", "", "", false)?;
            let author = create_user(tx, "author", "", "", false)?;
            let reporter = create_user(tx, "reporter", "Reporter", "", true)?;
            set_icon(tx, reporter, b"reporter-icon")?;
            let stream = create_livestream(
                tx,
                &NewLivestream { user_id: owner, title: "s".into(), ..Default::default() },
            )?;
            let comment = insert_livecomment(tx, author, stream, "rude words", 10)?;
            Ok::<_, StoreError>((author, reporter, stream, comment))
        })
        .unwrap()
    }

    #[test]
    fn report_context_carries_both_profiles() {
        let db = Database::open_in_memory().unwrap();
        let (author, reporter, stream, comment) = seed(&db);

        let id = db.write(|tx| insert_report(tx, reporter, stream, comment)).unwrap();
        let ctx = db.read(|tx| get_report_context(tx, id)).unwrap().unwrap();

        assert_eq!(ctx.report.livecomment_id, comment);
        assert_eq!(ctx.reporter.user.id, reporter);
        assert_eq!(ctx.reporter.image.as_deref(), Some(&b"reporter-icon"[..]));
        assert_eq!(ctx.livecomment.author.user.id, author);
        assert_eq!(ctx.livecomment.livecomment.tip, 10);
        assert_eq!(ctx.livecomment.livestream.id, stream);
    }

    #[test]
    fn duplicate_reports_are_allowed() {
        let db = Database::open_in_memory().unwrap();
        let (_, reporter, stream, comment) = seed(&db);

        db.write(|tx| insert_report(tx, reporter, stream, comment)).unwrap();
        db.write(|tx| insert_report(tx, reporter, stream, comment)).unwrap();

        let count = db.read(|tx| count_reports_for_livecomment(tx, comment)).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn report_on_missing_livecomment_violates_constraint() {
        let db = Database::open_in_memory().unwrap();
        let (_, reporter, stream, _) = seed(&db);

        let res = db.write(|tx| insert_report(tx, reporter, stream, 777));
        assert!(matches!(res, Err(StoreError::ConstraintViolation(_))));
    }

    #[test]
    fn purging_a_livecomment_drops_its_reports() {
        let db = Database::open_in_memory().unwrap();
        let (_, reporter, stream, comment) = seed(&db);
        let id = db.write(|tx| insert_report(tx, reporter, stream, comment)).unwrap();

        db.write(|tx| delete_livecomments_matching(tx, stream, |_| true)).unwrap();

        assert!(db.read(|tx| get_report_context(tx, id)).unwrap().is_none());
        assert_eq!(db.read(|tx| count_reports_for_livecomment(tx, comment)).unwrap(), 0);
    }
}
