use rusqlite::{Connection, Row};
use tracing::debug;

use crate::error::{OptionalExt, StoreResult};
use crate::models::{LivecommentContextRow, LivecommentRow};
use crate::queries::{LIVESTREAM_WIDTH, PROFILE_WIDTH, livestream_at, profile_at};

/// Column list decoded by [`livecomment_context_at`]. Expects the aliases set
/// up by [`LIVECOMMENT_JOINS`].
pub(crate) const LIVECOMMENT_COLUMNS: &str = "
    lc.id, lc.user_id, lc.livestream_id, lc.comment, lc.tip, lc.created_at,
    u.id, u.name, u.display_name, u.description, t.id, t.dark_mode, i.image,
    ls.id, ls.user_id, ls.title, ls.description, ls.playlist_url, ls.thumbnail_url, ls.start_at, ls.end_at,
    ou.id, ou.name, ou.display_name, ou.description, ot.id, ot.dark_mode, oi.image";

/// Joins hanging off a `livecomments lc` table reference.
pub(crate) const LIVECOMMENT_JOINS: &str = "
    JOIN users u ON u.id = lc.user_id
    JOIN themes t ON t.user_id = u.id
    LEFT JOIN icons i ON i.user_id = u.id
    JOIN livestreams ls ON ls.id = lc.livestream_id
    JOIN users ou ON ou.id = ls.user_id
    JOIN themes ot ON ot.user_id = ou.id
    LEFT JOIN icons oi ON oi.user_id = ou.id";

const LIVECOMMENT_WIDTH: usize = 6;

/// Insert a livecomment stamped with the current server time. Returns its id.
pub fn insert_livecomment(
    conn: &Connection,
    user_id: i64,
    livestream_id: i64,
    comment: &str,
    tip: i64,
) -> StoreResult<i64> {
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO livecomments (user_id, livestream_id, comment, tip, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![user_id, livestream_id, comment, tip, now],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Plain lookup without any joined context.
pub fn get_livecomment(conn: &Connection, id: i64) -> StoreResult<Option<LivecommentRow>> {
    conn.query_row(
        "SELECT id, user_id, livestream_id, comment, tip, created_at
         FROM livecomments WHERE id = ?1",
        [id],
        |row| livecomment_at(row, 0),
    )
    .optional()
}

pub fn get_livecomment_context(
    conn: &Connection,
    id: i64,
) -> StoreResult<Option<LivecommentContextRow>> {
    let sql = format!(
        "SELECT {LIVECOMMENT_COLUMNS} FROM livecomments lc {LIVECOMMENT_JOINS} WHERE lc.id = ?1"
    );
    let mut stmt = conn.prepare_cached(&sql)?;

    stmt.query_row([id], |row| livecomment_context_at(row, 0))
        .optional()
}

/// Livecomments of a stream, newest first. Comments posted within the same
/// second come back in reverse insertion order.
pub fn list_livecomments(
    conn: &Connection,
    livestream_id: i64,
    limit: Option<i64>,
) -> StoreResult<Vec<LivecommentContextRow>> {
    // JOIN everything in a single query (no N+1 per comment)
    let sql = format!(
        "SELECT {LIVECOMMENT_COLUMNS} FROM livecomments lc {LIVECOMMENT_JOINS}
         WHERE lc.livestream_id = ?1
         ORDER BY lc.created_at DESC, lc.id DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare_cached(&sql)?;

    // SQLite treats a negative LIMIT as unbounded
    let limit = limit.unwrap_or(-1);

    let rows = stmt
        .query_map(rusqlite::params![livestream_id, limit], |row| {
            livecomment_context_at(row, 0)
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Delete every livecomment of `livestream_id` whose body satisfies
/// `matches`. Returns how many were removed. Other streams are never read.
pub fn delete_livecomments_matching<F>(
    conn: &Connection,
    livestream_id: i64,
    matches: F,
) -> StoreResult<usize>
where
    F: Fn(&str) -> bool,
{
    let doomed: Vec<i64> = {
        let mut stmt =
            conn.prepare_cached("SELECT id, comment FROM livecomments WHERE livestream_id = ?1")?;
        let candidates = stmt
            .query_map([livestream_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        candidates
            .into_iter()
            .filter(|(_, comment)| matches(comment))
            .map(|(id, _)| id)
            .collect()
    };

    let mut delete = conn.prepare_cached("DELETE FROM livecomments WHERE id = ?1")?;
    let mut removed = 0;
    for id in &doomed {
        removed += delete.execute([id])?;
    }

    debug!("Deleted {} livecomments from livestream {}", removed, livestream_id);
    Ok(removed)
}

fn livecomment_at(row: &Row<'_>, at: usize) -> rusqlite::Result<LivecommentRow> {
    Ok(LivecommentRow {
        id: row.get(at)?,
        user_id: row.get(at + 1)?,
        livestream_id: row.get(at + 2)?,
        comment: row.get(at + 3)?,
        tip: row.get(at + 4)?,
        created_at: row.get(at + 5)?,
    })
}

/// Decode the columns of [`LIVECOMMENT_COLUMNS`] starting at column `at`.
pub(crate) fn livecomment_context_at(
    row: &Row<'_>,
    at: usize,
) -> rusqlite::Result<LivecommentContextRow> {
    let author_at = at + LIVECOMMENT_WIDTH;
    let livestream_at_col = author_at + PROFILE_WIDTH;
    let owner_at = livestream_at_col + LIVESTREAM_WIDTH;

    Ok(LivecommentContextRow {
        livecomment: livecomment_at(row, at)?,
        author: profile_at(row, author_at)?,
        livestream: livestream_at(row, livestream_at_col)?,
        owner: profile_at(row, owner_at)?,
    })
}
