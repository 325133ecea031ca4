//! Reads and provisioning helpers for the tables owned by the account and
//! stream services, plus the row decoders shared by the joined lookups.

use rusqlite::{Connection, Row};

use crate::error::{OptionalExt, StoreResult};
use crate::models::{LivestreamRow, NewLivestream, ProfileRow, ThemeRow, UserRow};

/// Columns decoded by [`profile_at`], in order.
pub(crate) const PROFILE_WIDTH: usize = 7;
/// Columns decoded by [`livestream_at`], in order.
pub(crate) const LIVESTREAM_WIDTH: usize = 8;

// -- Users --

/// Create a user together with their theme.
pub fn create_user(
    conn: &Connection,
    name: &str,
    display_name: &str,
    description: &str,
    dark_mode: bool,
) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO users (name, display_name, description) VALUES (?1, ?2, ?3)",
        (name, display_name, description),
    )?;
    let user_id = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO themes (user_id, dark_mode) VALUES (?1, ?2)",
        (user_id, dark_mode),
    )?;

    Ok(user_id)
}

/// Replace the user's icon.
pub fn set_icon(conn: &Connection, user_id: i64, image: &[u8]) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO icons (user_id, image) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET image = excluded.image",
        rusqlite::params![user_id, image],
    )?;
    Ok(())
}

// -- Livestreams --

pub fn create_livestream(conn: &Connection, new: &NewLivestream) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO livestreams
            (user_id, title, description, playlist_url, thumbnail_url, start_at, end_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            new.user_id,
            new.title,
            new.description,
            new.playlist_url,
            new.thumbnail_url,
            new.start_at,
            new.end_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_livestream(conn: &Connection, id: i64) -> StoreResult<Option<LivestreamRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, title, description, playlist_url, thumbnail_url, start_at, end_at
         FROM livestreams WHERE id = ?1",
    )?;

    stmt.query_row([id], |row| livestream_at(row, 0)).optional()
}

// -- Row decoders --

/// Decode `user.id, user.name, user.display_name, user.description,
/// theme.id, theme.dark_mode, icon.image` starting at column `at`.
pub(crate) fn profile_at(row: &Row<'_>, at: usize) -> rusqlite::Result<ProfileRow> {
    Ok(ProfileRow {
        user: UserRow {
            id: row.get(at)?,
            name: row.get(at + 1)?,
            display_name: row.get(at + 2)?,
            description: row.get(at + 3)?,
        },
        theme: ThemeRow {
            id: row.get(at + 4)?,
            dark_mode: row.get(at + 5)?,
        },
        image: row.get(at + 6)?,
    })
}

pub(crate) fn livestream_at(row: &Row<'_>, at: usize) -> rusqlite::Result<LivestreamRow> {
    Ok(LivestreamRow {
        id: row.get(at)?,
        user_id: row.get(at + 1)?,
        title: row.get(at + 2)?,
        description: row.get(at + 3)?,
        playlist_url: row.get(at + 4)?,
        thumbnail_url: row.get(at + 5)?,
        start_at: row.get(at + 6)?,
        end_at: row.get(at + 7)?,
    })
}
