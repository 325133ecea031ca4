use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (users, themes, icons, livestreams)");
        // These tables belong to the account and stream services; the
        // comment pipeline only reads them and relies on their keys.
        conn.execute_batch(
            "
            CREATE TABLE users (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                name          TEXT NOT NULL UNIQUE,
                display_name  TEXT NOT NULL DEFAULT '',
                description   TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE themes (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id    INTEGER NOT NULL UNIQUE REFERENCES users(id),
                dark_mode  INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE icons (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id  INTEGER NOT NULL UNIQUE REFERENCES users(id),
                image    BLOB NOT NULL
            );

            CREATE TABLE livestreams (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id        INTEGER NOT NULL REFERENCES users(id),
                title          TEXT NOT NULL,
                description    TEXT NOT NULL DEFAULT '',
                playlist_url   TEXT NOT NULL DEFAULT '',
                thumbnail_url  TEXT NOT NULL DEFAULT '',
                start_at       INTEGER NOT NULL,
                end_at         INTEGER NOT NULL
            );

            CREATE INDEX idx_livestreams_user ON livestreams(user_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (livecomments, ng_words, livecomment_reports)");
        conn.execute_batch(
            "
            CREATE TABLE livecomments (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id        INTEGER NOT NULL REFERENCES users(id),
                livestream_id  INTEGER NOT NULL REFERENCES livestreams(id),
                comment        TEXT NOT NULL,
                tip            INTEGER NOT NULL DEFAULT 0 CHECK (tip >= 0),
                created_at     INTEGER NOT NULL
            );

            CREATE INDEX idx_livecomments_livestream
                ON livecomments(livestream_id, created_at DESC, id DESC);

            CREATE TABLE ng_words (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id        INTEGER NOT NULL REFERENCES users(id),
                livestream_id  INTEGER NOT NULL REFERENCES livestreams(id),
                word           TEXT NOT NULL,
                created_at     INTEGER NOT NULL
            );

            CREATE INDEX idx_ng_words_livestream ON ng_words(livestream_id, user_id);

            CREATE TABLE livecomment_reports (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         INTEGER NOT NULL REFERENCES users(id),
                livestream_id   INTEGER NOT NULL REFERENCES livestreams(id),
                livecomment_id  INTEGER NOT NULL REFERENCES livecomments(id) ON DELETE CASCADE,
                created_at      INTEGER NOT NULL
            );

            CREATE INDEX idx_livecomment_reports_livecomment
                ON livecomment_reports(livecomment_id);

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 2);
    }
}
