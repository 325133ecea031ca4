use rusqlite::{Connection, Row};

use crate::error::StoreResult;
use crate::models::NgWordRow;

pub fn insert_ng_word(
    conn: &Connection,
    user_id: i64,
    livestream_id: i64,
    word: &str,
) -> StoreResult<i64> {
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO ng_words (user_id, livestream_id, word, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![user_id, livestream_id, word, now],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Every NG word registered on a stream, whoever registered it.
pub fn ng_words_for_livestream(conn: &Connection, livestream_id: i64) -> StoreResult<Vec<NgWordRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, livestream_id, word, created_at
         FROM ng_words WHERE livestream_id = ?1 ORDER BY id",
    )?;

    let rows = stmt
        .query_map([livestream_id], ng_word_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// NG words a user registered on a stream, newest first.
pub fn ng_words_by_user(
    conn: &Connection,
    user_id: i64,
    livestream_id: i64,
) -> StoreResult<Vec<NgWordRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, livestream_id, word, created_at
         FROM ng_words WHERE user_id = ?1 AND livestream_id = ?2
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([user_id, livestream_id], ng_word_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn ng_word_from_row(row: &Row<'_>) -> rusqlite::Result<NgWordRow> {
    Ok(NgWordRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        livestream_id: row.get(2)?,
        word: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::error::StoreError;
    use crate::models::NewLivestream;
    use crate::queries::{create_livestream, create_user};

    #[test]
    fn words_are_scoped_per_stream_and_user() {
        let db = Database::open_in_memory().unwrap();

        let (owner, other, stream, other_stream) = db
            .write(|tx| {
                let owner = create_user(tx, "owner", "", "", false)?;
                let other = create_user(tx, "other", "", "", false)?;
                let stream = create_livestream(
                    tx,
                    &NewLivestream { user_id: owner, title: "a".into(), ..Default::default() },
                )?;
                let other_stream = create_livestream(
                    tx,
                    &NewLivestream { user_id: other, title: "b".into(), ..Default::default() },
                )?;
                insert_ng_word(tx, owner, stream, "foo")?;
                insert_ng_word(tx, owner, stream, "bar")?;
                insert_ng_word(tx, other, other_stream, "baz")?;
                Ok::<_, StoreError>((owner, other, stream, other_stream))
            })
            .unwrap();

        let words: Vec<String> = db
            .read(|tx| ng_words_for_livestream(tx, stream))
            .unwrap()
            .into_iter()
            .map(|w| w.word)
            .collect();
        assert_eq!(words, vec!["foo", "bar"]);

        let mine: Vec<String> = db
            .read(|tx| ng_words_by_user(tx, owner, stream))
            .unwrap()
            .into_iter()
            .map(|w| w.word)
            .collect();
        assert_eq!(mine, vec!["bar", "foo"]);

        assert!(db.read(|tx| ng_words_by_user(tx, other, stream)).unwrap().is_empty());
        assert_eq!(db.read(|tx| ng_words_for_livestream(tx, other_stream)).unwrap().len(), 1);
    }
}
