//! NG word registration and submission screening.
//!
//! Both entry points run on the caller's open transaction. Registration
//! persists the word and purges matching comments in that same
//! transaction, so either both happen or neither does.

use tracing::{info, warn};

use livepipe_db::Connection;
use livepipe_db::livecomments::delete_livecomments_matching;
use livepipe_db::models::LivestreamRow;
use livepipe_db::ng_words::{insert_ng_word, ng_words_by_user, ng_words_for_livestream};
use livepipe_db::queries::get_livestream;
use livepipe_types::models::NgWord;

use crate::error::{ApiError, ApiResult};
use crate::spam;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub word_id: i64,
    pub purged_count: usize,
}

/// Register `word` on a livestream owned by `caller_id`, then delete every
/// comment of that livestream hitting any of its NG words.
pub fn register_ng_word(
    conn: &Connection,
    caller_id: i64,
    livestream_id: i64,
    word: &str,
) -> ApiResult<Registration> {
    if word.is_empty() {
        return Err(ApiError::InvalidArgument("ng_word must not be empty".into()));
    }

    let livestream = get_livestream(conn, livestream_id)?
        .ok_or_else(|| ApiError::NotFound("livestream not found".into()))?;
    if livestream.user_id != caller_id {
        warn!(
            "User {} tried to moderate livestream {} owned by {}",
            caller_id, livestream_id, livestream.user_id
        );
        return Err(ApiError::Forbidden(
            "a streamer can't moderate livestreams that other streamers own".into(),
        ));
    }

    let word_id = insert_ng_word(conn, caller_id, livestream_id, word)?;

    // Re-read the whole set: it includes the word just inserted
    let banned: Vec<String> = ng_words_for_livestream(conn, livestream_id)?
        .into_iter()
        .map(|w| w.word)
        .collect();

    let purged_count = delete_livecomments_matching(conn, livestream_id, |body| {
        spam::any_match(body, banned.iter().map(String::as_str))
    })?;

    info!(
        "NG word {} registered on livestream {} ({} active), purged {} livecomments",
        word_id,
        livestream_id,
        banned.len(),
        purged_count
    );

    Ok(Registration {
        word_id,
        purged_count,
    })
}

/// Screen a new comment body against the livestream's NG words.
pub fn check_submission(conn: &Connection, livestream: &LivestreamRow, body: &str) -> ApiResult<()> {
    let banned = ng_words_for_livestream(conn, livestream.id)?;

    if let Some(word) = spam::first_match(body, banned.iter().map(|w| w.word.as_str())) {
        info!(
            "Rejected livecomment on livestream {}: hit NG word {:?}",
            livestream.id, word
        );
        return Err(ApiError::Rejected("this comment was judged to be spam".into()));
    }

    Ok(())
}

/// NG words the caller registered on a livestream, newest first.
pub fn list_ng_words(conn: &Connection, caller_id: i64, livestream_id: i64) -> ApiResult<Vec<NgWord>> {
    let words = ng_words_by_user(conn, caller_id, livestream_id)?
        .into_iter()
        .map(|row| NgWord {
            id: row.id,
            user_id: row.user_id,
            livestream_id: row.livestream_id,
            word: row.word,
            created_at: row.created_at,
        })
        .collect();

    Ok(words)
}
