//! Turns joined store rows into client-facing payloads.
//!
//! Everything here is pure: the only input besides the rows is the fallback
//! avatar, which is loaded once at startup.

use livepipe_db::models::{
    LivecommentContextRow, LivestreamRow, ProfileRow, ReportContextRow, ThemeRow, UserRow,
};
use livepipe_types::models::{Livecomment, LivecommentReport, Livestream, Theme, User};

use crate::avatar::{FallbackAvatar, icon_hash};

/// Build a profile from a user, their theme and their icon. A missing or
/// empty icon is replaced by the fallback image before hashing.
pub fn resolve_profile(
    user: &UserRow,
    theme: &ThemeRow,
    avatar: Option<&[u8]>,
    fallback: &FallbackAvatar,
) -> User {
    let icon_hash = match avatar {
        Some(image) if !image.is_empty() => icon_hash(image),
        _ => fallback.hash().to_string(),
    };

    User {
        id: user.id,
        name: user.name.clone(),
        display_name: user.display_name.clone(),
        description: user.description.clone(),
        theme: Theme {
            id: theme.id,
            dark_mode: theme.dark_mode,
        },
        icon_hash,
    }
}

pub fn profile(row: &ProfileRow, fallback: &FallbackAvatar) -> User {
    resolve_profile(&row.user, &row.theme, row.image.as_deref(), fallback)
}

pub fn livestream(row: &LivestreamRow, owner: &ProfileRow, fallback: &FallbackAvatar) -> Livestream {
    Livestream {
        id: row.id,
        owner: profile(owner, fallback),
        title: row.title.clone(),
        description: row.description.clone(),
        playlist_url: row.playlist_url.clone(),
        thumbnail_url: row.thumbnail_url.clone(),
        start_at: row.start_at,
        end_at: row.end_at,
    }
}

pub fn livecomment(ctx: &LivecommentContextRow, fallback: &FallbackAvatar) -> Livecomment {
    Livecomment {
        id: ctx.livecomment.id,
        user: profile(&ctx.author, fallback),
        livestream: livestream(&ctx.livestream, &ctx.owner, fallback),
        comment: ctx.livecomment.comment.clone(),
        tip: ctx.livecomment.tip,
        created_at: ctx.livecomment.created_at,
    }
}

/// The reporter and the reported comment's author are resolved
/// independently; they are usually different people.
pub fn report(ctx: &ReportContextRow, fallback: &FallbackAvatar) -> LivecommentReport {
    LivecommentReport {
        id: ctx.report.id,
        reporter: profile(&ctx.reporter, fallback),
        livecomment: livecomment(&ctx.livecomment, fallback),
        created_at: ctx.report.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> (UserRow, ThemeRow) {
        (
            UserRow {
                id: 1,
                name: "alice".into(),
                display_name: "Alice".into(),
                description: "hello".into(),
            },
            ThemeRow { id: 3, dark_mode: true },
        )
    }

    #[test]
    fn real_avatar_is_hashed() {
        let fallback = FallbackAvatar::from_bytes(b"fallback".to_vec());
        let (u, t) = user();

        let p = resolve_profile(&u, &t, Some(&b"avatar"[..]), &fallback);
        assert_eq!(p.icon_hash, icon_hash(b"avatar"));
        assert_eq!(p.theme, Theme { id: 3, dark_mode: true });
        assert_eq!(p.display_name, "Alice");
    }

    #[test]
    fn absent_or_empty_avatar_uses_fallback() {
        let fallback = FallbackAvatar::from_bytes(b"fallback".to_vec());
        let (u, t) = user();

        let absent = resolve_profile(&u, &t, None, &fallback);
        let empty = resolve_profile(&u, &t, Some(&b""[..]), &fallback);
        assert_eq!(absent.icon_hash, icon_hash(b"fallback"));
        assert_eq!(empty.icon_hash, absent.icon_hash);
    }

    #[test]
    fn hash_is_stable_across_calls() {
        let fallback = FallbackAvatar::from_bytes(b"fallback".to_vec());
        let (u, t) = user();

        let first = resolve_profile(&u, &t, Some(&b"avatar"[..]), &fallback);
        let second = resolve_profile(&u, &t, Some(&b"avatar"[..]), &fallback);
        assert_eq!(first, second);
    }
}
