/// Database row types. These map directly to SQLite rows.
/// Distinct from livepipe-types API models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ThemeRow {
    pub id: i64,
    pub dark_mode: bool,
}

/// A user joined with their theme and (possibly missing) icon.
#[derive(Debug, Clone)]
pub struct ProfileRow {
    pub user: UserRow,
    pub theme: ThemeRow,
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct LivestreamRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub playlist_url: String,
    pub thumbnail_url: String,
    pub start_at: i64,
    pub end_at: i64,
}

#[derive(Debug, Clone)]
pub struct LivecommentRow {
    pub id: i64,
    pub user_id: i64,
    pub livestream_id: i64,
    pub comment: String,
    pub tip: i64,
    pub created_at: i64,
}

/// A livecomment with its author, its stream and the stream owner, read in
/// one statement.
#[derive(Debug, Clone)]
pub struct LivecommentContextRow {
    pub livecomment: LivecommentRow,
    pub author: ProfileRow,
    pub livestream: LivestreamRow,
    pub owner: ProfileRow,
}

#[derive(Debug, Clone)]
pub struct NgWordRow {
    pub id: i64,
    pub user_id: i64,
    pub livestream_id: i64,
    pub word: String,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub id: i64,
    pub user_id: i64,
    pub livestream_id: i64,
    pub livecomment_id: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct ReportContextRow {
    pub report: ReportRow,
    pub reporter: ProfileRow,
    pub livecomment: LivecommentContextRow,
}

/// Fields for a new livestream. Streams are created by the stream service;
/// this exists for provisioning and tests.
#[derive(Debug, Clone, Default)]
pub struct NewLivestream {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub playlist_url: String,
    pub thumbnail_url: String,
    pub start_at: i64,
    pub end_at: i64,
}
