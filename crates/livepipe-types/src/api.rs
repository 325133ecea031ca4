use serde::{Deserialize, Serialize};

// -- Session claims --

/// Bearer token claims issued by the login service and checked by the
/// session gate. `exp` is epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Livecomments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostLivecommentRequest {
    pub comment: String,
    #[serde(default)]
    pub tip: i64,
}

// -- Moderation --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModerateRequest {
    pub ng_word: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModerateResponse {
    pub word_id: i64,
    pub purged_count: usize,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_defaults_to_zero() {
        let req: PostLivecommentRequest = serde_json::from_str(r#"{"comment":"hi"}"#).unwrap();
        assert_eq!(req.comment, "hi");
        assert_eq!(req.tip, 0);
    }

    #[test]
    fn unknown_fields_are_refused() {
        let res = serde_json::from_str::<ModerateRequest>(r#"{"ng_word":"x","extra":1}"#);
        assert!(res.is_err());
    }
}
