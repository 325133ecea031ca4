use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub fallback_image: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = get("LIVEPIPE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("LIVEPIPE_JWT_SECRET is unset or still a placeholder; it must match the login service's secret");
        }

        let port = match get("LIVEPIPE_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("LIVEPIPE_PORT is not a port number: {}", raw))?,
            None => 8080,
        };

        Ok(Self {
            host: get("LIVEPIPE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: get("LIVEPIPE_DB_PATH").unwrap_or_else(|| "livepipe.db".into()).into(),
            jwt_secret,
            fallback_image: get("LIVEPIPE_FALLBACK_IMAGE")
                .unwrap_or_else(|| "../img/NoImage.jpg".into())
                .into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[("LIVEPIPE_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(c.host, "0.0.0.0");
        assert_eq!(c.port, 8080);
        assert_eq!(c.db_path, PathBuf::from("livepipe.db"));
        assert_eq!(c.fallback_image, PathBuf::from("../img/NoImage.jpg"));
    }

    #[test]
    fn placeholder_secret_is_refused() {
        assert!(config(&[]).is_err());
        assert!(config(&[("LIVEPIPE_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn bad_port_is_refused() {
        let res = config(&[("LIVEPIPE_JWT_SECRET", "s3cret"), ("LIVEPIPE_PORT", "http")]);
        assert!(res.is_err());
    }
}
