use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};
use tracing::info;

/// The image served for users without an icon, read once at startup.
#[derive(Clone)]
pub struct FallbackAvatar {
    bytes: Arc<[u8]>,
    hash: Arc<str>,
}

impl FallbackAvatar {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read fallback image {}", path.display()))?;
        if bytes.is_empty() {
            bail!("fallback image {} is empty", path.display());
        }

        let avatar = Self::from_bytes(bytes);
        info!("Fallback avatar loaded from {} (hash {})", path.display(), avatar.hash());
        Ok(avatar)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        let hash = icon_hash(&bytes);
        Self {
            bytes: bytes.into(),
            hash: hash.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Lowercase hex SHA-256 of an icon image.
pub fn icon_hash(image: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image);
    hex::encode(hasher.finalize())
}
