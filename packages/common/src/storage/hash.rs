use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 digest of an uploaded file's full content.
///
/// Used as the stored filename stem so identical uploads land on the same file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Return the hash as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Build the stored filename: `<hex>` plus the lowercased extension, if any.
    pub fn filename(&self, extension: Option<&str>) -> String {
        match extension.map(|e| e.trim_start_matches('.')) {
            Some(ext) if !ext.is_empty() => format!("{}.{}", self.to_hex(), ext.to_lowercase()),
            _ => self.to_hex(),
        }
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Extract an upload's extension from its client-side filename.
///
/// Only short alphanumeric extensions are kept; anything else is dropped so
/// the stored name stays a plain `<hash>.<ext>`.
pub fn upload_extension(original_name: &str) -> Option<String> {
    let (_, ext) = original_name.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
