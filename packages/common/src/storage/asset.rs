use std::fmt;
use std::path::PathBuf;

use super::error::StorageError;

/// URL prefix under which the assets root is served.
pub const ASSETS_PREFIX: &str = "/assets";

const STAGING_DIR: &str = "uploads";
const CANONICAL_DIR: &str = "imgs";

/// A parsed file reference.
///
/// References are stored on resources as strings such as
/// `/assets/uploads/20240101/<hash>.jpg` (staging) or
/// `/assets/imgs/42/<hash>.jpg` (canonical, owned by resource 42).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetRef {
    Staged { date: String, filename: String },
    Canonical { resource_id: i32, filename: String },
}

impl AssetRef {
    /// Parse a stored reference. The `/assets` prefix is optional.
    pub fn parse(reference: &str) -> Result<Self, StorageError> {
        let trimmed = reference.trim();
        let rest = trimmed
            .strip_prefix(ASSETS_PREFIX)
            .unwrap_or(trimmed)
            .trim_start_matches('/');

        let parts: Vec<&str> = rest.split('/').collect();
        let [area, scope, filename] = parts.as_slice() else {
            return Err(StorageError::InvalidReference(reference.to_string()));
        };
        validate_segment(filename, reference)?;

        match *area {
            STAGING_DIR => {
                validate_segment(scope, reference)?;
                Ok(Self::Staged {
                    date: scope.to_string(),
                    filename: filename.to_string(),
                })
            }
            CANONICAL_DIR => {
                let resource_id = scope
                    .parse::<i32>()
                    .map_err(|_| StorageError::InvalidReference(reference.to_string()))?;
                Ok(Self::Canonical {
                    resource_id,
                    filename: filename.to_string(),
                })
            }
            _ => Err(StorageError::InvalidReference(reference.to_string())),
        }
    }

    pub fn staged(date: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::Staged {
            date: date.into(),
            filename: filename.into(),
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::Staged { filename, .. } | Self::Canonical { filename, .. } => filename,
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Canonical { .. })
    }

    /// The canonical location of this file for the given resource.
    pub fn canonical_for(&self, resource_id: i32) -> Self {
        Self::Canonical {
            resource_id,
            filename: self.filename().to_string(),
        }
    }

    /// Path relative to the assets root.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            Self::Staged { date, filename } => PathBuf::from(STAGING_DIR).join(date).join(filename),
            Self::Canonical {
                resource_id,
                filename,
            } => PathBuf::from(CANONICAL_DIR)
                .join(resource_id.to_string())
                .join(filename),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staged { date, filename } => {
                write!(f, "{ASSETS_PREFIX}/{STAGING_DIR}/{date}/{filename}")
            }
            Self::Canonical {
                resource_id,
                filename,
            } => write!(f, "{ASSETS_PREFIX}/{CANONICAL_DIR}/{resource_id}/{filename}"),
        }
    }
}

fn validate_segment(segment: &str, reference: &str) -> Result<(), StorageError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('\\')
        || segment.contains('\0')
    {
        return Err(StorageError::InvalidReference(reference.to_string()));
    }
    Ok(())
}
