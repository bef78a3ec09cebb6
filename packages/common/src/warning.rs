use std::fmt;

use serde::Serialize;

/// A non-fatal problem found while processing user-supplied content.
///
/// The offending item is dropped (or left unchanged) and the surrounding
/// operation still succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// A link category outside the fixed set.
    UnknownCategory { category: String },
    /// A link entry without a usable URL.
    MalformedLink { category: String, reason: String },
    /// A file reference whose staged source could not be relocated.
    StaleReference { reference: String, reason: String },
    /// An item an admin approved that was never proposed.
    UnlistedItem { item: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCategory { category } => {
                write!(f, "ignored unknown link category '{category}'")
            }
            Self::MalformedLink { category, reason } => {
                write!(f, "ignored malformed link in '{category}': {reason}")
            }
            Self::StaleReference { reference, reason } => {
                write!(f, "kept stale reference {reference}: {reason}")
            }
            Self::UnlistedItem { item } => {
                write!(f, "ignored approved item that was not proposed: {item}")
            }
        }
    }
}
