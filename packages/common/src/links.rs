//! Link registry: normalizes external-link submissions into [`LinkMap`].
//!
//! Submissions arrive grouped by category, each entry either a bare URL string
//! or a `{url, password, note}` object. Normalization is lenient: unknown
//! categories and malformed entries are dropped with a [`ValidationWarning`]
//! while everything else is kept.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::warning::ValidationWarning;

/// The closed set of link categories a resource may carry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
pub enum LinkCategory {
    #[serde(rename = "magnet")]
    Magnet,
    #[serde(rename = "ed2k")]
    Ed2k,
    #[serde(rename = "uc")]
    Uc,
    #[serde(rename = "mobile")]
    Mobile,
    #[serde(rename = "tianyi")]
    Tianyi,
    #[serde(rename = "quark")]
    Quark,
    #[serde(rename = "115")]
    Pan115,
    #[serde(rename = "aliyun")]
    Aliyun,
    #[serde(rename = "pikpak")]
    Pikpak,
    #[serde(rename = "baidu")]
    Baidu,
    #[serde(rename = "123")]
    Pan123,
    #[serde(rename = "online")]
    Online,
    #[serde(rename = "others")]
    Others,
}

impl LinkCategory {
    pub const ALL: &'static [LinkCategory] = &[
        Self::Magnet,
        Self::Ed2k,
        Self::Uc,
        Self::Mobile,
        Self::Tianyi,
        Self::Quark,
        Self::Pan115,
        Self::Aliyun,
        Self::Pikpak,
        Self::Baidu,
        Self::Pan123,
        Self::Online,
        Self::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Magnet => "magnet",
            Self::Ed2k => "ed2k",
            Self::Uc => "uc",
            Self::Mobile => "mobile",
            Self::Tianyi => "tianyi",
            Self::Quark => "quark",
            Self::Pan115 => "115",
            Self::Aliyun => "aliyun",
            Self::Pikpak => "pikpak",
            Self::Baidu => "baidu",
            Self::Pan123 => "123",
            Self::Online => "online",
            Self::Others => "others",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A normalized link. `password` and `note` are empty strings when absent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LinkEntry {
    #[schema(example = "https://pan.baidu.com/s/1abc")]
    pub url: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub note: String,
}

impl LinkEntry {
    pub fn bare(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            password: String::new(),
            note: String::new(),
        }
    }
}

/// Normalized links grouped by category.
pub type LinkMap = BTreeMap<LinkCategory, Vec<LinkEntry>>;

/// A link entry as submitted, before normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLink {
    Bare(String),
    Structured {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        password: Option<String>,
        #[serde(default)]
        note: Option<String>,
    },
    /// Anything else (numbers, arrays, ...). Always dropped.
    Malformed(serde_json::Value),
}

/// Links as submitted: free-form category keys mapped to whatever value the
/// client sent. Each value is checked on its own during [`normalize`], so one
/// badly shaped category never invalidates the rest.
pub type RawLinks = BTreeMap<String, serde_json::Value>;

/// Result of [`normalize`].
#[derive(Debug, Default)]
pub struct Normalized {
    pub links: LinkMap,
    pub warnings: Vec<ValidationWarning>,
}

impl Normalized {
    fn malformed(&mut self, category: &str, reason: String) {
        warn!(%category, %reason, "Ignoring malformed link entry");
        self.warnings.push(ValidationWarning::MalformedLink {
            category: category.to_string(),
            reason,
        });
    }
}

/// Normalize raw links into the canonical structured form.
///
/// Every valid category whose value is a list is present in the output, even
/// if all its entries were dropped. A valid category holding anything other
/// than a list is dropped alone with a warning.
pub fn normalize(raw: &RawLinks) -> Normalized {
    let mut out = Normalized::default();

    for (key, value) in raw {
        let Ok(category) = key.parse::<LinkCategory>() else {
            warn!(category = %key, "Ignoring unknown link category");
            out.warnings.push(ValidationWarning::UnknownCategory {
                category: key.clone(),
            });
            continue;
        };

        let Some(entries) = value.as_array() else {
            out.malformed(key, format!("expected a list of links, got {value}"));
            continue;
        };

        let mut list = Vec::with_capacity(entries.len());
        for entry in entries {
            let parsed = serde_json::from_value::<RawLink>(entry.clone())
                .map_err(|e| e.to_string())
                .and_then(|raw| normalize_entry(&raw));
            match parsed {
                Ok(link) => list.push(link),
                Err(reason) => out.malformed(key, reason),
            }
        }
        out.links.insert(category, list);
    }

    out
}

fn normalize_entry(entry: &RawLink) -> Result<LinkEntry, String> {
    match entry {
        RawLink::Bare(url) if !url.trim().is_empty() => Ok(LinkEntry::bare(url.clone())),
        RawLink::Bare(_) => Err("empty url".into()),
        RawLink::Structured {
            url,
            password,
            note,
        } => match url {
            Some(url) if !url.trim().is_empty() => Ok(LinkEntry {
                url: url.clone(),
                password: password.clone().unwrap_or_default(),
                note: note.clone().unwrap_or_default(),
            }),
            _ => Err("missing url".into()),
        },
        RawLink::Malformed(value) => Err(format!("unsupported entry {value}")),
    }
}

/// Decode and normalize a stored JSON link column.
///
/// Rows written before normalization existed may still hold bare strings or
/// unknown categories; those are healed the same way as fresh submissions.
pub fn normalize_value(value: &serde_json::Value) -> Normalized {
    if value.is_null() {
        return Normalized::default();
    }
    match serde_json::from_value::<RawLinks>(value.clone()) {
        Ok(raw) => normalize(&raw),
        Err(e) => {
            warn!(error = %e, "Stored links are not a category map, discarding");
            Normalized {
                links: LinkMap::new(),
                warnings: vec![ValidationWarning::MalformedLink {
                    category: "*".into(),
                    reason: e.to_string(),
                }],
            }
        }
    }
}

/// Total number of link entries across all categories.
pub fn count(links: &LinkMap) -> usize {
    links.values().map(Vec::len).sum()
}
