//! Pure selection and merge rules for admin decisions.
//!
//! Nothing here touches storage or the database: callers select what an admin
//! accepted, relocate the accepted files, then merge the result into the base
//! resource.

use std::collections::HashSet;

use common::{LinkCategory, LinkMap, ValidationWarning};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::WorkflowError;

/// Identifies one proposed link in an admin's approval list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LinkSelector {
    #[schema(example = "baidu")]
    pub category: String,
    #[schema(example = "https://pan.baidu.com/s/1abc")]
    pub url: String,
}

/// Outcome of partitioning proposed content by an approval list.
#[derive(Debug, Default, PartialEq)]
pub struct Selection<T> {
    pub accepted: T,
    pub rejected: T,
    pub warnings: Vec<ValidationWarning>,
}

/// Partition proposed image references.
///
/// `None` accepts every proposed image. `Some(list)` accepts exactly the listed
/// images, in the listed order; listed references that were never proposed are
/// dropped with a warning.
pub fn select_images(proposed: &[String], approved: Option<&[String]>) -> Selection<Vec<String>> {
    let Some(approved) = approved else {
        return Selection {
            accepted: dedup(proposed.iter().cloned()),
            ..Default::default()
        };
    };

    let proposed_set: HashSet<&str> = proposed.iter().map(String::as_str).collect();
    let mut warnings = Vec::new();
    let mut accepted = Vec::new();
    for image in approved {
        if !proposed_set.contains(image.as_str()) {
            warn!(image = %image, "Approved image was not proposed, ignoring");
            warnings.push(ValidationWarning::UnlistedItem {
                item: image.clone(),
            });
            continue;
        }
        if !accepted.contains(image) {
            accepted.push(image.clone());
        }
    }

    let rejected = dedup(proposed.iter().filter(|p| !accepted.contains(p)).cloned());

    Selection {
        accepted,
        rejected,
        warnings,
    }
}

/// Partition proposed links. Selection semantics match [`select_images`];
/// a selector matches a proposed entry on category and URL.
pub fn select_links(proposed: &LinkMap, approved: Option<&[LinkSelector]>) -> Selection<LinkMap> {
    let Some(approved) = approved else {
        return Selection {
            accepted: proposed.clone(),
            ..Default::default()
        };
    };

    let mut warnings = Vec::new();
    let mut wanted: HashSet<(LinkCategory, &str)> = HashSet::new();
    for selector in approved {
        let matched = selector
            .category
            .parse::<LinkCategory>()
            .ok()
            .filter(|category| {
                proposed
                    .get(category)
                    .is_some_and(|list| list.iter().any(|e| e.url == selector.url))
            });
        match matched {
            Some(category) => {
                wanted.insert((category, selector.url.as_str()));
            }
            None => {
                let item = format!("{}:{}", selector.category, selector.url);
                warn!(%item, "Approved link was not proposed, ignoring");
                warnings.push(ValidationWarning::UnlistedItem { item });
            }
        }
    }

    let mut accepted = LinkMap::new();
    let mut rejected = LinkMap::new();
    for (category, entries) in proposed {
        for entry in entries {
            let target = if wanted.contains(&(*category, entry.url.as_str())) {
                &mut accepted
            } else {
                &mut rejected
            };
            target.entry(*category).or_default().push(entry.clone());
        }
    }

    Selection {
        accepted,
        rejected,
        warnings,
    }
}

/// Append `additions` to `base`, keeping order and skipping anything already present.
pub fn append_unique(base: &mut Vec<String>, additions: &[String]) {
    for item in additions {
        if !base.contains(item) {
            base.push(item.clone());
        }
    }
}

/// Merge links additively per category, skipping exact duplicates.
pub fn merge_links(base: &mut LinkMap, additions: &LinkMap) {
    for (category, entries) in additions {
        let list = base.entry(*category).or_default();
        for entry in entries {
            if !list.contains(entry) {
                list.push(entry.clone());
            }
        }
    }
}

/// Map a poster chosen by an admin onto the relocated image list.
///
/// `originals` and `relocated` are parallel lists. The poster may name either
/// form of an image; anything outside the list is rejected.
pub fn resolve_poster(
    poster: &str,
    originals: &[String],
    relocated: &[String],
) -> Result<String, WorkflowError> {
    if let Some(found) = originals
        .iter()
        .position(|o| o == poster)
        .and_then(|pos| relocated.get(pos))
    {
        return Ok(found.clone());
    }
    if relocated.iter().any(|r| r == poster) {
        return Ok(poster.to_string());
    }
    Err(WorkflowError::InvalidState(format!(
        "Poster image {poster} is not among the approved images"
    )))
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out = Vec::new();
    append_unique(&mut out, &items.collect::<Vec<_>>());
    out
}
