//! Typed views over `resource` rows.
//!
//! A row is either a primary resource that moves through moderation, or an
//! immutable audit record left behind by a supplement decision. The JSON
//! columns are decoded leniently so rows written by older clients still load.

use chrono::{DateTime, Utc};
use common::{LinkMap, ResourceStatus, links};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::resource;

use super::error::WorkflowError;

/// Moderated content of a primary resource.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceContent {
    pub title: String,
    pub title_en: String,
    pub resource_type: String,
    pub images: Vec<String>,
    pub poster_image: Option<String>,
    pub links: LinkMap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    pub id: i32,
    pub content: ResourceContent,
    pub status: ResourceStatus,
    pub supplement: Option<SupplementPayload>,
}

impl Resource {
    /// A supplement that still awaits a decision.
    pub fn pending_supplement(&self) -> Option<&SupplementPayload> {
        self.supplement
            .as_ref()
            .filter(|s| s.status == ResourceStatus::Pending)
    }
}

/// Trace of a supplement decision. Never moderated or supplemented itself.
#[derive(Clone, Debug, PartialEq)]
pub struct SupplementAuditRecord {
    pub id: i32,
    pub original_resource_id: Option<i32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResourceRecord {
    Primary(Resource),
    SupplementAudit(SupplementAuditRecord),
}

impl ResourceRecord {
    /// The primary resource, or `InvalidState` for an audit record.
    pub fn into_primary(self) -> Result<Resource, WorkflowError> {
        match self {
            Self::Primary(r) => Ok(r),
            Self::SupplementAudit(a) => {
                let message = match a.original_resource_id {
                    Some(base) => {
                        format!("Resource {} is a supplement audit record of {base}", a.id)
                    }
                    None => format!("Resource {} is a supplement audit record", a.id),
                };
                Err(WorkflowError::InvalidState(message))
            }
        }
    }
}

impl From<&resource::Model> for ResourceContent {
    fn from(m: &resource::Model) -> Self {
        Self {
            title: m.title.clone(),
            title_en: m.title_en.clone(),
            resource_type: m.resource_type.clone(),
            images: image_list(&m.images),
            poster_image: m.poster_image.clone(),
            links: links::normalize_value(&m.links).links,
        }
    }
}

impl From<resource::Model> for ResourceRecord {
    fn from(m: resource::Model) -> Self {
        if m.is_supplement_record {
            return Self::SupplementAudit(SupplementAuditRecord {
                id: m.id,
                original_resource_id: m.original_resource_id,
            });
        }
        Self::Primary(Resource {
            id: m.id,
            content: ResourceContent::from(&m),
            status: m.status,
            supplement: m.supplement.as_ref().and_then(SupplementPayload::from_value),
        })
    }
}

/// A community contribution awaiting (or denied) approval, embedded on its base.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupplementPayload {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub links: LinkMap,
    pub status: ResourceStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_notes: Option<String>,
}

#[derive(Deserialize)]
struct StoredPayload {
    #[serde(default)]
    images: Value,
    #[serde(default)]
    links: Value,
    #[serde(default)]
    status: ResourceStatus,
    submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    approval_notes: Option<String>,
}

impl SupplementPayload {
    pub fn pending(images: Vec<String>, links: LinkMap) -> Self {
        Self {
            images,
            links,
            status: ResourceStatus::Pending,
            submitted_at: Utc::now(),
            approval_notes: None,
        }
    }

    /// Decode a stored payload; links and images are healed like fresh input.
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        let stored: StoredPayload = match serde_json::from_value(value.clone()) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable supplement payload");
                return None;
            }
        };
        Some(Self {
            images: image_list(&stored.images),
            links: links::normalize_value(&stored.links).links,
            status: stored.status,
            submitted_at: stored.submitted_at.unwrap_or_default(),
            approval_notes: stored.approval_notes,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Decode a JSON image column, skipping anything that is not a string.
pub fn image_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn images_value(images: &[String]) -> Value {
    Value::from(images.to_vec())
}

pub fn links_value(links: &LinkMap) -> Value {
    serde_json::to_value(links).unwrap_or_default()
}
