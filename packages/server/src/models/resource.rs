use chrono::{DateTime, Utc};
use common::links::{self, RawLinks};
use common::{LinkMap, ResourceStatus, ValidationWarning};
use serde::{Deserialize, Serialize};

use crate::entity::decision_log::{self, DecisionTarget};
use crate::entity::resource;
use crate::workflow::merge::LinkSelector;
use crate::workflow::record::{SupplementPayload, image_list};
use crate::workflow::{Decision, DecisionOutcome, NewResource, ResourcePatch};

use super::shared::{Pagination, double_option, warning_messages};

/// Request body for an anonymous resource submission.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateResourceRequest {
    #[schema(example = "千与千寻")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Spirited Away")]
    pub title_en: String,
    #[serde(default)]
    pub description: String,
    /// Comma-separated type tags.
    #[serde(default)]
    #[schema(example = "movie,anime")]
    pub resource_type: String,
    /// Staged upload references.
    #[serde(default)]
    #[schema(example = json!(["/assets/uploads/20240101/9f86d081884c7d65.jpg"]))]
    pub images: Vec<String>,
    pub poster_image: Option<String>,
    /// Links by category. Entries are URL strings or `{url, password, note}` objects.
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"baidu": [{"url": "https://pan.baidu.com/s/1abc", "password": "x1y2"}]}))]
    pub links: RawLinks,
}

impl From<CreateResourceRequest> for NewResource {
    fn from(r: CreateResourceRequest) -> Self {
        Self {
            title: r.title,
            title_en: r.title_en,
            description: r.description,
            resource_type: r.resource_type,
            images: r.images,
            poster_image: r.poster_image,
            links: r.links,
        }
    }
}

/// Admin edit. Absent fields are left unchanged.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub resource_type: Option<String>,
    pub images: Option<Vec<String>>,
    /// `null` clears the poster.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub poster_image: Option<Option<String>>,
    #[schema(value_type = Option<Object>)]
    pub links: Option<RawLinks>,
}

impl From<UpdateResourceRequest> for ResourcePatch {
    fn from(r: UpdateResourceRequest) -> Self {
        Self {
            title: r.title,
            title_en: r.title_en,
            description: r.description,
            resource_type: r.resource_type,
            images: r.images,
            poster_image: r.poster_image,
            links: r.links,
        }
    }
}

/// Admin decision on a pending resource or on its pending supplement.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct DecisionRequest {
    /// `approved` or `rejected`.
    #[schema(example = "approved")]
    pub status: ResourceStatus,
    #[schema(example = "Links verified")]
    pub notes: Option<String>,
    /// Images to accept. Absent accepts every proposed image; `[]` accepts none.
    #[schema(example = json!(["/assets/uploads/20240101/9f86d081884c7d65.jpg"]))]
    pub approved_images: Option<Vec<String>>,
    /// Links to accept. Absent accepts every proposed link.
    pub approved_links: Option<Vec<LinkSelector>>,
    /// Must be one of the accepted images (or, for supplements, an existing image).
    pub poster_image: Option<String>,
}

impl DecisionRequest {
    pub fn into_decision(self, decided_by: i32) -> Decision {
        Decision {
            status: self.status,
            notes: self.notes,
            approved_images: self.approved_images,
            approved_links: self.approved_links,
            poster_image: self.poster_image,
            decided_by: Some(decided_by),
        }
    }
}

/// Request body for proposing extra content on an approved resource.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SupplementRequest {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"magnet": ["magnet:?xt=urn:btih:abc"]}))]
    pub links: RawLinks,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SupplementResponse {
    pub images: Vec<String>,
    #[schema(value_type = Object)]
    pub links: LinkMap,
    #[schema(example = "pending")]
    pub status: ResourceStatus,
    pub submitted_at: DateTime<Utc>,
    pub approval_notes: Option<String>,
}

impl From<SupplementPayload> for SupplementResponse {
    fn from(p: SupplementPayload) -> Self {
        Self {
            images: p.images,
            links: p.links,
            status: p.status,
            submitted_at: p.submitted_at,
            approval_notes: p.approval_notes,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResourceResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "千与千寻")]
    pub title: String,
    #[schema(example = "Spirited Away")]
    pub title_en: String,
    pub description: String,
    #[schema(example = "movie,anime")]
    pub resource_type: String,
    #[schema(example = json!(["/assets/imgs/42/9f86d081884c7d65.jpg"]))]
    pub images: Vec<String>,
    #[schema(example = "/assets/imgs/42/9f86d081884c7d65.jpg")]
    pub poster_image: Option<String>,
    #[schema(value_type = Object)]
    pub links: LinkMap,
    #[schema(example = "approved")]
    pub status: ResourceStatus,
    pub supplement: Option<SupplementResponse>,
    /// For supplement audit records: the resource they belong to.
    pub original_resource_id: Option<i32>,
    #[schema(example = false)]
    pub is_supplement_record: bool,
    #[schema(example = 7)]
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Dropped input, e.g. unknown link categories.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ResourceResponse {
    pub fn with_warnings(mut self, warnings: &[ValidationWarning]) -> Self {
        self.warnings = warning_messages(warnings);
        self
    }
}

impl From<resource::Model> for ResourceResponse {
    fn from(m: resource::Model) -> Self {
        Self {
            id: m.id,
            images: image_list(&m.images),
            links: links::normalize_value(&m.links).links,
            supplement: m
                .supplement
                .as_ref()
                .and_then(SupplementPayload::from_value)
                .map(Into::into),
            title: m.title,
            title_en: m.title_en,
            description: m.description,
            resource_type: m.resource_type,
            poster_image: m.poster_image,
            status: m.status,
            original_resource_id: m.original_resource_id,
            is_supplement_record: m.is_supplement_record,
            like_count: m.like_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
            warnings: Vec::new(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResourceListResponse {
    pub data: Vec<ResourceResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DecisionResponse {
    pub resource: ResourceResponse,
    #[schema(example = "base")]
    pub target: DecisionTarget,
    /// Audit record created by a supplement decision.
    pub audit_record_id: Option<i32>,
    pub decision_id: i32,
    pub warnings: Vec<String>,
}

impl From<DecisionOutcome> for DecisionResponse {
    fn from(o: DecisionOutcome) -> Self {
        Self {
            resource: o.resource.into(),
            target: o.target,
            audit_record_id: o.audit_record.map(|a| a.id),
            decision_id: o.log_entry.id,
            warnings: warning_messages(&o.warnings),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LikeResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 8)]
    pub like_count: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SupplementDetailResponse {
    pub resource_id: i32,
    pub supplement: Option<SupplementResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DecisionLogResponse {
    pub id: i32,
    pub target: DecisionTarget,
    pub status: ResourceStatus,
    pub notes: Option<String>,
    pub accepted_images: Vec<String>,
    pub rejected_images: Vec<String>,
    #[schema(value_type = Object)]
    pub accepted_links: LinkMap,
    #[schema(value_type = Object)]
    pub rejected_links: LinkMap,
    pub audit_record_id: Option<i32>,
    pub decided_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<decision_log::Model> for DecisionLogResponse {
    fn from(m: decision_log::Model) -> Self {
        Self {
            id: m.id,
            target: m.target,
            status: m.status,
            notes: m.notes,
            accepted_images: image_list(&m.accepted_images),
            rejected_images: image_list(&m.rejected_images),
            accepted_links: links::normalize_value(&m.accepted_links).links,
            rejected_links: links::normalize_value(&m.rejected_links).links,
            audit_record_id: m.audit_record_id,
            decided_by: m.decided_by,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HistoryResponse {
    pub resource_id: i32,
    pub audit_records: Vec<ResourceResponse>,
    pub decisions: Vec<DecisionLogResponse>,
}

/// Query parameters for the public listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PublicListQuery {
    /// Page number (1-indexed).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive match on either title.
    #[param(example = "spirited")]
    pub search: Option<String>,
    /// `created_at` (default) or `like_count`.
    #[param(example = "like_count")]
    pub sort_by: Option<String>,
    /// `desc` (default) or `asc`.
    #[param(example = "desc")]
    pub sort_order: Option<String>,
}

/// Query parameters for the admin listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DetailQuery {
    /// Return audit records as stored instead of redirecting to their resource.
    /// Requires an admin token.
    #[serde(default)]
    pub admin_view: bool,
}
