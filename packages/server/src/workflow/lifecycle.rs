use std::sync::Arc;

use chrono::Utc;
use common::links::{self, RawLinks};
use common::storage::AssetStore;
use common::{LinkMap, ResourceStatus, ValidationWarning};
use sea_orm::sea_query::{Expr, ExprTrait, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

use super::SupplementPolicy;
use super::error::WorkflowError;
use super::merge::{
    LinkSelector, append_unique, merge_links, resolve_poster, select_images, select_links,
};
use super::reconcile::PathReconciler;
use super::record::{Resource, ResourceRecord, SupplementPayload, images_value, links_value};
use crate::entity::decision_log::{self, DecisionTarget};
use crate::entity::resource;

/// Fields of an anonymous submission.
#[derive(Debug, Default)]
pub struct NewResource {
    pub title: String,
    pub title_en: String,
    pub description: String,
    pub resource_type: String,
    pub images: Vec<String>,
    pub poster_image: Option<String>,
    pub links: RawLinks,
}

/// Admin edits. `None` leaves a field unchanged.
#[derive(Debug, Default)]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub resource_type: Option<String>,
    pub images: Option<Vec<String>>,
    pub poster_image: Option<Option<String>>,
    pub links: Option<RawLinks>,
}

/// An admin decision on a resource or on its pending supplement.
#[derive(Debug)]
pub struct Decision {
    pub status: ResourceStatus,
    pub notes: Option<String>,
    /// `None` approves every proposed image.
    pub approved_images: Option<Vec<String>>,
    /// `None` approves every proposed link.
    pub approved_links: Option<Vec<LinkSelector>>,
    pub poster_image: Option<String>,
    pub decided_by: Option<i32>,
}

impl Decision {
    pub fn approve() -> Self {
        Self {
            status: ResourceStatus::Approved,
            notes: None,
            approved_images: None,
            approved_links: None,
            poster_image: None,
            decided_by: None,
        }
    }

    pub fn reject(notes: Option<String>) -> Self {
        Self {
            status: ResourceStatus::Rejected,
            notes,
            ..Self::approve()
        }
    }
}

/// A write that succeeded, with anything dropped along the way.
#[derive(Debug)]
pub struct Written {
    pub resource: resource::Model,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug)]
pub struct DecisionOutcome {
    pub resource: resource::Model,
    pub target: DecisionTarget,
    /// Set for supplement decisions.
    pub audit_record: Option<resource::Model>,
    pub log_entry: decision_log::Model,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Default)]
struct Partition {
    accepted_images: Vec<String>,
    rejected_images: Vec<String>,
    accepted_links: LinkMap,
    rejected_links: LinkMap,
}

/// Owns every state change of a resource.
///
/// Each mutation runs in its own transaction holding a row lock on the
/// resource, so concurrent decisions on one resource serialize.
#[derive(Clone)]
pub struct ResourceService {
    pub(super) db: DatabaseConnection,
    pub(super) store: Arc<dyn AssetStore>,
    policy: SupplementPolicy,
}

impl ResourceService {
    pub fn new(
        db: DatabaseConnection,
        store: Arc<dyn AssetStore>,
        policy: SupplementPolicy,
    ) -> Self {
        Self { db, store, policy }
    }

    /// Create a pending resource. No files are moved.
    pub async fn submit(&self, new: NewResource) -> Result<Written, WorkflowError> {
        let title = validate_title(&new.title)?;
        let normalized = links::normalize(&new.links);
        let images = clean_images(new.images);
        let now = Utc::now();

        let model = resource::ActiveModel {
            title: Set(title),
            title_en: Set(new.title_en.trim().to_string()),
            description: Set(new.description),
            resource_type: Set(new.resource_type.trim().to_string()),
            images: Set(images_value(&images)),
            poster_image: Set(new.poster_image.filter(|p| !p.trim().is_empty())),
            status: Set(ResourceStatus::Pending),
            hidden: Set(false),
            links: Set(links_value(&normalized.links)),
            original_resource_id: Set(None),
            supplement: Set(None),
            is_supplement_record: Set(false),
            like_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(id = model.id, "Resource submitted");
        Ok(Written {
            resource: model,
            warnings: normalized.warnings,
        })
    }

    /// Apply an admin decision.
    ///
    /// A pending supplement takes precedence: the decision then applies to the
    /// supplement and the base status is left alone.
    pub async fn decide(
        &self,
        id: i32,
        decision: Decision,
    ) -> Result<DecisionOutcome, WorkflowError> {
        if !decision.status.is_decided() {
            return Err(WorkflowError::Validation(
                "Decision status must be approved or rejected".into(),
            ));
        }

        let txn = self.db.begin().await?;
        let model = find_for_update(&txn, id).await?;
        let resource = ResourceRecord::from(model.clone()).into_primary()?;

        let outcome = match resource.pending_supplement().cloned() {
            Some(payload) => {
                self.decide_supplement(&txn, model, &resource, payload, &decision)
                    .await?
            }
            None if resource.status == ResourceStatus::Pending => {
                self.decide_base(&txn, model, &resource, &decision).await?
            }
            None => {
                return Err(WorkflowError::InvalidState(format!(
                    "Resource {id} is already {} and has no pending supplement",
                    resource.status
                )));
            }
        };

        txn.commit().await?;

        info!(
            id,
            target = ?outcome.target,
            status = %decision.status,
            audit_record = ?outcome.audit_record.as_ref().map(|a| a.id),
            warnings = outcome.warnings.len(),
            "Decision applied"
        );
        Ok(outcome)
    }

    async fn decide_base(
        &self,
        txn: &DatabaseTransaction,
        model: resource::Model,
        resource: &Resource,
        decision: &Decision,
    ) -> Result<DecisionOutcome, WorkflowError> {
        let mut warnings = Vec::new();
        let mut partition = Partition::default();
        let mut active: resource::ActiveModel = model.into();
        active.status = Set(decision.status);
        active.updated_at = Set(Utc::now());

        if decision.status == ResourceStatus::Approved {
            let images = select_images(
                &resource.content.images,
                decision.approved_images.as_deref(),
            );
            let links = select_links(
                &resource.content.links,
                decision.approved_links.as_deref(),
            );
            warnings.extend(images.warnings);
            warnings.extend(links.warnings);

            let (relocated, relocate_warnings) = PathReconciler::new(self.store.as_ref())
                .relocate_approved(resource.id, &images.accepted)
                .await;
            warnings.extend(relocate_warnings);

            let poster = match non_empty(decision.poster_image.as_deref()) {
                Some(poster) => Some(resolve_poster(poster, &images.accepted, &relocated)?),
                None => relocated.first().cloned(),
            };

            active.images = Set(images_value(&relocated));
            active.poster_image = Set(poster);
            active.links = Set(links_value(&links.accepted));

            partition = Partition {
                accepted_images: relocated,
                rejected_images: images.rejected,
                accepted_links: links.accepted,
                rejected_links: links.rejected,
            };
        }

        let updated = active.update(txn).await?;
        let log_entry = insert_log(
            txn,
            resource.id,
            DecisionTarget::Base,
            decision,
            &partition,
            None,
        )
        .await?;

        Ok(DecisionOutcome {
            resource: updated,
            target: DecisionTarget::Base,
            audit_record: None,
            log_entry,
            warnings,
        })
    }

    async fn decide_supplement(
        &self,
        txn: &DatabaseTransaction,
        model: resource::Model,
        resource: &Resource,
        mut payload: SupplementPayload,
        decision: &Decision,
    ) -> Result<DecisionOutcome, WorkflowError> {
        let now = Utc::now();
        let mut warnings = Vec::new();
        let mut active: resource::ActiveModel = model.into();

        let partition = if decision.status == ResourceStatus::Approved {
            let images = select_images(&payload.images, decision.approved_images.as_deref());
            let links = select_links(&payload.links, decision.approved_links.as_deref());
            warnings.extend(images.warnings);
            warnings.extend(links.warnings);

            let (relocated, relocate_warnings) = PathReconciler::new(self.store.as_ref())
                .relocate_approved(resource.id, &images.accepted)
                .await;
            warnings.extend(relocate_warnings);

            let mut merged_images = resource.content.images.clone();
            append_unique(&mut merged_images, &relocated);

            let poster = match non_empty(decision.poster_image.as_deref()) {
                Some(poster) if resource.content.images.iter().any(|i| i == poster) => {
                    Some(poster.to_string())
                }
                Some(poster) => Some(resolve_poster(poster, &images.accepted, &relocated)?),
                None => resource
                    .content
                    .poster_image
                    .clone()
                    .or_else(|| relocated.first().cloned()),
            };

            let mut merged_links = resource.content.links.clone();
            merge_links(&mut merged_links, &links.accepted);

            active.images = Set(images_value(&merged_images));
            active.poster_image = Set(poster);
            active.links = Set(links_value(&merged_links));
            active.supplement = Set(None);

            Partition {
                accepted_images: relocated,
                rejected_images: images.rejected,
                accepted_links: links.accepted,
                rejected_links: links.rejected,
            }
        } else {
            payload.status = ResourceStatus::Rejected;
            payload.approval_notes = decision.notes.clone();
            active.supplement = Set(Some(payload.to_value()));

            Partition {
                rejected_images: payload.images.clone(),
                rejected_links: payload.links.clone(),
                ..Default::default()
            }
        };
        active.updated_at = Set(now);

        let updated = active.update(txn).await?;

        let description = match non_empty(decision.notes.as_deref()) {
            Some(notes) => format!("Supplement decision: {notes}"),
            None => "Supplement decision".to_string(),
        };
        let audit_record = resource::ActiveModel {
            title: Set(resource.content.title.clone()),
            title_en: Set(resource.content.title_en.clone()),
            description: Set(description),
            resource_type: Set(resource.content.resource_type.clone()),
            images: Set(images_value(&partition.accepted_images)),
            poster_image: Set(None),
            status: Set(decision.status),
            hidden: Set(false),
            links: Set(links_value(&partition.accepted_links)),
            original_resource_id: Set(Some(resource.id)),
            supplement: Set(None),
            is_supplement_record: Set(true),
            like_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        let log_entry = insert_log(
            txn,
            resource.id,
            DecisionTarget::Supplement,
            decision,
            &partition,
            Some(audit_record.id),
        )
        .await?;

        Ok(DecisionOutcome {
            resource: updated,
            target: DecisionTarget::Supplement,
            audit_record: Some(audit_record),
            log_entry,
            warnings,
        })
    }

    /// Attach a supplement to an approved resource.
    pub async fn submit_supplement(
        &self,
        id: i32,
        images: Vec<String>,
        raw_links: RawLinks,
    ) -> Result<Written, WorkflowError> {
        let images = clean_images(images);
        let normalized = links::normalize(&raw_links);
        if images.is_empty() && links::count(&normalized.links) == 0 {
            return Err(WorkflowError::Validation(
                "Supplement must contain at least one image or link".into(),
            ));
        }

        let txn = self.db.begin().await?;
        let model = find_for_update(&txn, id).await?;
        let resource = ResourceRecord::from(model.clone()).into_primary()?;
        if resource.status != ResourceStatus::Approved {
            return Err(WorkflowError::InvalidState(format!(
                "Resource {id} is {}; only approved resources accept supplements",
                resource.status
            )));
        }
        if resource.pending_supplement().is_some() {
            match self.policy {
                SupplementPolicy::RejectWhilePending => {
                    return Err(WorkflowError::InvalidState(format!(
                        "Resource {id} already has a supplement awaiting review"
                    )));
                }
                SupplementPolicy::Overwrite => {
                    warn!(id, "Replacing pending supplement");
                }
            }
        }

        let payload = SupplementPayload::pending(images, normalized.links);
        let mut active: resource::ActiveModel = model.into();
        active.supplement = Set(Some(payload.to_value()));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(
            id,
            images = payload.images.len(),
            links = links::count(&payload.links),
            "Supplement submitted"
        );
        Ok(Written {
            resource: updated,
            warnings: normalized.warnings,
        })
    }

    /// Admin edit of content fields. Status and supplement are untouched.
    pub async fn update(&self, id: i32, patch: ResourcePatch) -> Result<Written, WorkflowError> {
        let txn = self.db.begin().await?;
        let model = find_for_update(&txn, id).await?;
        let mut warnings = Vec::new();
        let mut active: resource::ActiveModel = model.into();

        if let Some(title) = patch.title {
            active.title = Set(validate_title(&title)?);
        }
        if let Some(title_en) = patch.title_en {
            active.title_en = Set(title_en.trim().to_string());
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(resource_type) = patch.resource_type {
            active.resource_type = Set(resource_type.trim().to_string());
        }
        if let Some(images) = patch.images {
            active.images = Set(images_value(&clean_images(images)));
        }
        if let Some(poster_image) = patch.poster_image {
            active.poster_image = Set(poster_image.filter(|p| !p.trim().is_empty()));
        }
        if let Some(raw) = patch.links {
            let normalized = links::normalize(&raw);
            active.links = Set(links_value(&normalized.links));
            warnings = normalized.warnings;
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(Written {
            resource: updated,
            warnings,
        })
    }

    /// Permanently remove a resource row.
    pub async fn delete(&self, id: i32) -> Result<(), WorkflowError> {
        let result = resource::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(WorkflowError::NotFound(id));
        }
        info!(id, "Resource deleted");
        Ok(())
    }

    /// Hide a row from admin listings. The row and its files are kept.
    pub async fn hide(&self, id: i32) -> Result<(), WorkflowError> {
        let result = resource::Entity::update_many()
            .col_expr(resource::Column::Hidden, Expr::value(true))
            .filter(resource::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(WorkflowError::NotFound(id));
        }
        Ok(())
    }

    /// Increment the like counter and return the new value.
    pub async fn like(&self, id: i32) -> Result<i32, WorkflowError> {
        let result = resource::Entity::update_many()
            .col_expr(
                resource::Column::LikeCount,
                Expr::col(resource::Column::LikeCount).add(1),
            )
            .filter(resource::Column::Id.eq(id))
            .filter(resource::Column::IsSupplementRecord.eq(false))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(WorkflowError::NotFound(id));
        }
        self.like_count(id).await
    }

    /// Decrement the like counter, never below zero, and return the new value.
    pub async fn unlike(&self, id: i32) -> Result<i32, WorkflowError> {
        resource::Entity::update_many()
            .col_expr(
                resource::Column::LikeCount,
                Expr::col(resource::Column::LikeCount).sub(1),
            )
            .filter(resource::Column::Id.eq(id))
            .filter(resource::Column::IsSupplementRecord.eq(false))
            .filter(resource::Column::LikeCount.gt(0))
            .exec(&self.db)
            .await?;
        self.like_count(id).await
    }

    async fn like_count(&self, id: i32) -> Result<i32, WorkflowError> {
        resource::Entity::find_by_id(id)
            .filter(resource::Column::IsSupplementRecord.eq(false))
            .select_only()
            .column(resource::Column::LikeCount)
            .into_tuple::<i32>()
            .one(&self.db)
            .await?
            .ok_or(WorkflowError::NotFound(id))
    }
}

pub(super) async fn find_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<resource::Model, WorkflowError> {
    resource::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(WorkflowError::NotFound(id))
}

async fn insert_log(
    txn: &DatabaseTransaction,
    resource_id: i32,
    target: DecisionTarget,
    decision: &Decision,
    partition: &Partition,
    audit_record_id: Option<i32>,
) -> Result<decision_log::Model, WorkflowError> {
    let entry = decision_log::ActiveModel {
        resource_id: Set(resource_id),
        target: Set(target),
        status: Set(decision.status),
        notes: Set(non_empty(decision.notes.as_deref()).map(str::to_string)),
        accepted_images: Set(images_value(&partition.accepted_images)),
        rejected_images: Set(images_value(&partition.rejected_images)),
        accepted_links: Set(links_value(&partition.accepted_links)),
        rejected_links: Set(links_value(&partition.rejected_links)),
        audit_record_id: Set(audit_record_id),
        decided_by: Set(decision.decided_by),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(entry)
}

fn validate_title(title: &str) -> Result<String, WorkflowError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(WorkflowError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(title.to_string())
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(images.len());
    for image in images {
        let image = image.trim();
        if !image.is_empty() && !out.iter().any(|i: &String| i == image) {
            out.push(image.to_string());
        }
    }
    out
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
