//! Read paths. Approved primaries whose references still point at staging are
//! healed on the way out and the fixed references persisted.

use chrono::Utc;
use common::ResourceStatus;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::{info, warn};

use super::error::WorkflowError;
use super::lifecycle::{ResourceService, find_for_update};
use super::reconcile::{PathReconciler, is_staged};
use super::record::{SupplementPayload, image_list, images_value};
use crate::entity::{decision_log, resource};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CreatedAt,
    LikeCount,
}

#[derive(Clone, Debug)]
pub struct ListParams {
    /// 1-based.
    pub page: u64,
    pub per_page: u64,
    /// Case-insensitive match against both titles.
    pub search: Option<String>,
    pub sort: SortKey,
    pub descending: bool,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            search: None,
            sort: SortKey::CreatedAt,
            descending: true,
        }
    }
}

#[derive(Debug)]
pub struct Page {
    pub items: Vec<resource::Model>,
    pub total: u64,
}

/// Audit trail of one resource.
#[derive(Debug)]
pub struct History {
    pub audit_records: Vec<resource::Model>,
    pub decisions: Vec<decision_log::Model>,
}

const HEAL_BATCH: u64 = 100;

impl ResourceService {
    /// Fetch one row.
    ///
    /// The admin view returns any row as stored. The public view follows an
    /// audit record to its base and only shows approved primaries.
    pub async fn get(&self, id: i32, admin_view: bool) -> Result<resource::Model, WorkflowError> {
        let model = find(&self.db, id).await?;
        if admin_view {
            return self.heal(model).await;
        }

        let model = match (model.is_supplement_record, model.original_resource_id) {
            (true, Some(original)) => find(&self.db, original).await?,
            (true, None) => return Err(WorkflowError::NotFound(id)),
            (false, _) => model,
        };
        if model.status != ResourceStatus::Approved {
            return Err(WorkflowError::NotFound(id));
        }
        self.heal(model).await
    }

    /// Approved primaries, searchable and sortable.
    pub async fn list_public(&self, params: &ListParams) -> Result<Page, WorkflowError> {
        let mut select = resource::Entity::find()
            .filter(resource::Column::Status.eq(ResourceStatus::Approved))
            .filter(resource::Column::IsSupplementRecord.eq(false));

        if let Some(ref search) = params.search {
            let term = escape_like(search.trim());
            if !term.is_empty() {
                let pattern = format!("%{}%", term.to_lowercase());
                select = select.filter(
                    Condition::any()
                        .add(
                            Expr::expr(Func::lower(Expr::col(resource::Column::Title)))
                                .like(LikeExpr::new(pattern.clone()).escape('\\')),
                        )
                        .add(
                            Expr::expr(Func::lower(Expr::col(resource::Column::TitleEn)))
                                .like(LikeExpr::new(pattern).escape('\\')),
                        ),
                );
            }
        }

        let order = if params.descending {
            Order::Desc
        } else {
            Order::Asc
        };
        let column = match params.sort {
            SortKey::CreatedAt => resource::Column::CreatedAt,
            SortKey::LikeCount => resource::Column::LikeCount,
        };
        let select = select
            .order_by(column, order.clone())
            .order_by(resource::Column::Id, order);

        let page = self.fetch_page(select, params).await?;
        let mut items = Vec::with_capacity(page.items.len());
        for model in page.items {
            items.push(self.heal(model).await?);
        }
        Ok(Page {
            items,
            total: page.total,
        })
    }

    /// Every row not hidden by an admin, audit records included.
    pub async fn list_admin(&self, params: &ListParams) -> Result<Page, WorkflowError> {
        let select = resource::Entity::find()
            .filter(resource::Column::Hidden.eq(false))
            .order_by_desc(resource::Column::CreatedAt)
            .order_by_desc(resource::Column::Id);
        self.fetch_page(select, params).await
    }

    /// Pending submissions and resources with a supplement awaiting review.
    pub async fn list_pending(&self) -> Result<Vec<resource::Model>, WorkflowError> {
        let rows = resource::Entity::find()
            .filter(resource::Column::IsSupplementRecord.eq(false))
            .filter(resource::Column::Hidden.eq(false))
            .filter(
                Condition::any()
                    .add(resource::Column::Status.eq(ResourceStatus::Pending))
                    .add(resource::Column::Supplement.is_not_null()),
            )
            .order_by_asc(resource::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|m| m.status == ResourceStatus::Pending || has_pending_supplement(m))
            .collect())
    }

    /// Resources with a supplement awaiting review.
    pub async fn list_pending_supplements(&self) -> Result<Vec<resource::Model>, WorkflowError> {
        let rows = resource::Entity::find()
            .filter(resource::Column::IsSupplementRecord.eq(false))
            .filter(resource::Column::Supplement.is_not_null())
            .order_by_asc(resource::Column::UpdatedAt)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().filter(has_pending_supplement).collect())
    }

    /// The supplement stored on a resource, pending or rejected.
    pub async fn supplement_of(
        &self,
        id: i32,
    ) -> Result<Option<SupplementPayload>, WorkflowError> {
        let model = find(&self.db, id).await?;
        Ok(model
            .supplement
            .as_ref()
            .and_then(SupplementPayload::from_value))
    }

    pub async fn history(&self, id: i32) -> Result<History, WorkflowError> {
        find(&self.db, id).await?;

        let audit_records = resource::Entity::find()
            .filter(resource::Column::IsSupplementRecord.eq(true))
            .filter(resource::Column::OriginalResourceId.eq(id))
            .order_by_asc(resource::Column::Id)
            .all(&self.db)
            .await?;
        let decisions = decision_log::Entity::find()
            .filter(decision_log::Column::ResourceId.eq(id))
            .order_by_asc(decision_log::Column::Id)
            .all(&self.db)
            .await?;

        Ok(History {
            audit_records,
            decisions,
        })
    }

    /// Reconcile staged references of every approved primary. Returns the
    /// number of rows rewritten.
    pub async fn heal_all(&self) -> Result<u64, WorkflowError> {
        let mut paginator = resource::Entity::find()
            .filter(resource::Column::Status.eq(ResourceStatus::Approved))
            .filter(resource::Column::IsSupplementRecord.eq(false))
            .order_by_asc(resource::Column::Id)
            .paginate(&self.db, HEAL_BATCH);

        let mut healed = 0u64;
        while let Some(batch) = paginator.fetch_and_next().await? {
            for model in batch {
                if needs_healing(&model) {
                    let before = model.clone();
                    if self.heal(model).await? != before {
                        healed += 1;
                    }
                }
            }
        }

        if healed > 0 {
            info!(healed, "Healed staged references");
        }
        Ok(healed)
    }

    /// Move staged references of an approved primary into canonical storage.
    async fn heal(&self, model: resource::Model) -> Result<resource::Model, WorkflowError> {
        if !needs_healing(&model) {
            return Ok(model);
        }

        let txn = self.db.begin().await?;
        let current = find_for_update(&txn, model.id).await?;
        if !needs_healing(&current) {
            return Ok(current);
        }

        let reconciler = PathReconciler::new(self.store.as_ref());
        let images = image_list(&current.images);
        let (healed_images, _) = reconciler.relocate_approved(current.id, &images).await;
        let healed_poster = match current.poster_image.as_deref() {
            Some(poster) => Some(reconciler.reconcile(current.id, poster).await.reference),
            None => None,
        };

        if healed_images == images && healed_poster == current.poster_image {
            warn!(id = current.id, "Staged references could not be healed");
            return Ok(current);
        }

        let mut active: resource::ActiveModel = current.into();
        active.images = Set(images_value(&healed_images));
        active.poster_image = Set(healed_poster);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(id = updated.id, "Healed staged references");
        Ok(updated)
    }

    async fn fetch_page(
        &self,
        select: Select<resource::Entity>,
        params: &ListParams,
    ) -> Result<Page, WorkflowError> {
        let page = Ord::max(params.page, 1);
        let per_page = params.per_page.clamp(1, 100);

        let total = select
            .clone()
            .paginate(&self.db, per_page)
            .num_items()
            .await?;
        // Database offsets are signed.
        let offset = Ord::min(
            page.saturating_sub(1).saturating_mul(per_page),
            i64::MAX as u64,
        );
        let items = select
            .offset(Some(offset))
            .limit(Some(per_page))
            .all(&self.db)
            .await?;

        Ok(Page { items, total })
    }
}

async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<resource::Model, WorkflowError> {
    resource::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(WorkflowError::NotFound(id))
}

fn needs_healing(model: &resource::Model) -> bool {
    if model.is_supplement_record || model.status != ResourceStatus::Approved {
        return false;
    }
    image_list(&model.images).iter().any(|i| is_staged(i))
        || model.poster_image.as_deref().is_some_and(is_staged)
}

fn has_pending_supplement(model: &resource::Model) -> bool {
    model
        .supplement
        .as_ref()
        .and_then(SupplementPayload::from_value)
        .is_some_and(|s| s.status == ResourceStatus::Pending)
}

/// Escape LIKE wildcard characters in a search string.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
