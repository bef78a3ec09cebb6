use common::ResourceStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What an admin decision applied to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum DecisionTarget {
    /// The resource's own pending submission.
    #[sea_orm(string_value = "base")]
    Base,
    /// A pending supplement attached to an approved resource.
    #[sea_orm(string_value = "supplement")]
    Supplement,
}

/// Append-only log of admin decisions, one row per decision.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "decision_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub resource_id: i32,

    pub target: DecisionTarget,
    pub status: ResourceStatus,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// Image references accepted by this decision (after relocation).
    #[sea_orm(column_type = "JsonBinary")]
    pub accepted_images: serde_json::Value,
    #[sea_orm(column_type = "JsonBinary")]
    pub rejected_images: serde_json::Value,
    #[sea_orm(column_type = "JsonBinary")]
    pub accepted_links: serde_json::Value,
    #[sea_orm(column_type = "JsonBinary")]
    pub rejected_links: serde_json::Value,

    /// The audit row created for supplement decisions.
    pub audit_record_id: Option<i32>,

    /// User ID of the deciding admin.
    pub decided_by: Option<i32>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
