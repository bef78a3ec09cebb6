use common::ResourceStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A community-submitted resource, or an audit row recording one supplement decision.
///
/// Rows with `is_supplement_record = true` are immutable history and are never
/// listed as browsable entries; see `workflow::record::ResourceRecord`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resource")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub title: String,
    #[sea_orm(indexed)]
    pub title_en: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Comma-separated type tags.
    pub resource_type: String,

    /// Ordered JSON array of asset references.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: serde_json::Value,

    pub poster_image: Option<String>,

    #[sea_orm(indexed)]
    pub status: ResourceStatus,

    /// Soft-deleted from admin listings.
    #[sea_orm(default_value = false)]
    pub hidden: bool,

    /// JSON object mapping link category to `[{url, password, note}]`.
    #[sea_orm(column_type = "JsonBinary")]
    pub links: serde_json::Value,

    /// For audit rows: the resource the supplement was attached to.
    #[sea_orm(indexed)]
    pub original_resource_id: Option<i32>,

    /// Embedded supplement payload, see `workflow::record::SupplementPayload`.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub supplement: Option<serde_json::Value>,

    #[sea_orm(default_value = false, indexed)]
    pub is_supplement_record: bool,

    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
