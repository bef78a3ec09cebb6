//! Moderation workflow: submission, admin decisions, supplements and the
//! audit trail they leave behind.

mod catalog;
pub mod error;
mod lifecycle;
pub mod merge;
pub mod reconcile;
pub mod record;

use serde::{Deserialize, Serialize};

pub use catalog::{History, ListParams, Page, SortKey};
pub use error::WorkflowError;
pub use lifecycle::{Decision, DecisionOutcome, NewResource, ResourcePatch, ResourceService, Written};

/// What happens when a supplement arrives while another one awaits review.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplementPolicy {
    /// The new payload replaces the pending one.
    #[default]
    Overwrite,
    /// The new payload is refused until the pending one is decided.
    RejectWhilePending,
}
