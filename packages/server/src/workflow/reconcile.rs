use common::ValidationWarning;
use common::storage::{AssetRef, AssetStore, StorageError};
use tracing::{debug, warn};

/// Result of reconciling one reference.
#[derive(Debug, PartialEq)]
pub struct Reconciled {
    pub reference: String,
    /// A file was copied into canonical storage.
    pub copied: bool,
    pub warning: Option<ValidationWarning>,
}

impl Reconciled {
    fn unchanged(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            copied: false,
            warning: None,
        }
    }

    fn stale(reference: &str, reason: String) -> Self {
        warn!(%reference, %reason, "Keeping unreconciled file reference");
        Self {
            reference: reference.to_string(),
            copied: false,
            warning: Some(ValidationWarning::StaleReference {
                reference: reference.to_string(),
                reason,
            }),
        }
    }
}

/// Moves staged uploads into a resource's canonical directory and rewrites
/// the references. Copies are idempotent and never remove the staged source.
pub struct PathReconciler<'a> {
    store: &'a dyn AssetStore,
}

impl<'a> PathReconciler<'a> {
    pub fn new(store: &'a dyn AssetStore) -> Self {
        Self { store }
    }

    pub async fn reconcile(&self, resource_id: i32, reference: &str) -> Reconciled {
        let asset = match AssetRef::parse(reference) {
            Ok(asset) => asset,
            Err(e) => return Reconciled::stale(reference, e.to_string()),
        };
        if asset.is_canonical() {
            return Reconciled::unchanged(reference);
        }

        let dest = asset.canonical_for(resource_id);
        match self.store.exists(&dest).await {
            Ok(true) => {
                return Reconciled {
                    reference: dest.to_string(),
                    copied: false,
                    warning: None,
                };
            }
            Ok(false) => {}
            Err(e) => return Reconciled::stale(reference, e.to_string()),
        }

        match self.store.copy(&asset, &dest).await {
            Ok(()) => {
                debug!(from = %asset, to = %dest, "Relocated staged file");
                Reconciled {
                    reference: dest.to_string(),
                    copied: true,
                    warning: None,
                }
            }
            Err(StorageError::NotFound(_)) => {
                Reconciled::stale(reference, "staged file is missing".into())
            }
            Err(e) => Reconciled::stale(reference, e.to_string()),
        }
    }

    /// Reconcile every reference, preserving order.
    pub async fn relocate_approved(
        &self,
        resource_id: i32,
        references: &[String],
    ) -> (Vec<String>, Vec<ValidationWarning>) {
        let mut relocated = Vec::with_capacity(references.len());
        let mut warnings = Vec::new();
        for reference in references {
            let result = self.reconcile(resource_id, reference).await;
            relocated.push(result.reference);
            warnings.extend(result.warning);
        }
        (relocated, warnings)
    }
}

/// Whether a stored reference still points into the staging area.
pub fn is_staged(reference: &str) -> bool {
    matches!(AssetRef::parse(reference), Ok(AssetRef::Staged { .. }))
}
