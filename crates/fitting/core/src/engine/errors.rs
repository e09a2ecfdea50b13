//! Operation-surface errors.

use crate::error::{EngineError, ErrorSeverity};
use crate::state::types::{EffectId, EnvId, Location, ScopeId};

/// Errors surfaced by the resolution queries.
///
/// The first failing sub-step aborts the whole operation; no partial output
/// is ever returned alongside an error, and none of these improve on retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolveError {
    /// The queried location is not occupied in this context.
    #[error("location {0} not found in context")]
    LocationNotFound(Location),

    /// An environment handle points at a removed or foreign node.
    #[error("environment {0} not found in context")]
    EnvNotFound(EnvId),

    /// A type's effect row names an effect the catalog has no definition
    /// for.
    #[error("effect {0} not found in catalog")]
    EffectNotFound(EffectId),

    /// The query needs the effect catalog but none is attached.
    #[error("effect catalog not available")]
    CatalogNotAvailable,

    /// Reserving the output buffer failed.
    #[error("failed to allocate affector buffer for {requested} records")]
    AllocationFailure { requested: usize },

    /// The fill pass produced a different number of records than the count
    /// pass — the context was mutated mid-query.
    #[error("affector count mismatch: counted {counted}, filled {filled}")]
    InconsistentCount { counted: usize, filled: usize },

    /// Ancestor chain longer than any well-formed tree allows.
    #[error("ancestor chain through {0} exceeds the tree depth bound")]
    TreeDepthExceeded(EnvId),

    /// Fleet chain longer than any well-formed fleet allows.
    #[error("fleet chain through {0} exceeds the fleet depth bound")]
    FleetDepthExceeded(ScopeId),

    /// A fleet scope handle points at a removed scope.
    #[error("fleet scope {0} not found in context")]
    ScopeNotFound(ScopeId),
}

impl EngineError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        use ResolveError::*;
        match self {
            // Caller-input errors: reject without retry.
            LocationNotFound(_) | EffectNotFound(_) => ErrorSeverity::Validation,

            // Dangling handles and over-deep chains mean the hierarchy was
            // corrupted by mis-sequenced mutation.
            EnvNotFound(_) | ScopeNotFound(_) | TreeDepthExceeded(_) | FleetDepthExceeded(_) => {
                ErrorSeverity::Internal
            }

            // Missing collaborator or a violated mid-query invariant.
            CatalogNotAvailable | AllocationFailure { .. } | InconsistentCount { .. } => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use ResolveError::*;
        match self {
            LocationNotFound(_) => "RESOLVE_LOCATION_NOT_FOUND",
            EnvNotFound(_) => "RESOLVE_ENV_NOT_FOUND",
            EffectNotFound(_) => "RESOLVE_EFFECT_NOT_FOUND",
            CatalogNotAvailable => "RESOLVE_CATALOG_NOT_AVAILABLE",
            AllocationFailure { .. } => "RESOLVE_ALLOCATION_FAILURE",
            InconsistentCount { .. } => "RESOLVE_INCONSISTENT_COUNT",
            TreeDepthExceeded(_) => "RESOLVE_TREE_DEPTH_EXCEEDED",
            FleetDepthExceeded(_) => "RESOLVE_FLEET_DEPTH_EXCEEDED",
            ScopeNotFound(_) => "RESOLVE_SCOPE_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert_eq!(
            ResolveError::LocationNotFound(Location::Ship).severity(),
            ErrorSeverity::Validation
        );
        assert_eq!(
            ResolveError::InconsistentCount {
                counted: 3,
                filled: 2
            }
            .severity(),
            ErrorSeverity::Fatal
        );
        assert!(ResolveError::TreeDepthExceeded(EnvId(0))
            .severity()
            .is_internal());
    }
}
