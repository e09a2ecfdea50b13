//! Read-only seam to the static effect catalog.
//!
//! The engine never owns effect or type tables; it asks an [`EffectOracle`]
//! for them. Concrete storage (in-memory tables, loaders, caches) lives in
//! content crates so the engine stays decoupled from data management.

use crate::state::types::{EffectId, ItemTypeId, OpState};

/// Gating category of an effect.
///
/// The category decides the minimum operational state the source must reach
/// for the effect — and every modifier it produces — to be in force.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectCategory {
    /// Always-on while the source is powered.
    #[default]
    Passive,
    /// Granted by merely being online.
    Online,
    /// Requires an actively cycling source.
    Active,
    /// Requires an active cycle locked onto a target.
    Target,
    /// Area-of-effect variant of an active effect.
    Area,
    /// Only in force while overheating.
    Overload,
}

impl EffectCategory {
    /// Minimum [`OpState`] of the source for this category to be in force.
    pub const fn required_state(self) -> OpState {
        match self {
            EffectCategory::Passive | EffectCategory::Online => OpState::Online,
            EffectCategory::Active | EffectCategory::Target | EffectCategory::Area => {
                OpState::Active
            }
            EffectCategory::Overload => OpState::Overloaded,
        }
    }
}

/// One effect row of the static catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDef {
    pub id: EffectId,
    pub category: EffectCategory,
}

impl EffectDef {
    pub const fn new(id: EffectId, category: EffectCategory) -> Self {
        Self { id, category }
    }
}

/// Association of an item type with one of its effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeEffect {
    pub effect: EffectId,
}

impl TypeEffect {
    pub const fn new(effect: EffectId) -> Self {
        Self { effect }
    }
}

/// Oracle over the static effect catalog.
///
/// Implementations must return `type_effects` rows sorted ascending by
/// effect id; the existence queries rely on that order for deterministic
/// short-circuiting.
pub trait EffectOracle: Send + Sync {
    /// Definition of one effect, if the catalog knows it.
    fn effect(&self, id: EffectId) -> Option<EffectDef>;

    /// Effects carried by a type, ascending by effect id. A type the catalog
    /// has no rows for yields the empty slice.
    fn type_effects(&self, type_id: ItemTypeId) -> &[TypeEffect];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_map_to_required_states() {
        assert_eq!(EffectCategory::Passive.required_state(), OpState::Online);
        assert_eq!(EffectCategory::Online.required_state(), OpState::Online);
        assert_eq!(EffectCategory::Active.required_state(), OpState::Active);
        assert_eq!(EffectCategory::Target.required_state(), OpState::Active);
        assert_eq!(EffectCategory::Area.required_state(), OpState::Active);
        assert_eq!(
            EffectCategory::Overload.required_state(),
            OpState::Overloaded
        );
    }
}
