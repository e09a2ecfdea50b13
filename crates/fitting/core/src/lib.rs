//! Modifier resolution engine for fitted ship attributes.
//!
//! `fitting-core` computes derived numeric attributes for a composable fit:
//! base values altered by stacked, conditionally active modifiers sourced
//! from fitted modules, charges, skills, implants and fleet boosts. It owns
//! the resolution rules only — the hierarchical environment model, fleet
//! propagation, applicability gating, stacking-penalty and singleton
//! aggregation, and the two-pass affector enumeration — while static game
//! data stays behind the [`catalog::EffectOracle`] seam and all state
//! mutation is driven by an external fitting manager through
//! [`state::FitContext`].
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

pub use catalog::{EffectCategory, EffectDef, EffectOracle, TypeEffect};
pub use config::EngineConfig;
pub use engine::{
    Affector, AffectorFlags, AffectorList, ResolveError, apply_single_modifier, attribute_value,
    enumerate_affectors, has_active_effects, has_overload_effects, is_modifier_applicable,
};
pub use error::{EngineError, ErrorSeverity};
pub use state::{
    Association, AttributeId, EffectId, EnvId, EnvKind, Environment, FitContext, FleetScope,
    ItemTypeId, Location, Modifier, ModifierIndex, ModifierScope, OpState, Operator, ScopeId,
    StateMask,
};
