//! Fit state: environments, modifiers, fleet scopes, and the context that
//! owns them.
//!
//! The engine in [`crate::engine`] only reads this state; all mutation goes
//! through the [`FitContext`] construction surface driven by the external
//! fitting manager.
pub mod context;
pub mod env;
pub mod fleet;
pub mod modifier;
pub mod types;

pub use context::FitContext;
pub use env::{EnvArena, EnvKind, Environment};
pub use fleet::{FleetScope, ScopeArena};
pub use modifier::{Association, Modifier, ModifierIndex, ModifierScope, Operator};
pub use types::{
    AttributeId, EffectId, EnvId, ItemTypeId, Location, OpState, ScopeId, StateMask,
};
