//! The applicability filter.
//!
//! Single seam for all "is this boost real right now" logic. The predicate
//! is pure and side-effect free, so the two enumeration passes (and the
//! aggregator) can re-consult it and observe identical answers as long as
//! the context is not mutated in between.

use crate::config::EngineConfig;
use crate::engine::errors::ResolveError;
use crate::state::context::FitContext;
use crate::state::modifier::{Modifier, ModifierScope};
use crate::state::types::EnvId;

/// Decides whether `modifier` currently affects `target`.
///
/// Gates, in order: the source environment must exist; its operational
/// state must reach the producing effect's category requirement; a
/// charge-dependent effect needs a loaded charge; and the modifier's scope
/// must select the target.
pub fn is_modifier_applicable(
    ctx: &FitContext<'_>,
    target: EnvId,
    modifier: &Modifier,
) -> Result<bool, ResolveError> {
    if ctx.env(target).is_none() {
        return Err(ResolveError::EnvNotFound(target));
    }
    let source = ctx
        .env(modifier.source)
        .ok_or(ResolveError::EnvNotFound(modifier.source))?;

    if source.op_state() < modifier.category.required_state() {
        return Ok(false);
    }

    if modifier.requires_charge && !ctx.has_charge(modifier.source) {
        return Ok(false);
    }

    match modifier.scope {
        ModifierScope::Item => Ok(target == modifier.source),
        ModifierScope::Fit => Ok(root_of(ctx, target)? == root_of(ctx, modifier.source)?),
        // Gang modifiers are only ever reached through an intact fleet
        // chain; the chain walk itself is the target selection.
        ModifierScope::Gang => Ok(true),
    }
}

/// Root of the ownership tree containing `id`.
///
/// Bounded by [`EngineConfig::MAX_TREE_DEPTH`]: a longer chain means a
/// corrupted (cyclic or over-deep) tree and is reported instead of walked
/// forever.
pub(crate) fn root_of(ctx: &FitContext<'_>, id: EnvId) -> Result<EnvId, ResolveError> {
    let mut current = id;
    for _ in 0..=EngineConfig::MAX_TREE_DEPTH {
        match ctx
            .env(current)
            .ok_or(ResolveError::EnvNotFound(current))?
            .parent()
        {
            Some(parent) => current = parent,
            None => return Ok(current),
        }
    }
    Err(ResolveError::TreeDepthExceeded(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EffectCategory;
    use crate::state::types::{AttributeId, ItemTypeId, Location, OpState};

    const VELOCITY: AttributeId = AttributeId(37);
    const BOOST: AttributeId = AttributeId(68);

    fn fitted_context() -> (FitContext<'static>, EnvId, EnvId) {
        let mut ctx = FitContext::new(ItemTypeId(1));
        let ship = ctx.set_ship(ItemTypeId(2));
        let module = ctx.add_module(0, ItemTypeId(3)).unwrap();
        (ctx, ship, module)
    }

    #[test]
    fn state_gate_follows_effect_category() {
        let (mut ctx, ship, module) = fitted_context();
        let m = Modifier::new(module, BOOST, VELOCITY, crate::state::Association::PostPercent)
            .with_category(EffectCategory::Active);

        ctx.set_location_state(Location::Module(0), OpState::Online);
        assert_eq!(is_modifier_applicable(&ctx, ship, &m), Ok(false));

        ctx.set_location_state(Location::Module(0), OpState::Active);
        assert_eq!(is_modifier_applicable(&ctx, ship, &m), Ok(true));

        ctx.set_location_state(Location::Module(0), OpState::Overloaded);
        assert_eq!(is_modifier_applicable(&ctx, ship, &m), Ok(true));
    }

    #[test]
    fn item_scope_selects_only_the_source() {
        let (ctx, ship, module) = fitted_context();
        let m = Modifier::new(module, BOOST, VELOCITY, crate::state::Association::PostMul)
            .with_scope(ModifierScope::Item);

        assert_eq!(is_modifier_applicable(&ctx, module, &m), Ok(true));
        assert_eq!(is_modifier_applicable(&ctx, ship, &m), Ok(false));
    }

    #[test]
    fn fit_scope_requires_a_shared_root() {
        let (mut ctx, ship, _module) = fitted_context();
        let outsider = ctx.add_external_env(ItemTypeId(9), crate::state::EnvKind::Module);
        let m = Modifier::new(outsider, BOOST, VELOCITY, crate::state::Association::PostMul);

        assert_eq!(is_modifier_applicable(&ctx, ship, &m), Ok(false));
    }

    #[test]
    fn charge_requirement_gates_until_loaded() {
        let (mut ctx, ship, module) = fitted_context();
        let m = Modifier::new(module, BOOST, VELOCITY, crate::state::Association::PostPercent)
            .requiring_charge();

        assert_eq!(is_modifier_applicable(&ctx, ship, &m), Ok(false));
        ctx.load_charge(0, ItemTypeId(4));
        assert_eq!(is_modifier_applicable(&ctx, ship, &m), Ok(true));
    }

    #[test]
    fn dangling_source_is_an_error_not_a_no() {
        let (ctx, ship, _module) = fitted_context();
        let m = Modifier::new(EnvId(99), BOOST, VELOCITY, crate::state::Association::PostMul);
        assert_eq!(
            is_modifier_applicable(&ctx, ship, &m),
            Err(ResolveError::EnvNotFound(EnvId(99)))
        );
    }
}
