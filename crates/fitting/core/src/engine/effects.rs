//! Coarse effect-state existence queries.
//!
//! "Could this location ever produce an Active-or-higher effect?" — a
//! short-circuiting scan of the type's effect catalog against a precomputed
//! state mask. Pure existence check: no allocation, no match collection.

use crate::engine::errors::ResolveError;
use crate::state::context::FitContext;
use crate::state::types::{Location, StateMask};

/// True if the location's type carries at least one effect gated on the
/// `Active` state or higher.
pub fn has_active_effects(
    ctx: &FitContext<'_>,
    location: Location,
) -> Result<bool, ResolveError> {
    effect_state_query(ctx, location, StateMask::ACTIVE_OR_HIGHER)
}

/// True if the location's type carries at least one effect gated on the
/// `Overloaded` state or higher.
pub fn has_overload_effects(
    ctx: &FitContext<'_>,
    location: Location,
) -> Result<bool, ResolveError> {
    effect_state_query(ctx, location, StateMask::OVERLOAD_OR_HIGHER)
}

fn effect_state_query(
    ctx: &FitContext<'_>,
    location: Location,
    mask: StateMask,
) -> Result<bool, ResolveError> {
    let target = ctx
        .location_env(location)
        .ok_or(ResolveError::LocationNotFound(location))?;
    let env = ctx.env(target).ok_or(ResolveError::EnvNotFound(target))?;
    let catalog = ctx.catalog().ok_or(ResolveError::CatalogNotAvailable)?;

    for type_effect in catalog.type_effects(env.type_id()) {
        let effect = catalog
            .effect(type_effect.effect)
            .ok_or(ResolveError::EffectNotFound(type_effect.effect))?;
        if mask.contains(effect.category.required_state().as_mask()) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::catalog::{EffectCategory, EffectDef, EffectOracle, TypeEffect};
    use crate::state::types::{EffectId, ItemTypeId};

    /// Minimal in-memory oracle for these tests; content crates carry the
    /// real implementation.
    #[derive(Default)]
    struct TestCatalog {
        effects: BTreeMap<EffectId, EffectDef>,
        type_effects: BTreeMap<ItemTypeId, Vec<TypeEffect>>,
    }

    impl TestCatalog {
        fn define(&mut self, type_id: ItemTypeId, effect: EffectId, category: EffectCategory) {
            self.effects.insert(effect, EffectDef::new(effect, category));
            let rows = self.type_effects.entry(type_id).or_default();
            rows.push(TypeEffect::new(effect));
            rows.sort_by_key(|row| row.effect);
        }
    }

    impl EffectOracle for TestCatalog {
        fn effect(&self, id: EffectId) -> Option<EffectDef> {
            self.effects.get(&id).copied()
        }

        fn type_effects(&self, type_id: ItemTypeId) -> &[TypeEffect] {
            self.type_effects
                .get(&type_id)
                .map(Vec::as_slice)
                .unwrap_or(&[])
        }
    }

    const GUN: ItemTypeId = ItemTypeId(500);
    const PLATE: ItemTypeId = ItemTypeId(501);

    fn module_context(
        catalog: &TestCatalog,
        type_id: ItemTypeId,
    ) -> FitContext<'_> {
        let mut ctx = FitContext::new(ItemTypeId(1)).with_catalog(catalog);
        ctx.set_ship(ItemTypeId(2));
        ctx.add_module(0, type_id).unwrap();
        ctx
    }

    #[test]
    fn active_gated_effect_is_found() {
        let mut catalog = TestCatalog::default();
        catalog.define(GUN, EffectId(10), EffectCategory::Passive);
        catalog.define(GUN, EffectId(11), EffectCategory::Target);

        let ctx = module_context(&catalog, GUN);
        assert_eq!(has_active_effects(&ctx, Location::Module(0)), Ok(true));
        assert_eq!(has_overload_effects(&ctx, Location::Module(0)), Ok(false));
    }

    #[test]
    fn passive_only_type_has_neither() {
        let mut catalog = TestCatalog::default();
        catalog.define(PLATE, EffectId(20), EffectCategory::Passive);
        catalog.define(PLATE, EffectId(21), EffectCategory::Online);

        let ctx = module_context(&catalog, PLATE);
        assert_eq!(has_active_effects(&ctx, Location::Module(0)), Ok(false));
        assert_eq!(has_overload_effects(&ctx, Location::Module(0)), Ok(false));
    }

    #[test]
    fn overload_gated_effect_satisfies_both_queries() {
        let mut catalog = TestCatalog::default();
        catalog.define(GUN, EffectId(30), EffectCategory::Overload);

        let ctx = module_context(&catalog, GUN);
        assert_eq!(has_active_effects(&ctx, Location::Module(0)), Ok(true));
        assert_eq!(has_overload_effects(&ctx, Location::Module(0)), Ok(true));
    }

    #[test]
    fn type_without_catalog_rows_has_no_effects() {
        let catalog = TestCatalog::default();
        let ctx = module_context(&catalog, GUN);
        assert_eq!(has_active_effects(&ctx, Location::Module(0)), Ok(false));
    }

    #[test]
    fn missing_catalog_is_fatal_not_false() {
        let mut ctx = FitContext::new(ItemTypeId(1));
        ctx.set_ship(ItemTypeId(2));
        assert_eq!(
            has_active_effects(&ctx, Location::Ship),
            Err(ResolveError::CatalogNotAvailable)
        );
    }

    #[test]
    fn dangling_effect_row_is_reported() {
        let mut catalog = TestCatalog::default();
        catalog.define(GUN, EffectId(10), EffectCategory::Active);
        catalog.effects.clear();

        let ctx = module_context(&catalog, GUN);
        assert_eq!(
            has_active_effects(&ctx, Location::Module(0)),
            Err(ResolveError::EffectNotFound(EffectId(10)))
        );
    }
}
