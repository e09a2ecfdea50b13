//! The shared candidate traversal.
//!
//! Every consumer — count pass, fill pass, aggregator — walks candidates
//! through this one routine, which is what guarantees the two-pass protocol
//! sees the identical sequence both times: ancestor chain first (target up
//! to the root), then the fleet chain (squad toward the fleet root, stopping
//! at the first scope without both booster and commander). Within each node
//! the modifier index supplies its own ascending order, and the filter is
//! consulted before a candidate is handed to the visitor.

use crate::config::EngineConfig;
use crate::engine::errors::ResolveError;
use crate::engine::filter::is_modifier_applicable;
use crate::state::context::FitContext;
use crate::state::modifier::{Modifier, ModifierIndex};
use crate::state::types::{AttributeId, EnvId};

/// Visits every applicable modifier for `target`, in deterministic walk
/// order. `attr` narrows the walk to one destination attribute; `None`
/// visits everything.
pub(crate) fn for_each_applicable<F>(
    ctx: &FitContext<'_>,
    target: EnvId,
    attr: Option<AttributeId>,
    mut visit: F,
) -> Result<(), ResolveError>
where
    F: FnMut(&Modifier) -> Result<(), ResolveError>,
{
    let mut depth = 0usize;
    let mut cursor = Some(target);
    while let Some(id) = cursor {
        if depth > EngineConfig::MAX_TREE_DEPTH {
            return Err(ResolveError::TreeDepthExceeded(target));
        }
        let env = ctx.env(id).ok_or(ResolveError::EnvNotFound(id))?;
        visit_index(ctx, target, env.modifiers(), attr, &mut visit)?;
        cursor = env.parent();
        depth += 1;
    }

    let mut depth = 0usize;
    let mut cursor = ctx.squad();
    while let Some(id) = cursor {
        if depth > EngineConfig::MAX_FLEET_DEPTH {
            return Err(ResolveError::FleetDepthExceeded(id));
        }
        let scope = ctx.scope(id).ok_or(ResolveError::ScopeNotFound(id))?;
        if !scope.is_boosted() {
            break;
        }
        visit_index(ctx, target, scope.gang(), attr, &mut visit)?;
        cursor = scope.parent();
        depth += 1;
    }

    Ok(())
}

fn visit_index<F>(
    ctx: &FitContext<'_>,
    target: EnvId,
    index: &ModifierIndex,
    attr: Option<AttributeId>,
    visit: &mut F,
) -> Result<(), ResolveError>
where
    F: FnMut(&Modifier) -> Result<(), ResolveError>,
{
    match attr {
        Some(attr) => {
            for modifier in index.for_attribute(attr) {
                if is_modifier_applicable(ctx, target, modifier)? {
                    visit(modifier)?;
                }
            }
        }
        None => {
            for modifier in index.iter() {
                if is_modifier_applicable(ctx, target, modifier)? {
                    visit(modifier)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::env::EnvKind;
    use crate::state::modifier::{Association, ModifierScope};
    use crate::state::types::{ItemTypeId, ScopeId};

    const SHIELD: AttributeId = AttributeId(263);
    const COMMAND_BONUS: AttributeId = AttributeId(80);

    /// Ship plus a three-scope chain (squad → wing → fleet), one gang
    /// modifier per scope, all seats filled.
    fn fleet_context() -> (FitContext<'static>, [ScopeId; 3]) {
        let mut ctx = FitContext::new(ItemTypeId(1));
        let ship = ctx.set_ship(ItemTypeId(2));
        let module = ctx.add_module(0, ItemTypeId(3)).unwrap();
        ctx.add_modifier(
            ship,
            Modifier::new(module, COMMAND_BONUS, SHIELD, Association::ModAdd),
        );

        let fleet = ctx.push_fleet_scope(None);
        let wing = ctx.push_fleet_scope(Some(fleet));
        let squad = ctx.push_fleet_scope(Some(wing));
        ctx.set_squad(Some(squad));

        for scope in [squad, wing, fleet] {
            let booster = ctx.add_external_env(ItemTypeId(900), EnvKind::Character);
            let commander = ctx.add_external_env(ItemTypeId(901), EnvKind::Character);
            ctx.set_booster(scope, Some(booster));
            ctx.set_commander(scope, Some(commander));
            ctx.add_gang_modifier(
                scope,
                Modifier::new(booster, COMMAND_BONUS, SHIELD, Association::PostPercent)
                    .with_scope(ModifierScope::Gang),
            );
        }

        (ctx, [squad, wing, fleet])
    }

    fn collect_sources(ctx: &FitContext<'_>, target: EnvId) -> Vec<EnvId> {
        let mut sources = Vec::new();
        for_each_applicable(ctx, target, None, |m| {
            sources.push(m.source);
            Ok(())
        })
        .unwrap();
        sources
    }

    #[test]
    fn intact_chain_contributes_every_scope() {
        let (ctx, _) = fleet_context();
        let ship = ctx.ship().unwrap();
        // 1 tree modifier + 3 gang modifiers.
        assert_eq!(collect_sources(&ctx, ship).len(), 4);
    }

    #[test]
    fn tree_candidates_come_before_fleet_candidates() {
        let (ctx, _) = fleet_context();
        let ship = ctx.ship().unwrap();
        let module = ctx.location_env(crate::state::Location::Module(0)).unwrap();
        assert_eq!(collect_sources(&ctx, ship)[0], module);
    }

    #[test]
    fn chain_stops_at_the_first_unseated_scope() {
        let (mut ctx, [_, wing, _]) = fleet_context();
        ctx.set_commander(wing, None);
        let ship = ctx.ship().unwrap();
        // Tree modifier + squad gang only; wing and fleet are cut off.
        assert_eq!(collect_sources(&ctx, ship).len(), 2);
    }

    #[test]
    fn unseated_squad_cuts_off_the_whole_chain() {
        let (mut ctx, [squad, _, _]) = fleet_context();
        ctx.set_booster(squad, None);
        let ship = ctx.ship().unwrap();
        assert_eq!(collect_sources(&ctx, ship).len(), 1);
    }

    #[test]
    fn no_squad_means_no_fleet_walk() {
        let (mut ctx, _) = fleet_context();
        ctx.set_squad(None);
        let ship = ctx.ship().unwrap();
        assert_eq!(collect_sources(&ctx, ship).len(), 1);
    }
}
