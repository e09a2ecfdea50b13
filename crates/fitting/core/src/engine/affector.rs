//! Affector enumeration: the two-pass introspection query.
//!
//! Answers "what currently affects this location" with one record per
//! applicable modifier, each carrying its individually computed
//! contribution. The protocol is count-then-fill over the shared walk: the
//! first pass tallies applicable candidates, the buffer is reserved to
//! exactly that tally, and a second identical walk populates it. Both
//! passes consult the same filter on the same unmutated context, so the
//! counts must agree; a mismatch means the caller mutated mid-query.

use std::ops::Deref;

use bitflags::bitflags;

use crate::engine::aggregate::apply_single_modifier;
use crate::engine::errors::ResolveError;
use crate::engine::walk;
use crate::state::context::FitContext;
use crate::state::modifier::{Modifier, Operator};
use crate::state::types::{AttributeId, ItemTypeId, Location};

bitflags! {
    /// Flag bits carried by an [`Affector`] record.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AffectorFlags: u8 {
        /// Contribution is subject to the stacking penalty.
        const PENALIZED = 1 << 0;
        /// Contribution only counts if it is its singleton group's
        /// strongest.
        const SINGLETON = 1 << 1;
    }
}

/// One applicable modifier, individually evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affector {
    /// Type of the environment the boost originates from.
    pub source_type: ItemTypeId,
    /// Attribute being affected.
    pub dest_attr: AttributeId,
    /// Raw association ordinal; doubles as the application order of the
    /// record's class.
    pub order: u8,
    /// Individual contribution: the factor for `*`, the addend for `+`/`-`,
    /// the assigned value for `=`.
    pub value: f64,
    pub operator: Operator,
    pub flags: AffectorFlags,
}

/// Exact-sized list of affector records.
///
/// The caller owns the list and releases it exactly once — by calling
/// [`AffectorList::release`] or by letting it drop. Releasing twice is not
/// expressible: `release` consumes the list by move.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AffectorList {
    records: Vec<Affector>,
}

impl AffectorList {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Affector> {
        self.records.iter()
    }

    /// Explicitly releases the list.
    pub fn release(self) {}
}

impl Deref for AffectorList {
    type Target = [Affector];

    fn deref(&self) -> &[Affector] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a AffectorList {
    type Item = &'a Affector;
    type IntoIter = std::slice::Iter<'a, Affector>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Enumerates every modifier currently affecting `location`.
///
/// Records appear in walk order: ancestor chain before fleet chain,
/// ascending destination attribute then association ordinal then insertion
/// order within each node. No applicable modifiers is an empty list, not an
/// error.
pub fn enumerate_affectors(
    ctx: &FitContext<'_>,
    location: Location,
) -> Result<AffectorList, ResolveError> {
    let target = ctx
        .location_env(location)
        .ok_or(ResolveError::LocationNotFound(location))?;

    // Pass 1: count applicable candidates.
    let mut counted = 0usize;
    walk::for_each_applicable(ctx, target, None, |_| {
        counted += 1;
        Ok(())
    })?;

    // Reserve exactly; a failed reservation is an error, not an abort.
    let mut records: Vec<Affector> = Vec::new();
    records
        .try_reserve_exact(counted)
        .map_err(|_| ResolveError::AllocationFailure { requested: counted })?;

    // Pass 2: identical walk, now building records.
    walk::for_each_applicable(ctx, target, None, |modifier| {
        records.push(build_record(ctx, modifier)?);
        Ok(())
    })?;

    if records.len() != counted {
        return Err(ResolveError::InconsistentCount {
            counted,
            filled: records.len(),
        });
    }

    tracing::debug!(%location, affectors = counted, "affector enumeration complete");
    Ok(AffectorList { records })
}

fn build_record(ctx: &FitContext<'_>, modifier: &Modifier) -> Result<Affector, ResolveError> {
    let source = ctx
        .env(modifier.source)
        .ok_or(ResolveError::EnvNotFound(modifier.source))?;
    let operator = modifier.assoc.operator();
    let value = apply_single_modifier(ctx, modifier, operator.identity())?;

    let mut flags = AffectorFlags::empty();
    if modifier.penalized {
        flags |= AffectorFlags::PENALIZED;
    }
    if modifier.singleton {
        flags |= AffectorFlags::SINGLETON;
    }

    Ok(Affector {
        source_type: source.type_id(),
        dest_attr: modifier.dest_attr,
        order: modifier.assoc.ordinal(),
        value,
        operator,
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::modifier::Association;
    use crate::state::types::ItemTypeId;

    const SHIELD: AttributeId = AttributeId(263);
    const AGILITY: AttributeId = AttributeId(70);
    const SOURCE_ATTR: AttributeId = AttributeId(64);

    fn boosted_ship() -> FitContext<'static> {
        let mut ctx = FitContext::new(ItemTypeId(1));
        let ship = ctx.set_ship(ItemTypeId(2));
        for (slot, value) in [(0u8, 3.0), (1u8, 5.0)] {
            let module = ctx.add_module(slot, ItemTypeId(100 + slot as u32)).unwrap();
            ctx.env_mut(module).unwrap().set_attribute(SOURCE_ATTR, value);
            ctx.add_modifier(
                ship,
                Modifier::new(module, SOURCE_ATTR, SHIELD, Association::ModAdd),
            );
        }
        ctx
    }

    #[test]
    fn records_carry_individual_contributions() {
        let ctx = boosted_ship();
        let list = enumerate_affectors(&ctx, Location::Ship).unwrap();

        assert_eq!(list.len(), 2);
        for affector in &list {
            assert_eq!(affector.operator, Operator::Add);
            assert_eq!(affector.operator.as_char(), '+');
            assert_eq!(affector.dest_attr, SHIELD);
        }
        let values: Vec<f64> = list.iter().map(|a| a.value).collect();
        assert_eq!(values, vec![3.0, 5.0]);
        list.release();
    }

    #[test]
    fn no_applicable_modifiers_is_an_empty_list() {
        let mut ctx = FitContext::new(ItemTypeId(1));
        ctx.set_ship(ItemTypeId(2));
        let list = enumerate_affectors(&ctx, Location::Ship).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn consecutive_enumerations_are_identical() {
        let ctx = boosted_ship();
        let first = enumerate_affectors(&ctx, Location::Ship).unwrap();
        let second = enumerate_affectors(&ctx, Location::Ship).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn records_sort_by_attribute_then_class_then_insertion() {
        let mut ctx = boosted_ship();
        let ship = ctx.ship().unwrap();
        let module = ctx.location_env(Location::Module(0)).unwrap();
        // Higher-ordinal class on a lower attribute id, inserted last.
        ctx.add_modifier(
            ship,
            Modifier::new(module, SOURCE_ATTR, AGILITY, Association::PostMul),
        );
        ctx.add_modifier(
            ship,
            Modifier::new(module, SOURCE_ATTR, SHIELD, Association::PreMul),
        );

        let list = enumerate_affectors(&ctx, Location::Ship).unwrap();
        let keys: Vec<(u16, u8)> = list.iter().map(|a| (a.dest_attr.0, a.order)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn order_field_is_the_raw_association_ordinal() {
        let mut ctx = FitContext::new(ItemTypeId(1));
        let ship = ctx.set_ship(ItemTypeId(2));
        for assoc in Association::ALL {
            ctx.add_modifier(ship, Modifier::new(ship, SOURCE_ATTR, SHIELD, assoc));
        }
        let list = enumerate_affectors(&ctx, Location::Ship).unwrap();
        let orders: Vec<u8> = list.iter().map(|a| a.order).collect();
        assert_eq!(orders, (0..=8).collect::<Vec<u8>>());
    }

    #[test]
    fn flags_reflect_the_modifier_bits() {
        let mut ctx = FitContext::new(ItemTypeId(1));
        let ship = ctx.set_ship(ItemTypeId(2));
        ctx.add_modifier(
            ship,
            Modifier::new(ship, SOURCE_ATTR, SHIELD, Association::PostPercent)
                .penalized()
                .singleton(),
        );
        let list = enumerate_affectors(&ctx, Location::Ship).unwrap();
        assert_eq!(
            list[0].flags,
            AffectorFlags::PENALIZED | AffectorFlags::SINGLETON
        );
    }

    #[test]
    fn unknown_location_is_not_found() {
        let ctx = FitContext::new(ItemTypeId(1));
        assert_eq!(
            enumerate_affectors(&ctx, Location::Module(4)),
            Err(ResolveError::LocationNotFound(Location::Module(4)))
        );
    }
}
