//! Canned fit content for tests and examples.
//!
//! A small but complete slice of game data: a shield cruiser with fitted
//! modules, a trained skill, and the effect catalog rows backing them.
//! Integration tests build on these instead of re-declaring ids in every
//! file.

use fitting_core::{
    Association, AttributeId, EffectCategory, EffectDef, EnvId, FitContext, ItemTypeId, Location,
    Modifier,
};

use crate::catalog::StaticCatalog;

/// Attribute ids used by the demo content.
pub mod attr {
    use fitting_core::AttributeId;

    pub const SHIELD_CAPACITY: AttributeId = AttributeId(263);
    pub const MAX_VELOCITY: AttributeId = AttributeId(37);
    /// Magnitude attribute modules and skills carry their bonus in.
    pub const BONUS_AMOUNT: AttributeId = AttributeId(64);
}

/// Item type ids used by the demo content.
pub mod types {
    use fitting_core::ItemTypeId;

    pub const PILOT: ItemTypeId = ItemTypeId(1373);
    pub const CRUISER: ItemTypeId = ItemTypeId(620);
    pub const SHIELD_EXTENDER: ItemTypeId = ItemTypeId(380);
    pub const AFTERBURNER: ItemTypeId = ItemTypeId(12056);
    pub const SHIELD_SKILL: ItemTypeId = ItemTypeId(3416);
}

/// Effect ids used by the demo content.
pub mod effects {
    use fitting_core::EffectId;

    pub const SHIELD_EXTENSION: EffectId = EffectId(11);
    pub const AFTERBURNER_BOOST: EffectId = EffectId(12);
    pub const AFTERBURNER_OVERTHRUST: EffectId = EffectId(13);
    pub const SHIELD_THEORY: EffectId = EffectId(14);
}

/// Catalog rows for the demo types.
///
/// The shield extender is purely passive, the afterburner has an active
/// boost and an overload variant, the skill is passive.
pub fn demo_catalog() -> StaticCatalog {
    let mut catalog = StaticCatalog::new();
    catalog.insert_effect(EffectDef::new(effects::SHIELD_EXTENSION, EffectCategory::Passive));
    catalog.insert_effect(EffectDef::new(effects::AFTERBURNER_BOOST, EffectCategory::Active));
    catalog.insert_effect(EffectDef::new(
        effects::AFTERBURNER_OVERTHRUST,
        EffectCategory::Overload,
    ));
    catalog.insert_effect(EffectDef::new(effects::SHIELD_THEORY, EffectCategory::Passive));

    catalog.grant_effect(types::SHIELD_EXTENDER, effects::SHIELD_EXTENSION);
    catalog.grant_effect(types::AFTERBURNER, effects::AFTERBURNER_BOOST);
    catalog.grant_effect(types::AFTERBURNER, effects::AFTERBURNER_OVERTHRUST);
    catalog.grant_effect(types::SHIELD_SKILL, effects::SHIELD_THEORY);
    catalog
}

/// A fitted shield cruiser:
///
/// - hull base shield 5500, base velocity 220;
/// - shield extenders in slots 0 and 1, adding 250 and 400 shield (flat,
///   non-penalized);
/// - an afterburner in slot 2 whose +50% velocity boost is gated on the
///   `Active` state (fitted online, not yet activated);
/// - the shield theory skill granting +25% shield capacity.
///
/// Returns the context and the ship handle.
pub fn shield_cruiser(catalog: &StaticCatalog) -> (FitContext<'_>, EnvId) {
    let mut ctx = FitContext::new(types::PILOT).with_catalog(catalog);
    let ship = ctx.set_ship(types::CRUISER);
    ctx.set_location_attribute(Location::Ship, attr::SHIELD_CAPACITY, 5500.0);
    ctx.set_location_attribute(Location::Ship, attr::MAX_VELOCITY, 220.0);

    for (slot, bonus) in [(0u8, 250.0), (1u8, 400.0)] {
        let module = ctx.add_module(slot, types::SHIELD_EXTENDER).unwrap();
        ctx.set_location_attribute(Location::Module(slot), attr::BONUS_AMOUNT, bonus);
        ctx.add_modifier(
            ship,
            Modifier::new(module, attr::BONUS_AMOUNT, attr::SHIELD_CAPACITY, Association::ModAdd),
        );
    }

    let afterburner = ctx.add_module(2, types::AFTERBURNER).unwrap();
    ctx.set_location_attribute(Location::Module(2), attr::BONUS_AMOUNT, 50.0);
    ctx.add_modifier(
        ship,
        Modifier::new(
            afterburner,
            attr::BONUS_AMOUNT,
            attr::MAX_VELOCITY,
            Association::PostPercent,
        )
        .with_category(EffectCategory::Active),
    );

    let skill = ctx.add_skill(types::SHIELD_SKILL);
    ctx.set_location_attribute(Location::Skill(types::SHIELD_SKILL), attr::BONUS_AMOUNT, 25.0);
    ctx.add_modifier(
        ship,
        Modifier::new(
            skill,
            attr::BONUS_AMOUNT,
            attr::SHIELD_CAPACITY,
            Association::PostPercent,
        ),
    );

    (ctx, ship)
}

/// Ids for ad-hoc test content that is not part of the demo fit.
pub fn scratch_type(offset: u32) -> ItemTypeId {
    ItemTypeId(9000 + offset)
}

pub fn scratch_attr(offset: u16) -> AttributeId {
    AttributeId(900 + offset)
}
