//! In-memory static catalog.
//!
//! Reference implementation of the engine's [`EffectOracle`] seam: plain
//! ordered maps populated by hand or by the TOML loader. Runtime services
//! with their own data pipeline implement the trait against their storage
//! instead.

use std::collections::BTreeMap;

use fitting_core::{EffectDef, EffectId, EffectOracle, ItemTypeId, TypeEffect};

/// Effect and type-effect tables held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    effects: BTreeMap<EffectId, EffectDef>,
    type_effects: BTreeMap<ItemTypeId, Vec<TypeEffect>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an effect definition, replacing any previous row with the
    /// same id.
    pub fn insert_effect(&mut self, def: EffectDef) {
        self.effects.insert(def.id, def);
    }

    /// Associates an effect with a type. Rows are kept sorted ascending by
    /// effect id, as the oracle contract requires; duplicates collapse.
    pub fn grant_effect(&mut self, type_id: ItemTypeId, effect: EffectId) {
        let rows = self.type_effects.entry(type_id).or_default();
        if let Err(position) = rows.binary_search_by_key(&effect, |row| row.effect) {
            rows.insert(position, TypeEffect::new(effect));
        }
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn type_count(&self) -> usize {
        self.type_effects.len()
    }
}

impl EffectOracle for StaticCatalog {
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

#[cfg(test)]
mod tests {
    use super::*;
    use fitting_core::EffectCategory;

    #[test]
    fn type_effect_rows_stay_sorted_and_unique() {
        let mut catalog = StaticCatalog::new();
        let hull = ItemTypeId(590);
        catalog.grant_effect(hull, EffectId(30));
        catalog.grant_effect(hull, EffectId(10));
        catalog.grant_effect(hull, EffectId(20));
        catalog.grant_effect(hull, EffectId(10));

        let ids: Vec<u32> = catalog
            .type_effects(hull)
            .iter()
            .map(|row| row.effect.0)
            .collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn unknown_type_yields_no_rows() {
        let catalog = StaticCatalog::new();
        assert!(catalog.type_effects(ItemTypeId(9)).is_empty());
    }

    #[test]
    fn effect_rows_replace_by_id() {
        let mut catalog = StaticCatalog::new();
        catalog.insert_effect(EffectDef::new(EffectId(1), EffectCategory::Passive));
        catalog.insert_effect(EffectDef::new(EffectId(1), EffectCategory::Overload));
        assert_eq!(
            catalog.effect(EffectId(1)).map(|def| def.category),
            Some(EffectCategory::Overload)
        );
    }
}
