//! Environment nodes and their arena.
//!
//! An environment is one attribute-carrying entity of a fit: the character at
//! the root, the ship below it, and modules, charges, skills, implants and
//! drones hanging off those. Nodes live in a per-context arena and refer to
//! each other by [`EnvId`] handle only; the context owns all link
//! maintenance.

use std::collections::BTreeMap;

use crate::state::modifier::ModifierIndex;
use crate::state::types::{AttributeId, EnvId, ItemTypeId, OpState};

/// Structural role of an environment within a fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnvKind {
    Character,
    Ship,
    Module,
    Charge,
    Skill,
    Implant,
    Drone,
}

/// One attribute-carrying node of the ownership tree.
///
/// Holds the base attribute store the fitting manager writes, the
/// operational state snapshot the filter gates on, and the ordered index of
/// modifiers anchored at this node.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    type_id: ItemTypeId,
    kind: EnvKind,
    parent: Option<EnvId>,
    children: Vec<EnvId>,
    attributes: BTreeMap<AttributeId, f64>,
    op_state: OpState,
    modifiers: ModifierIndex,
}

impl Environment {
    /// Fresh node with no parent, no modifiers, and an `Online` state.
    ///
    /// Newly fitted entities come up online; driving them offline (or
    /// active, or overloaded) is the state-transition policy of the fitting
    /// manager, which only hands this engine the resulting snapshot.
    pub fn new(type_id: ItemTypeId, kind: EnvKind) -> Self {
        Self {
            type_id,
            kind,
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            op_state: OpState::Online,
            modifiers: ModifierIndex::new(),
        }
    }

    #[inline]
    pub fn type_id(&self) -> ItemTypeId {
        self.type_id
    }

    #[inline]
    pub fn kind(&self) -> EnvKind {
        self.kind
    }

    #[inline]
    pub fn parent(&self) -> Option<EnvId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[EnvId] {
        &self.children
    }

    #[inline]
    pub fn op_state(&self) -> OpState {
        self.op_state
    }

    pub fn set_op_state(&mut self, state: OpState) {
        self.op_state = state;
    }

    /// Base value of an attribute, if one is stored on this node.
    pub fn attribute(&self, attr: AttributeId) -> Option<f64> {
        self.attributes.get(&attr).copied()
    }

    pub fn set_attribute(&mut self, attr: AttributeId, value: f64) {
        self.attributes.insert(attr, value);
    }

    /// Modifiers anchored at this node.
    #[inline]
    pub fn modifiers(&self) -> &ModifierIndex {
        &self.modifiers
    }

    #[inline]
    pub fn modifiers_mut(&mut self) -> &mut ModifierIndex {
        &mut self.modifiers
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EnvId>) {
        self.parent = parent;
    }

    pub(crate) fn attach_child(&mut self, child: EnvId) {
        self.children.push(child);
    }

    pub(crate) fn detach_child(&mut self, child: EnvId) {
        self.children.retain(|&c| c != child);
    }
}

/// Slot arena of environment nodes.
///
/// Handles are indices into the slot vector; removal leaves a tombstone so
/// handed-out ids never shift. The arena stores nodes only — tree links are
/// the context's responsibility.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvArena {
    slots: Vec<Option<Environment>>,
}

impl EnvArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, env: Environment) -> EnvId {
        let id = EnvId(self.slots.len() as u32);
        self.slots.push(Some(env));
        id
    }

    pub fn get(&self, id: EnvId) -> Option<&Environment> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EnvId) -> Option<&mut Environment> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: EnvId) -> Option<Environment> {
        self.slots.get_mut(id.0 as usize).and_then(Option::take)
    }

    /// Live node count (tombstones excluded).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_survive_removal() {
        let mut arena = EnvArena::new();
        let a = arena.insert(Environment::new(ItemTypeId(1), EnvKind::Ship));
        let b = arena.insert(Environment::new(ItemTypeId(2), EnvKind::Module));
        assert_ne!(a, b);

        arena.remove(a);
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).map(Environment::type_id), Some(ItemTypeId(2)));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn new_nodes_start_online_with_no_attributes() {
        let env = Environment::new(ItemTypeId(7), EnvKind::Skill);
        assert_eq!(env.op_state(), OpState::Online);
        assert_eq!(env.attribute(AttributeId(4)), None);
        assert!(env.modifiers().is_empty());
    }
}
