//! Fleet boost scopes.
//!
//! A fleet is a separate chain of scopes (squad → wing → fleet) layered on
//! top of the per-fit environment tree. Each scope may hold a booster (the
//! member whose command modules originate the boosts) and a commander (whose
//! presence authorizes them); gang modifiers registered at a scope reach fit
//! targets only while both are present, and propagation stops cold at the
//! first scope missing either.

use crate::state::modifier::ModifierIndex;
use crate::state::types::{EnvId, ScopeId};

/// One level of the fleet chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FleetScope {
    booster: Option<EnvId>,
    commander: Option<EnvId>,
    parent: Option<ScopeId>,
    gang: ModifierIndex,
}

impl FleetScope {
    pub fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            ..Self::default()
        }
    }

    #[inline]
    pub fn booster(&self) -> Option<EnvId> {
        self.booster
    }

    #[inline]
    pub fn commander(&self) -> Option<EnvId> {
        self.commander
    }

    #[inline]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Both seats filled — gang modifiers at this scope are live and the
    /// walk may continue past it.
    #[inline]
    pub fn is_boosted(&self) -> bool {
        self.booster.is_some() && self.commander.is_some()
    }

    pub fn set_booster(&mut self, booster: Option<EnvId>) {
        self.booster = booster;
    }

    pub fn set_commander(&mut self, commander: Option<EnvId>) {
        self.commander = commander;
    }

    /// Gang modifiers registered at this scope.
    #[inline]
    pub fn gang(&self) -> &ModifierIndex {
        &self.gang
    }

    #[inline]
    pub fn gang_mut(&mut self) -> &mut ModifierIndex {
        &mut self.gang
    }
}

/// Slot arena of fleet scopes, handle-addressed like the environment arena.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeArena {
    slots: Vec<Option<FleetScope>>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scope: FleetScope) -> ScopeId {
        let id = ScopeId(self.slots.len() as u32);
        self.slots.push(Some(scope));
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&FleetScope> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut FleetScope> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: ScopeId) -> Option<FleetScope> {
        self.slots.get_mut(id.0 as usize).and_then(Option::take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boosted_requires_both_seats() {
        let mut scope = FleetScope::new(None);
        assert!(!scope.is_boosted());

        scope.set_booster(Some(EnvId(1)));
        assert!(!scope.is_boosted());

        scope.set_commander(Some(EnvId(2)));
        assert!(scope.is_boosted());

        scope.set_booster(None);
        assert!(!scope.is_boosted());
    }
}
