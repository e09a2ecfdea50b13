//! The explicit fit context.
//!
//! Every engine operation takes a [`FitContext`] by reference — there is no
//! ambient or global state, which keeps queries reentrant and trivially
//! testable. The context owns the environment and fleet arenas plus the
//! location registries, and borrows the static effect catalog. The
//! construction surface below is what the (out-of-scope) fitting manager
//! drives; it maintains tree links but applies no fitting rules.

use std::collections::BTreeMap;

use crate::catalog::EffectOracle;
use crate::config::EngineConfig;
use crate::state::env::{EnvArena, EnvKind, Environment};
use crate::state::fleet::{FleetScope, ScopeArena};
use crate::state::modifier::Modifier;
use crate::state::types::{AttributeId, EnvId, ItemTypeId, Location, OpState, ScopeId};

/// Per-fit resolution context: one character, its ship tree, and its view of
/// the fleet chain.
pub struct FitContext<'a> {
    config: EngineConfig,
    envs: EnvArena,
    scopes: ScopeArena,
    character: EnvId,
    ship: Option<EnvId>,
    modules: BTreeMap<u8, EnvId>,
    charges: BTreeMap<u8, EnvId>,
    implants: BTreeMap<u8, EnvId>,
    skills: BTreeMap<ItemTypeId, EnvId>,
    drones: BTreeMap<ItemTypeId, EnvId>,
    squad: Option<ScopeId>,
    catalog: Option<&'a dyn EffectOracle>,
}

impl<'a> FitContext<'a> {
    /// Fresh context rooted at a character of the given type.
    pub fn new(character_type: ItemTypeId) -> Self {
        let mut envs = EnvArena::new();
        let character = envs.insert(Environment::new(character_type, EnvKind::Character));
        Self {
            config: EngineConfig::default(),
            envs,
            scopes: ScopeArena::new(),
            character,
            ship: None,
            modules: BTreeMap::new(),
            charges: BTreeMap::new(),
            implants: BTreeMap::new(),
            skills: BTreeMap::new(),
            drones: BTreeMap::new(),
            squad: None,
            catalog: None,
        }
    }

    /// Attaches the static effect catalog (builder pattern).
    #[must_use]
    pub fn with_catalog(mut self, catalog: &'a dyn EffectOracle) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The borrowed catalog, if one was attached.
    pub fn catalog(&self) -> Option<&'a dyn EffectOracle> {
        self.catalog
    }

    // ===== environment access =====

    #[inline]
    pub fn character(&self) -> EnvId {
        self.character
    }

    #[inline]
    pub fn ship(&self) -> Option<EnvId> {
        self.ship
    }

    pub fn env(&self, id: EnvId) -> Option<&Environment> {
        self.envs.get(id)
    }

    pub fn env_mut(&mut self, id: EnvId) -> Option<&mut Environment> {
        self.envs.get_mut(id)
    }

    /// Resolves a location to its environment handle.
    pub fn location_env(&self, location: Location) -> Option<EnvId> {
        match location {
            Location::Character => Some(self.character),
            Location::Ship => self.ship,
            Location::Module(slot) => self.modules.get(&slot).copied(),
            Location::Charge(slot) => self.charges.get(&slot).copied(),
            Location::Implant(slot) => self.implants.get(&slot).copied(),
            Location::Skill(type_id) => self.skills.get(&type_id).copied(),
            Location::Drone(type_id) => self.drones.get(&type_id).copied(),
        }
    }

    /// True if the environment currently hosts a loaded charge.
    pub fn has_charge(&self, id: EnvId) -> bool {
        self.envs
            .get(id)
            .is_some_and(|env| {
                env.children().iter().any(|&child| {
                    self.envs
                        .get(child)
                        .is_some_and(|c| c.kind() == EnvKind::Charge)
                })
            })
    }

    // ===== tree construction (fitting-manager surface) =====

    /// Boards a ship, parenting it to the character. Replaces any previous
    /// hull along with everything fitted to it.
    pub fn set_ship(&mut self, type_id: ItemTypeId) -> EnvId {
        if let Some(old) = self.ship.take() {
            self.remove_subtree(old);
            self.modules.clear();
            self.charges.clear();
            self.drones.clear();
        }
        let ship = self.attach_env(Environment::new(type_id, EnvKind::Ship), self.character);
        self.ship = Some(ship);
        ship
    }

    /// Fits a module into a slot. Returns `None` while no ship is boarded
    /// or if the slot is taken.
    pub fn add_module(&mut self, slot: u8, type_id: ItemTypeId) -> Option<EnvId> {
        let ship = self.ship?;
        if self.modules.contains_key(&slot) {
            return None;
        }
        let module = self.attach_env(Environment::new(type_id, EnvKind::Module), ship);
        self.modules.insert(slot, module);
        tracing::trace!(slot, %type_id, %module, "module fitted");
        Some(module)
    }

    /// Loads a charge into the module occupying `slot`.
    pub fn load_charge(&mut self, slot: u8, type_id: ItemTypeId) -> Option<EnvId> {
        let module = self.modules.get(&slot).copied()?;
        if self.charges.contains_key(&slot) {
            return None;
        }
        let charge = self.attach_env(Environment::new(type_id, EnvKind::Charge), module);
        self.charges.insert(slot, charge);
        Some(charge)
    }

    /// Unloads the charge from `slot`; returns whether one was present.
    pub fn unload_charge(&mut self, slot: u8) -> bool {
        let Some(charge) = self.charges.remove(&slot) else {
            return false;
        };
        self.remove_subtree(charge);
        true
    }

    /// Registers a trained skill under the character. One node per skill
    /// type.
    pub fn add_skill(&mut self, type_id: ItemTypeId) -> EnvId {
        if let Some(&existing) = self.skills.get(&type_id) {
            return existing;
        }
        let skill = self.attach_env(Environment::new(type_id, EnvKind::Skill), self.character);
        self.skills.insert(type_id, skill);
        skill
    }

    /// Plugs an implant into an implant slot.
    pub fn add_implant(&mut self, slot: u8, type_id: ItemTypeId) -> Option<EnvId> {
        if self.implants.contains_key(&slot) {
            return None;
        }
        let implant = self.attach_env(Environment::new(type_id, EnvKind::Implant), self.character);
        self.implants.insert(slot, implant);
        Some(implant)
    }

    /// Launches a drone group under the ship.
    pub fn add_drone(&mut self, type_id: ItemTypeId) -> Option<EnvId> {
        let ship = self.ship?;
        if self.drones.contains_key(&type_id) {
            return None;
        }
        let drone = self.attach_env(Environment::new(type_id, EnvKind::Drone), ship);
        self.drones.insert(type_id, drone);
        Some(drone)
    }

    /// Sets the operational state of the entity at a location; false if the
    /// location is unoccupied.
    pub fn set_location_state(&mut self, location: Location, state: OpState) -> bool {
        let Some(id) = self.location_env(location) else {
            return false;
        };
        match self.envs.get_mut(id) {
            Some(env) => {
                env.set_op_state(state);
                true
            }
            None => false,
        }
    }

    /// Writes a base attribute value at a location; false if unoccupied.
    pub fn set_location_attribute(
        &mut self,
        location: Location,
        attr: AttributeId,
        value: f64,
    ) -> bool {
        let Some(id) = self.location_env(location) else {
            return false;
        };
        match self.envs.get_mut(id) {
            Some(env) => {
                env.set_attribute(attr, value);
                true
            }
            None => false,
        }
    }

    /// Anchors a modifier at an environment node; false if the anchor is
    /// gone.
    pub fn add_modifier(&mut self, anchor: EnvId, modifier: Modifier) -> bool {
        match self.envs.get_mut(anchor) {
            Some(env) => {
                env.modifiers_mut().insert(modifier);
                true
            }
            None => false,
        }
    }

    /// Removes a previously anchored modifier; false if absent.
    pub fn remove_modifier(&mut self, anchor: EnvId, modifier: &Modifier) -> bool {
        match self.envs.get_mut(anchor) {
            Some(env) => env.modifiers_mut().remove(modifier),
            None => false,
        }
    }

    // ===== fleet construction =====

    /// Appends a fleet scope; `parent` of `None` makes it the chain root.
    pub fn push_fleet_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.insert(FleetScope::new(parent))
    }

    /// Marks the scope this fit participates in (the start of the fleet
    /// walk), or detaches the fit from fleet boosts with `None`.
    pub fn set_squad(&mut self, squad: Option<ScopeId>) {
        self.squad = squad;
    }

    #[inline]
    pub fn squad(&self) -> Option<ScopeId> {
        self.squad
    }

    pub fn scope(&self, id: ScopeId) -> Option<&FleetScope> {
        self.scopes.get(id)
    }

    pub fn set_booster(&mut self, scope: ScopeId, booster: Option<EnvId>) -> bool {
        match self.scopes.get_mut(scope) {
            Some(s) => {
                s.set_booster(booster);
                true
            }
            None => false,
        }
    }

    pub fn set_commander(&mut self, scope: ScopeId, commander: Option<EnvId>) -> bool {
        match self.scopes.get_mut(scope) {
            Some(s) => {
                s.set_commander(commander);
                true
            }
            None => false,
        }
    }

    /// Registers a gang modifier at a fleet scope.
    pub fn add_gang_modifier(&mut self, scope: ScopeId, modifier: Modifier) -> bool {
        match self.scopes.get_mut(scope) {
            Some(s) => {
                s.gang_mut().insert(modifier);
                true
            }
            None => false,
        }
    }

    /// Inserts a free-standing environment (fleet boosters from other fits
    /// live in the same arena but outside this fit's tree).
    pub fn add_external_env(&mut self, type_id: ItemTypeId, kind: EnvKind) -> EnvId {
        self.envs.insert(Environment::new(type_id, kind))
    }

    // ===== internals =====

    fn attach_env(&mut self, env: Environment, parent: EnvId) -> EnvId {
        let id = self.envs.insert(env);
        if let Some(node) = self.envs.get_mut(id) {
            node.set_parent(Some(parent));
        }
        if let Some(parent_node) = self.envs.get_mut(parent) {
            parent_node.attach_child(id);
        }
        id
    }

    fn remove_subtree(&mut self, root: EnvId) {
        if let Some(parent) = self.envs.get(root).and_then(Environment::parent) {
            if let Some(parent_node) = self.envs.get_mut(parent) {
                parent_node.detach_child(root);
            }
        }
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if let Some(env) = self.envs.remove(id) {
                pending.extend_from_slice(env.children());
            }
        }
    }
}
