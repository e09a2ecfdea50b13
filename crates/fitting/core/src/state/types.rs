use core::fmt;

use bitflags::bitflags;

/// Identifier of an item type in the static type catalog (ship hull, module,
/// charge, skill, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTypeId(pub u32);

impl fmt::Display for ItemTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{}", self.0)
    }
}

/// Identifier of a numeric attribute (shield capacity, cpu output, ...).
///
/// Modifier indexes and output records are keyed by this id; iteration over
/// indexed attributes is always in ascending id order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeId(pub u16);

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attr:{}", self.0)
    }
}

/// Identifier of an effect in the static effect catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u32);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect:{}", self.0)
    }
}

/// Arena handle of an environment node.
///
/// Handles are plain indices into the context's environment arena; parent
/// links between environments are stored as handles, never as owning
/// references, which keeps the ownership tree acyclic by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvId(pub u32);

impl fmt::Display for EnvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "env#{}", self.0)
    }
}

/// Arena handle of a fleet scope node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeId(pub u32);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Addressable attribute carriers of a fit.
///
/// A location names a slot in the fit rather than an arena handle, so callers
/// can query "module in slot 2" without tracking engine internals. The
/// context resolves a location to its environment; an unoccupied location is
/// a `LocationNotFound` error, not a panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    /// The pilot character at the root of the fit.
    Character,
    /// The ship hull.
    Ship,
    /// Fitted module, by slot index.
    Module(u8),
    /// Charge loaded into the module in the given slot.
    Charge(u8),
    /// Implant, by implant slot index.
    Implant(u8),
    /// Trained skill, by skill type.
    Skill(ItemTypeId),
    /// Drone group, by drone type.
    Drone(ItemTypeId),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Character => write!(f, "character"),
            Location::Ship => write!(f, "ship"),
            Location::Module(slot) => write!(f, "module[{slot}]"),
            Location::Charge(slot) => write!(f, "charge[{slot}]"),
            Location::Implant(slot) => write!(f, "implant[{slot}]"),
            Location::Skill(type_id) => write!(f, "skill[{type_id}]"),
            Location::Drone(type_id) => write!(f, "drone[{type_id}]"),
        }
    }
}

/// Operational state of an environment, ordered from least to most engaged.
///
/// The ordering is load-bearing: an effect gated on a category is in force
/// whenever the source's state is at or above the category's required state.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OpState {
    /// Fitted but powered down.
    #[default]
    Offline,
    /// Powered and passively running.
    Online,
    /// Actively cycling.
    Active,
    /// Overheated operation.
    Overloaded,
}

impl OpState {
    /// The bit this state occupies in a [`StateMask`].
    #[inline]
    pub const fn as_mask(self) -> StateMask {
        StateMask::from_bits_retain(1 << self as u8)
    }
}

bitflags! {
    /// Set of operational states, one bit per [`OpState`].
    ///
    /// The `*_OR_HIGHER` constants are derived by masking the lower states
    /// out of the full set, mirroring how the reference engine builds its
    /// category gates.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StateMask: u8 {
        const OFFLINE    = 1 << 0;
        const ONLINE     = 1 << 1;
        const ACTIVE     = 1 << 2;
        const OVERLOADED = 1 << 3;
    }
}

impl StateMask {
    /// States from `Active` upward: the full set minus `Offline` and `Online`.
    pub const ACTIVE_OR_HIGHER: StateMask =
        StateMask::all().difference(StateMask::OFFLINE.union(StateMask::ONLINE));

    /// States from `Overloaded` upward: additionally masks `Active` out.
    pub const OVERLOAD_OR_HIGHER: StateMask = StateMask::ACTIVE_OR_HIGHER
        .difference(StateMask::ACTIVE);
}
