//! Modifiers and the ordered per-environment modifier index.
//!
//! A modifier is a single directed numeric effect: it reads a magnitude from
//! its source environment and alters one destination attribute wherever the
//! applicability filter lets it land. Modifiers are owned by the index of the
//! environment they are *anchored* at — a ship-wide boost from a module
//! anchors at the ship, a self-boost at the module itself — and lookups find
//! them by walking the target's ancestor chain through the anchor.

use std::collections::BTreeMap;

use crate::catalog::EffectCategory;
use crate::state::types::{AttributeId, EnvId};

/// Operation + timing class of a modifier.
///
/// The discriminant doubles as the application order: when an attribute is
/// aggregated, classes are applied in ascending ordinal. Assignments bracket
/// the scaling and shifting classes on both sides.
#[derive(
    Clone,
    Copy,
    Debug,
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
#[repr(u8)]
pub enum Association {
    /// Override the base value before anything else applies.
    PreAssign = 0,
    PreMul = 1,
    PreDiv = 2,
    /// Flat addition.
    ModAdd = 3,
    /// Flat subtraction.
    ModSub = 4,
    PostMul = 5,
    PostDiv = 6,
    /// Percentage bonus, `value` expressed in percent (20 → ×1.2).
    PostPercent = 7,
    /// Override the final value after everything else applied.
    PostAssign = 8,
}

impl Association {
    /// All classes in application order.
    pub const ALL: [Association; 9] = [
        Association::PreAssign,
        Association::PreMul,
        Association::PreDiv,
        Association::ModAdd,
        Association::ModSub,
        Association::PostMul,
        Association::PostDiv,
        Association::PostPercent,
        Association::PostAssign,
    ];

    /// Raw ordinal, also the application order of the class.
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Operator tag this class reduces to in output records.
    pub const fn operator(self) -> Operator {
        match self {
            Association::PreAssign | Association::PostAssign => Operator::Assign,
            Association::PreMul
            | Association::PreDiv
            | Association::PostMul
            | Association::PostDiv
            | Association::PostPercent => Operator::Mul,
            Association::ModAdd => Operator::Add,
            Association::ModSub => Operator::Sub,
        }
    }

    /// True for the override classes.
    #[inline]
    pub const fn is_assignment(self) -> bool {
        matches!(self, Association::PreAssign | Association::PostAssign)
    }
}

/// Reduced operator tag carried by output records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Operator {
    Assign,
    Add,
    Sub,
    Mul,
}

impl Operator {
    /// Single-character rendering: `=`, `+`, `-` or `*`.
    pub const fn as_char(self) -> char {
        match self {
            Operator::Assign => '=',
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
        }
    }

    /// Neutral starting value for evaluating one modifier in isolation.
    ///
    /// Applying a modifier to its operator's identity yields the modifier's
    /// individual contribution (the factor for `*`, the addend for `+`/`-`,
    /// the assigned value for `=`).
    pub const fn identity(self) -> f64 {
        match self {
            Operator::Mul => 1.0,
            Operator::Assign | Operator::Add | Operator::Sub => 0.0,
        }
    }
}

/// Which targets a modifier may reach once its gate is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierScope {
    /// Only the source environment itself (e.g. an overload bonus to the
    /// overloaded module).
    Item,
    /// Anything sharing a root environment with the source (ship-wide
    /// boosts from modules, skills, implants).
    Fit,
    /// Delivered through the fleet chain; never found by the tree walk.
    Gang,
}

/// A single directed effect from a source environment onto a destination
/// attribute.
///
/// Exists only while the producing effect is active; the fitting manager
/// inserts it on activation and removes it on deactivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    /// Environment the boost originates from.
    pub source: EnvId,
    /// Attribute on the source environment the magnitude is read from.
    pub source_attr: AttributeId,
    /// Attribute being altered on applicable targets.
    pub dest_attr: AttributeId,
    pub assoc: Association,
    pub scope: ModifierScope,
    /// Gating category of the producing effect.
    pub category: EffectCategory,
    /// The producing effect needs a loaded charge in the source module.
    pub requires_charge: bool,
    /// Subject to the diminishing-returns stacking penalty.
    pub penalized: bool,
    /// Only the strongest modifier of its singleton group contributes.
    pub singleton: bool,
}

impl Modifier {
    /// A fit-scoped, passive, unflagged modifier; refine with the builder
    /// methods below.
    pub fn new(
        source: EnvId,
        source_attr: AttributeId,
        dest_attr: AttributeId,
        assoc: Association,
    ) -> Self {
        Self {
            source,
            source_attr,
            dest_attr,
            assoc,
            scope: ModifierScope::Fit,
            category: EffectCategory::Passive,
            requires_charge: false,
            penalized: false,
            singleton: false,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: ModifierScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: EffectCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn requiring_charge(mut self) -> Self {
        self.requires_charge = true;
        self
    }

    #[must_use]
    pub fn penalized(mut self) -> Self {
        self.penalized = true;
        self
    }

    #[must_use]
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }
}

/// Ordered, sparse index of the modifiers anchored at one node.
///
/// Two-level ordered map: destination attribute → association class →
/// insertion-ordered modifiers. Iteration visits attribute keys in ascending
/// numeric order, association keys in ascending ordinal, and modifiers in
/// insertion order, which is what makes repeated queries on an unchanged
/// index reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierIndex {
    by_attribute: BTreeMap<AttributeId, BTreeMap<Association, Vec<Modifier>>>,
}

impl ModifierIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a modifier under its destination attribute and class.
    pub fn insert(&mut self, modifier: Modifier) {
        self.by_attribute
            .entry(modifier.dest_attr)
            .or_default()
            .entry(modifier.assoc)
            .or_default()
            .push(modifier);
    }

    /// Removes the first modifier equal to `modifier`; returns whether one
    /// was present. Empty sub-maps are pruned so iteration never visits
    /// hollow keys.
    pub fn remove(&mut self, modifier: &Modifier) -> bool {
        let Some(by_assoc) = self.by_attribute.get_mut(&modifier.dest_attr) else {
            return false;
        };
        let Some(slot) = by_assoc.get_mut(&modifier.assoc) else {
            return false;
        };
        let Some(position) = slot.iter().position(|m| m == modifier) else {
            return false;
        };
        slot.remove(position);
        if slot.is_empty() {
            by_assoc.remove(&modifier.assoc);
        }
        if by_assoc.is_empty() {
            self.by_attribute.remove(&modifier.dest_attr);
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.by_attribute.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_attribute
            .values()
            .flat_map(|by_assoc| by_assoc.values())
            .map(Vec::len)
            .sum()
    }

    /// All modifiers, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.by_attribute
            .values()
            .flat_map(|by_assoc| by_assoc.values())
            .flat_map(|slot| slot.iter())
    }

    /// Modifiers targeting one attribute, in class-then-insertion order.
    pub fn for_attribute(&self, attr: AttributeId) -> impl Iterator<Item = &Modifier> {
        self.by_attribute
            .get(&attr)
            .into_iter()
            .flat_map(|by_assoc| by_assoc.values())
            .flat_map(|slot| slot.iter())
    }
}
