/// Engine configuration constants and tunable parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Value a modifier magnitude falls back to when its source attribute
    /// has no stored base value.
    pub default_attribute_value: f64,
}

impl EngineConfig {
    // ===== structural traversal bounds =====
    /// Maximum ancestor-chain length before the tree is considered
    /// corrupted (character → ship → module → charge is depth 4; the bound
    /// leaves headroom for nested carriers).
    pub const MAX_TREE_DEPTH: usize = 8;
    /// Maximum fleet-chain length before the chain is considered corrupted
    /// (squad → wing → fleet is depth 3).
    pub const MAX_FLEET_DEPTH: usize = 8;

    // ===== aggregation domain constants =====
    /// Denominator of the stacking-penalty curve `exp(-n² / D)`, sourced
    /// from the reference golden data (≈ 2.67²; yields weights 1, 0.8691,
    /// 0.5706, 0.2830, 0.1060, ...).
    pub const STACKING_PENALTY_DENOMINATOR: f64 = 7.1289;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ATTRIBUTE_VALUE: f64 = 0.0;

    pub fn new() -> Self {
        Self {
            default_attribute_value: Self::DEFAULT_ATTRIBUTE_VALUE,
        }
    }

    /// Rank-`n` stacking weight (zero-based rank within a penalized group).
    pub fn stacking_weight(rank: usize) -> f64 {
        let n = rank as f64;
        (-(n * n) / Self::STACKING_PENALTY_DENOMINATOR).exp()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
