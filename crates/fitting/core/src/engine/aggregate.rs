//! Numeric composition of applicable modifiers.
//!
//! Classes apply in association-ordinal order: pre-assignment, then the
//! scaling and shifting classes, then post-assignment. Within a class,
//! non-penalized modifiers land at full weight in insertion order;
//! penalized modifiers are ranked strongest-first per sign and scaled by
//! the diminishing stacking curve; singleton groups collapse to their
//! single strongest member.

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::engine::errors::ResolveError;
use crate::engine::walk;
use crate::state::context::FitContext;
use crate::state::modifier::{Association, Modifier, Operator};
use crate::state::types::{AttributeId, Location};

/// Computes one modifier's numeric effect on `base`.
///
/// The magnitude is the source environment's stored value for the
/// modifier's source attribute (the configured default when unset); the
/// association decides how it combines with `base`. Division by a zero
/// magnitude follows IEEE-754, as the reference engine's arithmetic does.
pub fn apply_single_modifier(
    ctx: &FitContext<'_>,
    modifier: &Modifier,
    base: f64,
) -> Result<f64, ResolveError> {
    let v = magnitude(ctx, modifier)?;
    Ok(match modifier.assoc {
        Association::PreAssign | Association::PostAssign => v,
        Association::PreMul | Association::PostMul => base * v,
        Association::PreDiv | Association::PostDiv => base / v,
        Association::PostPercent => base * (1.0 + v / 100.0),
        Association::ModAdd => base + v,
        Association::ModSub => base - v,
    })
}

/// Effective value of `attr` at `location`: the stored base value combined
/// with every applicable modifier from the ancestor and fleet chains.
pub fn attribute_value(
    ctx: &FitContext<'_>,
    location: Location,
    attr: AttributeId,
) -> Result<f64, ResolveError> {
    let target = ctx
        .location_env(location)
        .ok_or(ResolveError::LocationNotFound(location))?;

    let mut buckets: BTreeMap<Association, Vec<Modifier>> = BTreeMap::new();
    walk::for_each_applicable(ctx, target, Some(attr), |m| {
        buckets.entry(m.assoc).or_default().push(*m);
        Ok(())
    })?;

    let base = ctx
        .env(target)
        .ok_or(ResolveError::EnvNotFound(target))?
        .attribute(attr)
        .unwrap_or(ctx.config().default_attribute_value);

    let mut value = base;
    for (assoc, modifiers) in &buckets {
        value = apply_class(ctx, *assoc, modifiers, value)?;
    }

    tracing::trace!(%location, %attr, base, value, "attribute aggregated");
    Ok(value)
}

/// A modifier's contribution relative to its operator's identity: the
/// deviation of the factor from 1 for `*`-class modifiers, the signed
/// addend for `+`/`-`.
fn contribution(ctx: &FitContext<'_>, modifier: &Modifier) -> Result<f64, ResolveError> {
    let operator = modifier.assoc.operator();
    let applied = apply_single_modifier(ctx, modifier, operator.identity())?;
    Ok(match operator {
        Operator::Mul => applied - 1.0,
        _ => applied,
    })
}

fn magnitude(ctx: &FitContext<'_>, modifier: &Modifier) -> Result<f64, ResolveError> {
    let source = ctx
        .env(modifier.source)
        .ok_or(ResolveError::EnvNotFound(modifier.source))?;
    Ok(source
        .attribute(modifier.source_attr)
        .unwrap_or(ctx.config().default_attribute_value))
}

/// Applies one association class to the running value.
fn apply_class(
    ctx: &FitContext<'_>,
    assoc: Association,
    modifiers: &[Modifier],
    mut value: f64,
) -> Result<f64, ResolveError> {
    // Assignments override outright; with several in a class, the last one
    // in walk order stands. Ranking has no meaning for overrides, so the
    // penalty and singleton machinery does not see them.
    if assoc.is_assignment() {
        for modifier in modifiers {
            value = magnitude(ctx, modifier)?;
        }
        return Ok(value);
    }

    let multiplicative = assoc.operator() == Operator::Mul;
    let mut entries = Vec::with_capacity(modifiers.len());
    for modifier in modifiers {
        entries.push((contribution(ctx, modifier)?, modifier));
    }

    let keep = singleton_survivors(&entries);

    // Full-weight pass: non-penalized contributions in insertion order.
    for (index, (c, modifier)) in entries.iter().enumerate() {
        if !keep[index] || modifier.penalized {
            continue;
        }
        value = combine(value, *c, multiplicative);
    }

    // Penalized pass: per sign, strongest first, scaled by rank.
    for positive in [true, false] {
        let mut group: Vec<f64> = entries
            .iter()
            .enumerate()
            .filter(|(index, (c, m))| keep[*index] && m.penalized && (*c >= 0.0) == positive)
            .map(|(_, (c, _))| *c)
            .collect();
        group.sort_by(|a, b| b.abs().total_cmp(&a.abs()));
        for (rank, c) in group.into_iter().enumerate() {
            value = combine(value, c * EngineConfig::stacking_weight(rank), multiplicative);
        }
    }

    Ok(value)
}

#[inline]
fn combine(value: f64, contribution: f64, multiplicative: bool) -> f64 {
    if multiplicative {
        value * (1.0 + contribution)
    } else {
        value + contribution
    }
}

/// Marks which entries survive singleton reduction: per sign group, the
/// strongest singleton-flagged contribution stays (first wins ties), the
/// rest are discarded entirely. Non-singleton entries always survive.
fn singleton_survivors(entries: &[(f64, &Modifier)]) -> Vec<bool> {
    let mut keep = vec![true; entries.len()];
    for positive in [true, false] {
        let mut best: Option<(usize, f64)> = None;
        for (index, (c, modifier)) in entries.iter().enumerate() {
            if !modifier.singleton || (*c >= 0.0) != positive {
                continue;
            }
            if best.is_none_or(|(_, magnitude)| c.abs() > magnitude) {
                best = Some((index, c.abs()));
            }
        }
        for (index, (c, modifier)) in entries.iter().enumerate() {
            if modifier.singleton
                && (*c >= 0.0) == positive
                && best.map(|(winner, _)| winner) != Some(index)
            {
                keep[index] = false;
            }
        }
    }
    keep
}
