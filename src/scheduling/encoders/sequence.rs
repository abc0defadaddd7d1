// Bounds on the length of maximal runs of a shift.
//
// Every constraint here is built on a *bounded span*: the clause
// `[works[start-1]] ∨ ¬works[start..start+length] ∨ [works[start+length]]`,
// which is false exactly when a maximal run of `length` days starts at
// `start`. Asserting the clause forbids that run; adding a fresh literal to
// it turns the literal into an indicator charged in the objective.

use crate::domain::{Literal, VarId};

use crate::scheduling::context::ModelContext;
use crate::scheduling::error::{Result, ScheduleError};
use crate::scheduling::penalty::PenaltyTerm;
use crate::scheduling::rules::BoundedRunRule;

/// Start positions of every span of `length` inside a sequence of `len`: `0..=len-length`
pub fn span_starts(len: usize, length: usize) -> std::ops::Range<usize> {
    0..(len + 1).saturating_sub(length)
}

/// Clause matching a run of `length` true values starting at `start`.
///
/// The left border is `works[start - 1]` (or the start of `works`). When
/// `right` is set, `works[start + length]` (or the end of `works`) must also
/// be false for the clause to fail.
pub fn negated_bounded_span(
    works: &[VarId],
    start: usize,
    length: usize,
    right: bool,
) -> Vec<Literal> {
    let mut span = Vec::with_capacity(length + 2);
    if start > 0 {
        span.push(works[start - 1].lit());
    }
    span.extend(works[start..start + length].iter().map(|v| v.not()));
    if right && start + length < works.len() {
        span.push(works[start + length].lit());
    }
    span
}

/// `min_cost * (soft_min - length)`, or a configuration error when it does not fit an `i64`
fn shortfall_cost(rule: &BoundedRunRule, length: usize) -> Result<i64> {
    i64::try_from(rule.soft_min - length)
        .ok()
        .and_then(|shortfall| rule.min_cost.checked_mul(shortfall))
        .ok_or_else(|| {
            ScheduleError::config(
                rule.label(),
                "min_cost",
                format!(
                    "({}) times the shortfall below soft_min ({}) overflows",
                    rule.min_cost, rule.soft_min
                ),
            )
        })
}

/// Constrains every maximal run of true values in `works`.
///
/// Runs shorter than `hard_min` or longer than `hard_max` are forbidden. A run
/// of length `l < soft_min` costs `min_cost * (soft_min - l)`; a run longer
/// than `soft_max` costs `max_cost` once per length in `soft_max+1..=min(l, hard_max)`.
pub fn add_sequence_constraint(
    ctx: &mut ModelContext,
    works: &[VarId],
    rule: &BoundedRunRule,
    basename: &str,
) -> Result<Vec<PenaltyTerm>> {
    rule.validate()?;
    let n = works.len();
    let mut penalties = Vec::new();

    // Lengths above `n` have no start position, so every loop stops at `n`.
    // Forbid sequences that are too short.
    for length in 1..rule.hard_min.min(n + 1) {
        for start in span_starts(n, length) {
            ctx.add_bool_or(
                &negated_bounded_span(works, start, length, true),
                format!("{}: short_span(start={}, length={})", basename, start, length),
            );
        }
    }

    if rule.min_cost > 0 {
        for length in rule.hard_min.max(1)..rule.soft_min.min(n + 1) {
            let cost = shortfall_cost(rule, length)?;
            for start in span_starts(n, length) {
                let name = format!("{}: under_span(start={}, length={})", basename, start, length);
                let mut span = negated_bounded_span(works, start, length, true);
                let lit = ctx.new_bool(name.clone());
                span.push(lit.lit());
                ctx.add_bool_or(&span, name);
                penalties.push(PenaltyTerm::bool(lit, cost));
            }
        }
    }

    if rule.max_cost > 0 {
        for length in rule.soft_max.saturating_add(1)..=rule.hard_max.min(n) {
            for start in span_starts(n, length) {
                let name = format!("{}: over_span(start={}, length={})", basename, start, length);
                let mut span = negated_bounded_span(works, start, length, false);
                let lit = ctx.new_bool(name.clone());
                span.push(lit.lit());
                ctx.add_bool_or(&span, name);
                penalties.push(PenaltyTerm::bool(lit, rule.max_cost));
            }
        }
    }

    // No window of hard_max + 1 days may be all true.
    if rule.hard_max < n {
        let too_long = rule.hard_max + 1;
        for start in span_starts(n, too_long) {
            let window: Vec<Literal> =
                works[start..start + too_long].iter().map(|v| v.not()).collect();
            ctx.add_bool_or(&window, format!("{}: long_span(start={})", basename, start));
        }
    }

    tracing::trace!(
        event = "sequence_encoded",
        rule = %basename,
        days = n,
        penalties = penalties.len(),
    );
    Ok(penalties)
}
