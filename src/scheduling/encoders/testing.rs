// Helpers for checking encoders by evaluation rather than by solving.

use crate::domain::{OptimizationProblem, VarId, FEASIBILITY_TOLERANCE};
use crate::scheduling::context::ModelContext;
use crate::scheduling::penalty::{PenaltyKind, PenaltyTerm};

pub fn fresh_bools(ctx: &mut ModelContext, n: usize) -> Vec<VarId> {
    (0..n).map(|i| ctx.new_bool(format!("w{}", i))).collect()
}

/// Fixes `works` to `pattern` and raises each penalty literal only where its
/// clause would otherwise fail, which is the cheapest completion.
///
/// Returns the total penalty, or None when a hard constraint is violated.
pub fn settle(
    problem: &OptimizationProblem,
    works: &[VarId],
    pattern: &[bool],
    penalties: &[PenaltyTerm],
) -> Option<i64> {
    let mut values = vec![0.0; problem.num_variables()];
    for (var, &worked) in works.iter().zip(pattern) {
        values[var.index()] = if worked { 1.0 } else { 0.0 };
    }

    for term in penalties {
        assert_eq!(term.kind, PenaltyKind::Bool, "settle only handles literals");
        let needed = problem
            .constraints
            .iter()
            .filter(|c| c.terms.iter().any(|&(v, _)| v == term.var))
            .any(|c| c.violation(&values) > FEASIBILITY_TOLERANCE);
        if needed {
            values[term.var.index()] = 1.0;
        }
    }

    if problem.max_violation(&values) > FEASIBILITY_TOLERANCE {
        return None;
    }
    Some(
        penalties
            .iter()
            .map(|t| t.weight * values[t.var.index()] as i64)
            .sum(),
    )
}
