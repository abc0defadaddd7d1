use std::collections::BTreeMap;

use crate::domain::{ObjectiveFunction, VarId};

/// Whether a penalty column is a 0/1 literal or a bounded integer amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyKind {
    Bool,
    Int,
}

/// A column and its signed objective weight.
///
/// Negative weights reward a fulfilled preference, positive weights charge a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyTerm {
    pub var: VarId,
    pub weight: i64,
    pub kind: PenaltyKind,
}

impl PenaltyTerm {
    pub fn bool(var: VarId, weight: i64) -> Self {
        Self {
            var,
            weight,
            kind: PenaltyKind::Bool,
        }
    }

    pub fn int(var: VarId, weight: i64) -> Self {
        Self {
            var,
            weight,
            kind: PenaltyKind::Int,
        }
    }
}

/// Folds every penalty term into one objective to minimize.
///
/// Terms on the same column are summed in `i128`; weights are used as given.
pub fn aggregate_objective(terms: &[PenaltyTerm]) -> ObjectiveFunction {
    let mut by_column: BTreeMap<VarId, i128> = BTreeMap::new();
    for term in terms {
        *by_column.entry(term.var).or_insert(0) += i128::from(term.weight);
    }

    let terms = by_column
        .into_iter()
        .filter(|&(_, weight)| weight != 0)
        .map(|(var, weight)| (var, weight as f64))
        .collect();

    ObjectiveFunction::minimize(terms)
}
