// Forbidden or penalized shift changes between consecutive days.

use crate::domain::VarId;

use crate::scheduling::context::{AssignmentGrid, ModelContext};
use crate::scheduling::error::Result;
use crate::scheduling::penalty::PenaltyTerm;
use crate::scheduling::rules::TransitionRule;

/// `¬previous ∨ ¬next`, asserted outright for a forbidden rule, otherwise
/// relaxed by a literal that is charged the rule's cost
pub fn add_transition_clause(
    ctx: &mut ModelContext,
    previous: VarId,
    next: VarId,
    rule: &TransitionRule,
    name: String,
) -> Option<PenaltyTerm> {
    let mut transition = vec![previous.not(), next.not()];
    if rule.is_forbidden() {
        ctx.add_bool_or(&transition, name);
        return None;
    }
    let lit = ctx.new_bool(name.clone());
    transition.push(lit.lit());
    ctx.add_bool_or(&transition, name);
    Some(PenaltyTerm::bool(lit, rule.cost))
}

/// Applies `rule` to every employee and every pair of consecutive days
pub fn add_transition_constraints(
    ctx: &mut ModelContext,
    grid: &AssignmentGrid,
    rule: &TransitionRule,
) -> Result<Vec<PenaltyTerm>> {
    rule.validate(grid.num_shifts())?;
    let mut penalties = Vec::new();

    for e in 0..grid.num_employees() {
        let before = grid.days_of(e, rule.previous);
        let after = grid.days_of(e, rule.next);
        for (d, (&previous, &next)) in before.iter().zip(after.iter().skip(1)).enumerate() {
            let name = format!(
                "transition(employee={}, day={}, {} -> {})",
                e, d, rule.previous, rule.next
            );
            penalties.extend(add_transition_clause(ctx, previous, next, rule, name));
        }
    }

    Ok(penalties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::encoders::testing::settle;

    fn grid(ctx: &mut ModelContext) -> AssignmentGrid {
        AssignmentGrid::allocate(ctx, 2, 4, 5)
    }

    #[test]
    fn test_forbidden_transition_is_hard() {
        let mut ctx = ModelContext::new("t");
        let grid = grid(&mut ctx);
        let night_to_morning = TransitionRule {
            previous: 3,
            next: 1,
            cost: 0,
        };
        let penalties = add_transition_constraints(&mut ctx, &grid, &night_to_morning).unwrap();
        assert!(penalties.is_empty());
        // Two employees, four day pairs each.
        assert_eq!(ctx.num_constraints(), 8);

        let works = [grid.get(1, 3, 2), grid.get(1, 1, 3)];
        assert_eq!(settle(ctx.problem(), &works, &[true, true], &penalties), None);
        assert_eq!(settle(ctx.problem(), &works, &[true, false], &penalties), Some(0));
        // Morning before night is fine.
        let works = [grid.get(1, 1, 2), grid.get(1, 3, 3)];
        assert_eq!(settle(ctx.problem(), &works, &[true, true], &penalties), Some(0));
    }

    #[test]
    fn test_penalized_transition_charges_once() {
        let mut ctx = ModelContext::new("t");
        let grid = grid(&mut ctx);
        let afternoon_to_night = TransitionRule {
            previous: 2,
            next: 3,
            cost: 4,
        };
        let penalties = add_transition_constraints(&mut ctx, &grid, &afternoon_to_night).unwrap();
        assert_eq!(penalties.len(), 8);
        assert!(penalties.iter().all(|p| p.weight == 4));

        let works = [
            grid.get(0, 2, 0),
            grid.get(0, 3, 1),
            grid.get(0, 2, 3),
            grid.get(0, 3, 4),
        ];
        let problem = ctx.problem();
        assert_eq!(settle(problem, &works, &[true, true, false, false], &penalties), Some(4));
        assert_eq!(settle(problem, &works, &[true, true, true, true], &penalties), Some(8));
        assert_eq!(settle(problem, &works, &[false, true, true, false], &penalties), Some(0));
    }

    #[test]
    fn test_unknown_shift_is_an_index_error() {
        let mut ctx = ModelContext::new("t");
        let grid = grid(&mut ctx);
        let rule = TransitionRule {
            previous: 4,
            next: 1,
            cost: 0,
        };
        assert!(add_transition_constraints(&mut ctx, &grid, &rule).is_err());
    }
}
