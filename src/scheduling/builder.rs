// Model builder: allocates the assignment grid, applies fixed assignments and
// requests, and drives every encoder over its slice of the grid.

use tracing::{debug, info};

use crate::domain::{ConstraintType, SolverConfig};

use super::context::{AssignmentGrid, ModelContext, ShiftModel};
use super::encoders::{
    add_coverage_constraints, add_sequence_constraint, add_transition_constraints,
    add_window_sum_constraint,
};
use super::error::{check_index, Result, ScheduleError};
use super::penalty::PenaltyTerm;
use super::problem::{ShiftProblem, DAYS_PER_WEEK};

impl ShiftProblem {
    /// Assembles the model with the default solver configuration
    pub fn build_model(&self) -> Result<ShiftModel> {
        build_model(self, SolverConfig::default())
    }
}

/// Assembles `problem` into an immutable model.
///
/// The output depends only on `problem` and `config`; two calls build equal models.
pub fn build_model(problem: &ShiftProblem, config: SolverConfig) -> Result<ShiftModel> {
    problem.validate()?;

    let num_employees = problem.num_employees;
    let num_shifts = problem.num_shifts();
    let num_days = problem.num_days();

    let mut ctx = ModelContext::new(problem.name.clone()).with_description(format!(
        "{} employees, {} days, {} shifts",
        num_employees, num_days, num_shifts
    ));
    let grid = AssignmentGrid::allocate(&mut ctx, num_employees, num_shifts, num_days);
    let mut penalties: Vec<PenaltyTerm> = Vec::new();

    // Exactly one shift per day.
    for e in 0..num_employees {
        for d in 0..num_days {
            let terms = grid.shifts_of(e, d).into_iter().map(|v| (v, 1.0)).collect();
            ctx.add_linear(
                terms,
                ConstraintType::Equal,
                1.0,
                format!("one_shift(employee={}, day={})", e, d),
            );
        }
    }

    for fixed in &problem.fixed_assignments {
        let var = grid.checked(fixed.employee, fixed.shift, fixed.day)?;
        ctx.add_linear(
            vec![(var, 1.0)],
            ConstraintType::Equal,
            1.0,
            format!(
                "fixed(employee={}, day={}, shift={})",
                fixed.employee, fixed.day, fixed.shift
            ),
        );
    }

    for request in &problem.requests {
        request.validate()?;
        let var = grid.checked(request.employee, request.shift, request.day)?;
        penalties.push(PenaltyTerm::bool(var, request.signed_weight()));
    }

    for rule in &problem.run_rules {
        check_index("shift", rule.shift, num_shifts)?;
        for e in 0..num_employees {
            let basename = format!("shift_constraint(employee {}, shift {})", e, rule.shift);
            penalties.extend(add_sequence_constraint(
                &mut ctx,
                grid.days_of(e, rule.shift),
                rule,
                &basename,
            )?);
        }
    }

    for rule in &problem.sum_rules {
        check_index("shift", rule.shift, num_shifts)?;
        rule.validate()?;
        if rule.window > num_days {
            return Err(ScheduleError::config(
                rule.label(),
                "window",
                format!("({}) is longer than the horizon ({} days)", rule.window, num_days),
            ));
        }
        let num_windows = num_days / rule.window;
        if num_days % rule.window != 0 {
            debug!(
                event = "partial_window_skipped",
                shift = rule.shift,
                window = rule.window,
                days = num_days % rule.window,
            );
        }
        for e in 0..num_employees {
            let days = grid.days_of(e, rule.shift);
            for w in 0..num_windows {
                let basename = if rule.window == DAYS_PER_WEEK {
                    format!(
                        "weekly_sum_constraint(employee {}, shift {}, week {})",
                        e, rule.shift, w
                    )
                } else {
                    format!(
                        "sum_constraint(employee {}, shift {}, window {})",
                        e, rule.shift, w
                    )
                };
                let window = &days[w * rule.window..(w + 1) * rule.window];
                penalties.extend(add_window_sum_constraint(&mut ctx, window, rule, &basename)?);
            }
        }
    }

    for rule in &problem.transitions {
        penalties.extend(add_transition_constraints(&mut ctx, &grid, rule)?);
    }

    for demand in &problem.coverage {
        penalties.extend(add_coverage_constraints(
            &mut ctx,
            &grid,
            demand,
            problem.off_shift,
            DAYS_PER_WEEK,
        )?);
    }

    info!(
        event = "model_built",
        name = %problem.name,
        variables = ctx.num_variables(),
        constraints = ctx.num_constraints(),
        penalties = penalties.len(),
    );

    Ok(ctx.finish(grid, problem.shifts.clone(), penalties, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FEASIBILITY_TOLERANCE;
    use crate::scheduling::rules::{BoundedRunRule, BoundedSumRule, FixedAssignment, Request};

    fn tiny() -> ShiftProblem {
        ShiftProblem {
            name: "tiny".to_string(),
            num_employees: 2,
            num_weeks: 1,
            shifts: vec!["Off".to_string(), "Day".to_string()],
            off_shift: 0,
            fixed_assignments: vec![FixedAssignment::new(0, 0, 1)],
            requests: vec![Request::wants(1, 6, 0, 3)],
            run_rules: Vec::new(),
            sum_rules: Vec::new(),
            transitions: Vec::new(),
            coverage: Vec::new(),
        }
    }

    #[test]
    fn test_grid_and_hard_rows() {
        let model = tiny().build_model().unwrap();
        let problem = model.problem();

        assert_eq!(problem.num_variables(), 2 * 2 * 7);
        // one_shift rows plus the fixed assignment
        assert_eq!(problem.constraints.len(), 2 * 7 + 1);
        assert_eq!(problem.constraints[14].name, "fixed(employee=0, day=0, shift=1)");

        let grid = model.grid();
        assert_eq!(
            problem.objective.terms,
            vec![(grid.get(1, 0, 6), -3.0)]
        );
    }

    #[test]
    fn test_exactly_one_shift_rows() {
        let model = tiny().build_model().unwrap();
        let grid = model.grid();
        let problem = model.problem();

        let mut values = vec![0.0; problem.num_variables()];
        for e in 0..2 {
            for d in 0..7 {
                let shift = if (e, d) == (0, 0) { 1 } else { 0 };
                values[grid.get(e, shift, d).index()] = 1.0;
            }
        }
        assert!(problem.max_violation(&values) <= FEASIBILITY_TOLERANCE);

        // A second shift on the same day breaks the row for that day.
        values[grid.get(1, 1, 3).index()] = 1.0;
        assert_eq!(
            problem.violated_constraints(&values),
            vec!["one_shift(employee=1, day=3)"]
        );
    }

    #[test]
    fn test_fixed_assignment_out_of_range() {
        let mut problem = tiny();
        problem.fixed_assignments.push(FixedAssignment::new(0, 7, 1));
        assert!(matches!(
            problem.build_model(),
            Err(ScheduleError::Index { what: "day", index: 7, limit: 7 })
        ));

        let mut problem = tiny();
        problem.requests.push(Request::wants(2, 0, 0, 1));
        assert!(matches!(
            problem.build_model(),
            Err(ScheduleError::Index { what: "employee", .. })
        ));
    }

    #[test]
    fn test_invalid_rule_fails_the_build() {
        let mut problem = tiny();
        problem.run_rules.push(BoundedRunRule {
            shift: 0,
            hard_min: 3,
            soft_min: 3,
            min_cost: 0,
            soft_max: 2,
            hard_max: 4,
            max_cost: 0,
        });
        let err = problem.build_model().unwrap_err();
        assert!(matches!(err, ScheduleError::Config { field: "soft_max", .. }));
    }

    #[test]
    fn test_sum_window_longer_than_horizon_is_rejected() {
        let mut problem = tiny();
        problem.sum_rules.push(BoundedSumRule {
            shift: 1,
            hard_min: 10,
            soft_min: 10,
            min_cost: 0,
            soft_max: 10,
            hard_max: 10,
            max_cost: 0,
            window: 14,
        });
        match problem.build_model() {
            Err(ScheduleError::Config { rule, field, .. }) => {
                assert_eq!(rule, "sum rule on shift 1");
                assert_eq!(field, "window");
            }
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_sample_builds_deterministically() {
        let first = ShiftProblem::sample().build_model().unwrap();
        let second = ShiftProblem::sample().build_model().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.problem().num_variables(), second.problem().num_variables());
        assert_eq!(first.problem().constraints.len(), second.problem().constraints.len());
        assert_eq!(first.problem().objective, second.problem().objective);
    }
}
