// Solver adapters: concrete implementations of SolverService

pub mod coin_cbc_solver;
pub mod factory;
pub mod highs_solver;

pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
pub use highs_solver::HighsSolver;

use std::time::Duration;

use crate::domain::{
    Incumbent, OptimizationProblem, ProgressListener, Solution, SolutionQuality, SolutionStatus,
    SolverStatistics,
};

/// Wraps backend column values into a solution, verifying them against every row.
///
/// Values that fail the check are reported as UNKNOWN rather than trusted.
/// A verified incumbent is passed to `listener` once. For an unproven incumbent
/// `relative_gap` is the backend's reported gap and sets its best bound.
pub(crate) fn finish_incumbent(
    problem: &OptimizationProblem,
    values: Vec<f64>,
    proven_optimal: bool,
    relative_gap: Option<f64>,
    elapsed: Duration,
    mut statistics: SolverStatistics,
    listener: Option<&mut dyn ProgressListener>,
) -> Solution {
    statistics.solve_time_ms = elapsed.as_secs_f64() * 1000.0;
    let quality = SolutionQuality::measure(problem, &values);

    let usable = values.len() == problem.num_variables() && quality.is_within_tolerance();
    if !usable {
        tracing::warn!(
            event = "incumbent_rejected",
            max_violation = quality.max_constraint_violation,
            max_integrality = quality.max_integrality_violation,
        );
        return Solution::new(
            SolutionStatus::Unknown,
            "Solver stopped without a verified solution",
        )
        .with_statistics(statistics)
        .with_quality(quality);
    }

    let objective = problem.objective_value(&values);
    statistics.solutions_found = 1;
    let solution = if proven_optimal {
        Solution::optimal(objective, values)
    } else {
        let solution = Solution::feasible(objective, values);
        match relative_gap {
            Some(gap) => solution.with_relative_gap(gap, problem.objective.optimization_type),
            None => solution,
        }
    };

    if let Some(listener) = listener {
        listener.on_incumbent(&Incumbent {
            objective_value: objective,
            best_bound: solution.best_bound,
            elapsed,
            solution_count: 1,
        });
    }

    solution.with_statistics(statistics).with_quality(quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IncumbentLog, ObjectiveFunction, SolutionStatus, Variable};

    fn single_column() -> OptimizationProblem {
        let mut problem = OptimizationProblem::new(ObjectiveFunction::minimize(Vec::new()));
        let x = problem.add_variable(Variable::integer("x").with_bounds(0.0, Some(10.0)));
        problem.objective.terms = vec![(x, 2.0)];
        problem
    }

    #[test]
    fn test_unproven_incumbent_carries_the_gap_bound() {
        let problem = single_column();
        let mut log = IncumbentLog::default();
        let solution = finish_incumbent(
            &problem,
            vec![5.0],
            false,
            Some(0.1),
            Duration::from_millis(3),
            SolverStatistics::for_problem(&problem),
            Some(&mut log),
        );

        assert_eq!(solution.status, SolutionStatus::Feasible);
        assert_eq!(solution.optimal_value, Some(10.0));
        assert_eq!(solution.best_bound, Some(9.0));
        assert_eq!(solution.gap, Some(0.1));
        assert_eq!(log.incumbents.len(), 1);
        assert_eq!(log.incumbents[0].best_bound, Some(9.0));
    }

    #[test]
    fn test_values_outside_bounds_are_not_trusted() {
        let problem = single_column();
        let solution = finish_incumbent(
            &problem,
            vec![11.0],
            true,
            None,
            Duration::ZERO,
            SolverStatistics::for_problem(&problem),
            None,
        );
        assert_eq!(solution.status, SolutionStatus::Unknown);
        assert_eq!(solution.statistics.solutions_found, 0);
    }
}
