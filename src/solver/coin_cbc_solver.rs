use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{ProgressListener, Result, SolverError, SolverService},
    value_objects::{
        ConstraintType, OptimizationType, SearchStrategy, SolutionStatus as DomainSolutionStatus,
        VariableType,
    },
};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus as GoodLpStatus, SolverModel,
    Variable as GoodLpVariable,
};
use std::time::Instant;

use super::finish_incumbent;

pub struct CoinCbcSolver;

/// Whether CBC proved optimality, and the relative gap it guarantees otherwise.
///
/// A gap stop guarantees at most `ratioGap`; a time stop gives no bound.
fn stop_reason(status: GoodLpStatus, gap_tolerance: Option<f64>) -> (bool, Option<f64>) {
    match status {
        GoodLpStatus::Optimal => (true, None),
        GoodLpStatus::GapLimit => (false, gap_tolerance),
        GoodLpStatus::TimeLimit => (false, None),
    }
}

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve_with_listener(
        &self,
        problem: &OptimizationProblem,
        listener: Option<&mut dyn ProgressListener>,
    ) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        // Build variables using good_lp
        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(problem.num_variables());

        for var_def in problem.variables.iter() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let var = match var_def.variable_type {
                VariableType::Binary => vars.add(variable().binary()),
                VariableType::Integer => vars.add(variable().integer().min(lower).max(upper)),
                VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
            };
            lp_variables.push(var);
        }

        // good_lp minimises, so negate for maximisation
        let is_maximize = problem.objective.optimization_type == OptimizationType::Maximize;
        let mut obj_expr: Expression = 0.into();
        for &(var, coeff) in &problem.objective.terms {
            if coeff != 0.0 {
                let c = if is_maximize { -coeff } else { coeff };
                obj_expr += c * lp_variables[var.index()];
            }
        }

        let mut lp_model = vars.minimise(obj_expr).using(coin_cbc::coin_cbc);

        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for &(var, coeff) in &constraint.terms {
                if coeff != 0.0 {
                    lhs += coeff * lp_variables[var.index()];
                }
            }

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    lp_model = lp_model.with(lhs.leq(constraint.bound));
                }
                ConstraintType::Equal => {
                    lp_model = lp_model.with(lhs.eq(constraint.bound));
                }
                ConstraintType::GreaterThanOrEqual => {
                    lp_model = lp_model.with(lhs.geq(constraint.bound));
                }
            }
        }

        lp_model.set_parameter("log", if config.verbose { "1" } else { "0" });
        if let Some(limit) = config.time_limit {
            lp_model.set_parameter("seconds", &limit.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model.set_parameter("ratioGap", &gap.to_string());
        }
        if let Some(workers) = config.num_workers {
            lp_model.set_parameter("threads", &workers.to_string());
        }
        match config.strategy {
            SearchStrategy::Automatic => {}
            SearchStrategy::Fixed => lp_model.set_parameter("strategy", "0"),
            SearchStrategy::Portfolio => lp_model.set_parameter("strategy", "2"),
        }

        tracing::debug!(
            event = "cbc_solve",
            columns = lp_variables.len(),
            rows = problem.constraints.len(),
            time_limit = ?config.time_limit,
        );
        let solution_result = lp_model.solve();
        let elapsed = start_time.elapsed();
        let statistics = SolverStatistics::for_problem(problem);

        match solution_result {
            Ok(sol) => {
                let values: Vec<f64> = lp_variables.iter().map(|&var| sol.value(var)).collect();
                let (proven, gap) = stop_reason(sol.status(), config.gap_tolerance);
                let mut solution =
                    finish_incumbent(problem, values, proven, gap, elapsed, statistics, listener);
                if solution.is_optimal() {
                    solution.message = format!("Optimal solution found for '{}'", problem.name);
                }
                Ok(solution)
            }
            Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(SolverStatistics {
                solve_time_ms: elapsed.as_secs_f64() * 1000.0,
                ..statistics
            })),
            Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
                DomainSolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(SolverStatistics {
                solve_time_ms: elapsed.as_secs_f64() * 1000.0,
                ..statistics
            })),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
