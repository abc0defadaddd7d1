// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates our domain models to HiGHS API

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{ProgressListener, Result, SolverError, SolverService},
    value_objects::{
        ConstraintType, OptimizationType, SearchStrategy, SolutionStatus as DomainSolutionStatus,
        VariableType,
    },
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

use super::finish_incumbent;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve_with_listener(
        &self,
        problem: &OptimizationProblem,
        listener: Option<&mut dyn ProgressListener>,
    ) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;
        let objective = problem.objective.dense_coefficients(problem.num_variables());

        // Use HiGHS RowProblem (add variables first, then constraints)
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.num_variables());

        for (var_def, &obj_coeff) in problem.variables.iter().zip(&objective) {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let col = match var_def.variable_type {
                VariableType::Integer | VariableType::Binary => {
                    pb.add_integer_column(obj_coeff, lower..=upper)
                }
                VariableType::Continuous => pb.add_column(obj_coeff, lower..=upper),
            };
            cols.push(col);
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .filter(|(_, coeff)| *coeff != 0.0)
                .map(|&(var, coeff)| (cols[var.index()], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if problem.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let mut model = pb.optimise(sense);
        model.set_option("output_flag", config.verbose);
        if let Some(limit) = config.time_limit {
            model.set_option("time_limit", limit);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }
        if let Some(workers) = config.num_workers {
            model.set_option("threads", workers as i32);
        }
        if config.strategy == SearchStrategy::Fixed {
            // Branch only, no primal heuristics.
            model.set_option("mip_heuristic_effort", 0.0);
        }

        tracing::debug!(
            event = "highs_solve",
            columns = cols.len(),
            rows = problem.constraints.len(),
            time_limit = ?config.time_limit,
        );
        let solved = model.solve();
        let elapsed = start_time.elapsed();
        let statistics = SolverStatistics::for_problem(problem);

        match solved.status() {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let mut solution =
                    finish_incumbent(problem, values, true, None, elapsed, statistics, listener);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                Ok(solution)
            }
            HighsModelStatus::ReachedTimeLimit
            | HighsModelStatus::ReachedIterationLimit
            | HighsModelStatus::ObjectiveBound
            | HighsModelStatus::ObjectiveTarget
            | HighsModelStatus::Unknown => {
                // Whatever incumbent HiGHS holds is checked before it is trusted.
                let values = solved.get_solution().columns().to_vec();
                let gap = Some(solved.mip_gap());
                Ok(finish_incumbent(problem, values, false, gap, elapsed, statistics, listener))
            }
            HighsModelStatus::Infeasible => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(SolverStatistics {
                solve_time_ms: elapsed.as_secs_f64() * 1000.0,
                ..statistics
            })),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(DomainSolution::new(
                    DomainSolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
                .with_statistics(SolverStatistics {
                    solve_time_ms: elapsed.as_secs_f64() * 1000.0,
                    ..statistics
                }))
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
