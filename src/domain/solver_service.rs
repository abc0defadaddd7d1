// Domain service interface for solving optimization problems
// Defines the contract that any solver implementation must follow

use super::models::{OptimizationProblem, Solution};
use std::time::Duration;

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Read-only snapshot of the search handed to a [`ProgressListener`]
#[derive(Debug, Clone, PartialEq)]
pub struct Incumbent {
    pub objective_value: f64,
    pub best_bound: Option<f64>,
    pub elapsed: Duration,
    /// Number of incumbents reported so far, this one included
    pub solution_count: u64,
}

/// Observer invoked synchronously by a backend on each improved incumbent.
///
/// Listeners only ever see an [`Incumbent`]; they have no access to the model.
pub trait ProgressListener {
    fn on_incumbent(&mut self, incumbent: &Incumbent);
}

/// Listener that keeps every reported incumbent
#[derive(Debug, Default)]
pub struct IncumbentLog {
    pub incumbents: Vec<Incumbent>,
}

impl ProgressListener for IncumbentLog {
    fn on_incumbent(&mut self, incumbent: &Incumbent) {
        tracing::info!(
            event = "incumbent",
            solution = incumbent.solution_count,
            objective = incumbent.objective_value,
            bound = ?incumbent.best_bound,
            elapsed_ms = incumbent.elapsed.as_millis() as u64,
        );
        self.incumbents.push(incumbent.clone());
    }
}

/// Domain service interface for optimization solvers
///
/// This trait defines the contract that all solver implementations must follow.
/// It allows us to swap solver backends without changing the model assembly.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.solve_with_listener(problem, None)
    }

    /// Solve, reporting incumbents to `listener` as the backend finds them
    fn solve_with_listener(
        &self,
        problem: &OptimizationProblem,
        listener: Option<&mut dyn ProgressListener>,
    ) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        validate_problem(problem)
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}

/// Structural checks shared by every backend
pub fn validate_problem(problem: &OptimizationProblem) -> Result<()> {
    let mut errors = Vec::new();
    let num_vars = problem.num_variables();

    if num_vars == 0 {
        errors.push("Problem must have at least one variable".to_string());
    }

    for &(var, _) in &problem.objective.terms {
        if var.index() >= num_vars {
            errors.push(format!(
                "Objective references {} but problem has {} variables",
                var, num_vars
            ));
        }
    }

    for (i, constraint) in problem.constraints.iter().enumerate() {
        if let Some(&(var, _)) = constraint.terms.iter().find(|(v, _)| v.index() >= num_vars) {
            errors.push(format!(
                "Constraint {} '{}' references {} but problem has {} variables",
                i, constraint.name, var, num_vars
            ));
        }
    }

    for (i, var) in problem.variables.iter().enumerate() {
        if let Some(upper) = var.upper_bound {
            if var.lower_bound > upper {
                errors.push(format!(
                    "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                    i, var.name, var.lower_bound, upper
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SolverError::InvalidProblem(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Constraint, ConstraintType, ObjectiveFunction, Variable, VarId,
    };

    #[test]
    fn test_validate_rejects_dangling_columns() {
        let mut problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![]));
        let x = problem.add_variable(Variable::binary("x"));
        problem.add_constraint(Constraint::new(
            ConstraintType::Equal,
            vec![(x, 1.0), (VarId(7), 1.0)],
            1.0,
        ));
        let err = validate_problem(&problem).unwrap_err();
        assert!(err.to_string().contains("x7"));
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let mut problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![]));
        problem.add_variable(Variable::integer("n").with_bounds(4.0, Some(2.0)));
        assert!(validate_problem(&problem).is_err());
    }

    #[test]
    fn test_incumbent_log_records() {
        let mut log = IncumbentLog::default();
        log.on_incumbent(&Incumbent {
            objective_value: 12.0,
            best_bound: Some(10.0),
            elapsed: Duration::from_millis(5),
            solution_count: 1,
        });
        assert_eq!(log.incumbents.len(), 1);
        assert_eq!(log.incumbents[0].objective_value, 12.0);
    }
}
