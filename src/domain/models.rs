use serde::{Deserialize, Serialize};

use super::value_objects::{
    ConstraintType, OptimizationType, SearchStrategy, SolutionStatus, SolverBackend, VarId,
    VariableType,
};

/// Tolerance used when checking rows and integrality against returned values
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Sparse linear term: column and coefficient
pub type LinearTerm = (VarId, f64);

/// Decision variable in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

/// Objective function to minimize or maximize
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub terms: Vec<LinearTerm>,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType, terms: Vec<LinearTerm>) -> Self {
        Self {
            optimization_type,
            terms,
        }
    }

    pub fn minimize(terms: Vec<LinearTerm>) -> Self {
        Self::new(OptimizationType::Minimize, terms)
    }

    /// Dense coefficient vector over `num_variables` columns, summing repeated columns
    pub fn dense_coefficients(&self, num_variables: usize) -> Vec<f64> {
        let mut coefficients = vec![0.0; num_variables];
        for &(var, coeff) in &self.terms {
            if let Some(slot) = coefficients.get_mut(var.index()) {
                *slot += coeff;
            }
        }
        coefficients
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Linear constraint on variables
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<LinearTerm>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<LinearTerm>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Amount by which `values` violates this row (0 when satisfied)
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs(values);
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => (lhs - self.bound).max(0.0),
            ConstraintType::GreaterThanOrEqual => (self.bound - lhs).max(0.0),
            ConstraintType::Equal => (lhs - self.bound).abs(),
        }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit in seconds
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which the search stops
    pub gap_tolerance: Option<f64>,
    /// Worker threads handed to the backend
    pub num_workers: Option<usize>,
    pub strategy: SearchStrategy,
    /// Let the backend write its own search log
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            num_workers: None,
            strategy: SearchStrategy::Automatic,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.num_workers = Some(workers);
        self
    }
}

/// Complete optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationProblem {
    pub name: String,
    pub description: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn variable(&self, var: VarId) -> Option<&Variable> {
        self.variables.get(var.index())
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.variable_type == VariableType::Binary)
            .count()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_integer_variables() > 0
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Largest row violation of `values`, including column bounds
    pub fn max_violation(&self, values: &[f64]) -> f64 {
        let rows = self
            .constraints
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0, f64::max);

        let bounds = self
            .variables
            .iter()
            .zip(values)
            .map(|(var, &value)| {
                let below = (var.lower_bound - value).max(0.0);
                let above = var.upper_bound.map_or(0.0, |ub| (value - ub).max(0.0));
                below.max(above)
            })
            .fold(0.0, f64::max);

        rows.max(bounds)
    }

    /// Largest distance of an integer column from the nearest integer
    pub fn max_integrality_violation(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .filter(|(var, _)| var.is_integer())
            .map(|(_, &value)| (value - value.round()).abs())
            .fold(0.0, f64::max)
    }

    /// Names of the rows violated by `values`, for diagnostics
    pub fn violated_constraints(&self, values: &[f64]) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| c.violation(values) > FEASIBILITY_TOLERANCE)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStatistics {
    pub conflicts: u64,
    /// Branch-and-bound nodes explored
    pub branches: u64,
    pub simplex_iterations: u64,
    pub solve_time_ms: f64,
    pub solutions_found: u64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem) -> Self {
        Self {
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_integer_vars: problem.num_integer_variables() as u32,
            num_binary_vars: problem.num_binary_variables() as u32,
            ..Self::default()
        }
    }
}

/// Quality metrics for the solution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

impl SolutionQuality {
    pub fn measure(problem: &OptimizationProblem, values: &[f64]) -> Self {
        Self {
            max_constraint_violation: problem.max_violation(values),
            max_integrality_violation: problem.max_integrality_violation(values),
        }
    }

    /// Both violations are at most [`FEASIBILITY_TOLERANCE`]
    pub fn is_within_tolerance(&self) -> bool {
        self.max_constraint_violation <= FEASIBILITY_TOLERANCE
            && self.max_integrality_violation <= FEASIBILITY_TOLERANCE
    }
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub optimal_value: Option<f64>,
    pub best_bound: Option<f64>,
    pub gap: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: SolutionQuality,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            best_bound: None,
            gap: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            best_bound: Some(value),
            gap: Some(0.0),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    /// Incumbent without an optimality proof (e.g. stopped by the time limit)
    pub fn feasible(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Feasible,
            optimal_value: Some(value),
            best_bound: None,
            gap: None,
            variable_values,
            message: "Feasible solution found".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    /// Records the bound implied by a relative gap `|obj - bound| / |obj|`.
    ///
    /// Only a feasible incumbent takes a bound this way; a non-finite gap is ignored.
    pub fn with_relative_gap(mut self, gap: f64, sense: OptimizationType) -> Self {
        let Some(value) = self.optimal_value else {
            return self;
        };
        if self.status != SolutionStatus::Feasible || !gap.is_finite() || gap < 0.0 {
            return self;
        }
        let slack = gap * value.abs();
        self.best_bound = Some(match sense {
            OptimizationType::Minimize => value - slack,
            OptimizationType::Maximize => value + slack,
        });
        self.gap = Some(gap);
        self
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_quality(mut self, quality: SolutionQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn is_feasible(&self) -> bool {
        matches!(
            self.status,
            SolutionStatus::Optimal | SolutionStatus::Feasible
        )
    }

    pub fn value(&self, var: VarId) -> Option<f64> {
        self.variable_values.get(var.index()).copied()
    }

    pub fn bool_value(&self, var: VarId) -> bool {
        self.value(var).is_some_and(|v| v > 0.5)
    }

    pub fn int_value(&self, var: VarId) -> i64 {
        self.value(var).map_or(0, |v| v.round() as i64)
    }
}
