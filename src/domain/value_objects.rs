// Domain value objects shared by the model, the encoders and the solver adapters

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a column in an [`OptimizationProblem`](super::OptimizationProblem)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Positive literal on a binary column
    pub fn lit(self) -> Literal {
        Literal {
            var: self,
            negated: false,
        }
    }

    /// Negated literal on a binary column
    pub fn not(self) -> Literal {
        Literal {
            var: self,
            negated: true,
        }
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A binary column or its complement, as used in clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub var: VarId,
    pub negated: bool,
}

impl Literal {
    /// Truth value of this literal under a 0/1 assignment of its column
    pub fn holds(&self, value: f64) -> bool {
        let is_true = value > 0.5;
        is_true != self.negated
    }
}

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl ConstraintType {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintType::LessThanOrEqual => "<=",
            ConstraintType::Equal => "=",
            ConstraintType::GreaterThanOrEqual => ">=",
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Status of the optimization solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Proven optimal solution
    Optimal,
    /// Feasible solution found, optimality not proven
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// No conclusion was reached (typically a time limit without incumbent)
    Unknown,
    /// Objective can be improved infinitely
    Unbounded,
    /// Solver error occurred
    Error,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "OPTIMAL"),
            SolutionStatus::Feasible => write!(f, "FEASIBLE"),
            SolutionStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolutionStatus::Unknown => write!(f, "UNKNOWN"),
            SolutionStatus::Unbounded => write!(f, "UNBOUNDED"),
            SolutionStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

/// Branching strategy requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Let the backend choose
    #[default]
    Automatic,
    /// Branch on variables in declaration order
    Fixed,
    /// Run several strategies concurrently (uses `num_workers`)
    Portfolio,
}
