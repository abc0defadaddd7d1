// Domain layer: generic optimization model and solver contract
pub mod domain;

// Scheduling layer: rules, encoders, model builder and reporting
pub mod scheduling;

// Application layer: Use cases and service orchestration
pub mod application;

pub mod config;
pub mod logging;

// Solver adapters: Concrete implementations of SolverService
#[cfg(feature = "solvers")]
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, Incumbent, ObjectiveFunction, OptimizationProblem,
    OptimizationType, ProgressListener, SearchStrategy, Solution, SolutionStatus, SolverBackend,
    SolverConfig, SolverError, SolverService, Variable, VariableType,
};

pub use scheduling::{
    build_model, BoundedRunRule, BoundedSumRule, CoverageDemand, FixedAssignment, Polarity,
    Request, ScheduleError, ScheduleReport, ShiftModel, ShiftProblem, TransitionRule,
};

pub use application::ScheduleService;
pub use config::{AppConfig, ConfigError};

#[cfg(feature = "solvers")]
pub use solver::{CoinCbcSolver, HighsSolver, SolverFactory};
