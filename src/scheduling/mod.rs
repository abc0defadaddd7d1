// Shift-scheduling model assembly.
//
// `ShiftProblem` holds the rules; `build_model` turns them into a
// `ShiftModel`: one binary column per (employee, shift, day), hard rows
// for every rule, and an objective that sums the penalty columns the
// encoders create. `ScheduleReport` reads a solver result back.

pub mod builder;
pub mod context;
pub mod encoders;
pub mod error;
pub mod penalty;
pub mod problem;
pub mod report;
pub mod rules;

pub use builder::build_model;
pub use context::{AssignmentGrid, ModelContext, ShiftModel};
pub use error::{Result, ScheduleError};
pub use penalty::{aggregate_objective, PenaltyKind, PenaltyTerm};
pub use problem::{ShiftProblem, DAYS_PER_WEEK};
pub use report::{ActivePenalty, ScheduleReport};
pub use rules::{
    BoundedRunRule, BoundedSumRule, CoverageDemand, FixedAssignment, Polarity, Request,
    TransitionRule,
};
