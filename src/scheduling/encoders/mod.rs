// Constraint encoders: each one writes hard rows into the model context and
// returns the penalty terms it created. Encoders never call each other.

pub mod coverage;
pub mod cumulative;
pub mod sequence;
pub mod transition;

#[cfg(test)]
pub(crate) mod testing;

pub use coverage::{add_cover_constraint, add_coverage_constraints};
pub use cumulative::add_window_sum_constraint;
pub use sequence::{add_sequence_constraint, negated_bounded_span};
pub use transition::{add_transition_clause, add_transition_constraints};
