// Owned model under construction and the immutable model handed to a solver.
// Boolean clauses become linear rows over 0/1 columns.

use std::fmt;

use crate::domain::{
    lp_format::LpFormat, Constraint, ConstraintType, Literal, LinearTerm, ObjectiveFunction,
    OptimizationProblem, SolverConfig, VarId, Variable,
};

use super::error::{check_index, Result};
use super::penalty::{aggregate_objective, PenaltyTerm};

/// Append-only builder for variables and hard constraints.
///
/// Encoders receive it by `&mut` and return their penalty terms instead of storing them.
#[derive(Debug)]
pub struct ModelContext {
    problem: OptimizationProblem,
}

impl ModelContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            problem: OptimizationProblem::new(ObjectiveFunction::minimize(Vec::new()))
                .with_name(name),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.problem = self.problem.with_description(description);
        self
    }

    pub fn new_bool(&mut self, name: impl Into<String>) -> VarId {
        self.problem.add_variable(Variable::binary(name))
    }

    pub fn new_int(&mut self, lower: i64, upper: i64, name: impl Into<String>) -> VarId {
        self.problem.add_variable(
            Variable::integer(name).with_bounds(lower as f64, Some(upper as f64)),
        )
    }

    pub fn add_linear(
        &mut self,
        terms: Vec<LinearTerm>,
        constraint_type: ConstraintType,
        bound: f64,
        name: impl Into<String>,
    ) {
        self.problem
            .add_constraint(Constraint::new(constraint_type, terms, bound).with_name(name));
    }

    /// At least one literal holds: Σ x(pos) - Σ x(neg) >= 1 - |neg|
    pub fn add_bool_or(&mut self, literals: &[Literal], name: impl Into<String>) {
        let negated = literals.iter().filter(|l| l.negated).count();
        let terms = literals
            .iter()
            .map(|l| (l.var, if l.negated { -1.0 } else { 1.0 }))
            .collect();
        self.add_linear(
            terms,
            ConstraintType::GreaterThanOrEqual,
            1.0 - negated as f64,
            name,
        );
    }

    /// `target = max(source, 0)` for `source` within `[lower, upper]`.
    ///
    /// Exact big-M form with an activity indicator `b`:
    /// target >= source, target <= source + M1 (1 - b), target <= M2 b,
    /// where M1 = -lower and M2 = upper.
    pub fn add_max_with_zero(
        &mut self,
        target: VarId,
        source: VarId,
        lower: i64,
        upper: i64,
        name: &str,
    ) {
        let below = lower.min(0).unsigned_abs() as f64;
        let above = upper.max(0) as f64;
        let active = self.new_bool(format!("{}: active", name));

        self.add_linear(
            vec![(target, 1.0), (source, -1.0)],
            ConstraintType::GreaterThanOrEqual,
            0.0,
            format!("{}: max_lower", name),
        );
        self.add_linear(
            vec![(target, 1.0), (source, -1.0), (active, below)],
            ConstraintType::LessThanOrEqual,
            below,
            format!("{}: max_source", name),
        );
        self.add_linear(
            vec![(target, 1.0), (active, -above)],
            ConstraintType::LessThanOrEqual,
            0.0,
            format!("{}: max_zero", name),
        );
    }

    pub fn num_variables(&self) -> usize {
        self.problem.num_variables()
    }

    pub fn num_constraints(&self) -> usize {
        self.problem.constraints.len()
    }

    pub fn problem(&self) -> &OptimizationProblem {
        &self.problem
    }

    /// Aggregates `penalties` into the objective and freezes the model
    pub fn finish(
        mut self,
        grid: AssignmentGrid,
        shift_names: Vec<String>,
        penalties: Vec<PenaltyTerm>,
        config: SolverConfig,
    ) -> ShiftModel {
        self.problem.objective = aggregate_objective(&penalties);
        self.problem.solver_config = config;
        ShiftModel {
            problem: self.problem,
            grid,
            shift_names,
            penalties,
        }
    }
}

/// Assignment columns indexed by (employee, shift, day)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentGrid {
    num_employees: usize,
    num_shifts: usize,
    num_days: usize,
    vars: Vec<VarId>,
}

impl AssignmentGrid {
    /// Allocates one binary column per cell, employee-major then shift then day
    pub fn allocate(
        ctx: &mut ModelContext,
        num_employees: usize,
        num_shifts: usize,
        num_days: usize,
    ) -> Self {
        let mut vars = Vec::with_capacity(num_employees * num_shifts * num_days);
        for e in 0..num_employees {
            for s in 0..num_shifts {
                for d in 0..num_days {
                    vars.push(ctx.new_bool(format!("work{}_{}_{}", e, s, d)));
                }
            }
        }
        Self {
            num_employees,
            num_shifts,
            num_days,
            vars,
        }
    }

    pub fn num_employees(&self) -> usize {
        self.num_employees
    }

    pub fn num_shifts(&self) -> usize {
        self.num_shifts
    }

    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// # Panics
    ///
    /// Panics if any index is out of range; use [`Self::checked`] for untrusted input.
    pub fn get(&self, employee: usize, shift: usize, day: usize) -> VarId {
        assert!(employee < self.num_employees && shift < self.num_shifts && day < self.num_days);
        self.vars[(employee * self.num_shifts + shift) * self.num_days + day]
    }

    pub fn checked(&self, employee: usize, shift: usize, day: usize) -> Result<VarId> {
        check_index("employee", employee, self.num_employees)?;
        check_index("shift", shift, self.num_shifts)?;
        check_index("day", day, self.num_days)?;
        Ok(self.get(employee, shift, day))
    }

    /// One employee's indicator for `shift`, day by day
    pub fn days_of(&self, employee: usize, shift: usize) -> &[VarId] {
        let start = (employee * self.num_shifts + shift) * self.num_days;
        &self.vars[start..start + self.num_days]
    }

    /// Every employee's indicator for `shift` on `day`
    pub fn employees_on(&self, shift: usize, day: usize) -> Vec<VarId> {
        (0..self.num_employees)
            .map(|e| self.get(e, shift, day))
            .collect()
    }

    /// One employee's indicators for every shift on `day`
    pub fn shifts_of(&self, employee: usize, day: usize) -> Vec<VarId> {
        (0..self.num_shifts)
            .map(|s| self.get(employee, s, day))
            .collect()
    }
}

/// Immutable assembled model, ready for a [`SolverService`](crate::domain::SolverService)
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftModel {
    problem: OptimizationProblem,
    grid: AssignmentGrid,
    shift_names: Vec<String>,
    penalties: Vec<PenaltyTerm>,
}

impl ShiftModel {
    pub fn problem(&self) -> &OptimizationProblem {
        &self.problem
    }

    pub fn grid(&self) -> &AssignmentGrid {
        &self.grid
    }

    pub fn shift_names(&self) -> &[String] {
        &self.shift_names
    }

    pub fn penalties(&self) -> &[PenaltyTerm] {
        &self.penalties
    }

    pub fn penalty_name(&self, term: &PenaltyTerm) -> &str {
        self.problem
            .variable(term.var)
            .map_or("", |v| v.name.as_str())
    }
}

impl fmt::Display for ShiftModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", LpFormat(&self.problem))
    }
}
