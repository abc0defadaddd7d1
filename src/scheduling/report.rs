// Solution reporting: reads a terminal solver result back in scheduling terms.

use std::fmt;

use crate::domain::{Solution, SolutionStatus, SolverStatistics};

use super::context::ShiftModel;
use super::penalty::PenaltyKind;
use super::problem::DAYS_PER_WEEK;

/// A penalty column that is non-zero in the solution
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePenalty {
    pub name: String,
    pub kind: PenaltyKind,
    /// 1 for literals, the violation amount for integer penalties
    pub value: i64,
    pub weight: i64,
}

impl ActivePenalty {
    /// Contribution to the objective
    pub fn magnitude(&self) -> i64 {
        self.value.saturating_mul(self.weight)
    }

    /// A fulfilled preference rather than a violation
    pub fn is_gain(&self) -> bool {
        self.weight < 0
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleReport {
    pub status: SolutionStatus,
    pub objective: Option<f64>,
    pub best_bound: Option<f64>,
    /// Shift index per employee per day; empty without a feasible solution
    pub assignments: Vec<Vec<usize>>,
    pub penalties: Vec<ActivePenalty>,
    pub statistics: SolverStatistics,
    shift_labels: Vec<char>,
}

impl ScheduleReport {
    pub fn from_solution(model: &ShiftModel, solution: &Solution) -> Self {
        let shift_labels = model
            .shift_names()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                name.chars()
                    .next()
                    .or_else(|| char::from_digit(i as u32, 36))
                    .unwrap_or('?')
            })
            .collect();

        let mut report = Self {
            status: solution.status,
            objective: solution.optimal_value,
            best_bound: solution.best_bound,
            assignments: Vec::new(),
            penalties: Vec::new(),
            statistics: solution.statistics.clone(),
            shift_labels,
        };
        if !solution.is_feasible() {
            return report;
        }

        let grid = model.grid();
        report.assignments = (0..grid.num_employees())
            .map(|e| {
                (0..grid.num_days())
                    .map(|d| {
                        (0..grid.num_shifts())
                            .find(|&s| solution.bool_value(grid.get(e, s, d)))
                            .unwrap_or(0)
                    })
                    .collect()
            })
            .collect();

        report.penalties = model
            .penalties()
            .iter()
            .filter_map(|term| {
                let value = match term.kind {
                    PenaltyKind::Bool => i64::from(solution.bool_value(term.var)),
                    PenaltyKind::Int => solution.int_value(term.var),
                };
                (value > 0 && term.weight != 0).then(|| ActivePenalty {
                    name: model.penalty_name(term).to_string(),
                    kind: term.kind,
                    value,
                    weight: term.weight,
                })
            })
            .collect();

        report
    }

    pub fn shift_of(&self, employee: usize, day: usize) -> Option<usize> {
        self.assignments.get(employee)?.get(day).copied()
    }

    /// Sum of every active penalty; equals the objective of an integral solution
    pub fn total_penalty(&self) -> i64 {
        self.penalties
            .iter()
            .map(ActivePenalty::magnitude)
            .fold(0, i64::saturating_add)
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.assignments.is_empty() {
            let num_days = self.assignments[0].len();
            write!(f, "          ")?;
            for _ in 0..num_days / DAYS_PER_WEEK {
                write!(f, "M T W T F S S ")?;
            }
            writeln!(f)?;
            for (e, days) in self.assignments.iter().enumerate() {
                write!(f, "worker {}: ", e)?;
                for &s in days {
                    write!(f, "{} ", self.shift_labels.get(s).copied().unwrap_or('?'))?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
            writeln!(f, "Penalties:")?;
            for p in &self.penalties {
                match p.kind {
                    PenaltyKind::Bool if p.is_gain() => {
                        writeln!(f, "  {} fulfilled, gain={}", p.name, -p.weight)?
                    }
                    PenaltyKind::Bool => writeln!(f, "  {} violated, penalty={}", p.name, p.weight)?,
                    PenaltyKind::Int => writeln!(
                        f,
                        "  {} violated by {}, linear penalty={}",
                        p.name, p.value, p.weight
                    )?,
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "Statistics")?;
        writeln!(f, "  - status          : {}", self.status)?;
        if let Some(objective) = self.objective {
            writeln!(f, "  - objective       : {}", objective)?;
        }
        if let Some(bound) = self.best_bound {
            writeln!(f, "  - best bound      : {}", bound)?;
        }
        writeln!(f, "  - conflicts       : {}", self.statistics.conflicts)?;
        writeln!(f, "  - branches        : {}", self.statistics.branches)?;
        writeln!(f, "  - wall time       : {:.3} ms", self.statistics.solve_time_ms)?;
        writeln!(f, "  - solutions found : {}", self.statistics.solutions_found)
    }
}
