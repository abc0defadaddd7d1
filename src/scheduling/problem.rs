use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

use super::error::{check_index, Result, ScheduleError};
use super::rules::{
    BoundedRunRule, BoundedSumRule, CoverageDemand, FixedAssignment, Request, TransitionRule,
};

pub const DAYS_PER_WEEK: usize = 7;

/// A complete scheduling instance: horizon, shifts and every rule.
///
/// Instances load from TOML; [`ShiftProblem::sample`] is the reference
/// eight-employee, three-week instance.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShiftProblem {
    #[serde(default)]
    pub name: String,
    pub num_employees: usize,
    pub num_weeks: usize,
    /// Shift names; the first letter of each is used in reports
    pub shifts: Vec<String>,
    /// Index of the shift meaning "not working"
    #[serde(default)]
    pub off_shift: usize,
    #[serde(default)]
    pub fixed_assignments: Vec<FixedAssignment>,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub run_rules: Vec<BoundedRunRule>,
    #[serde(default)]
    pub sum_rules: Vec<BoundedSumRule>,
    #[serde(default)]
    pub transitions: Vec<TransitionRule>,
    #[serde(default)]
    pub coverage: Vec<CoverageDemand>,
}

impl ShiftProblem {
    pub fn num_days(&self) -> usize {
        self.num_weeks * DAYS_PER_WEEK
    }

    pub fn num_shifts(&self) -> usize {
        self.shifts.len()
    }

    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks the horizon and shift list; rule contents are checked as they are encoded
    pub fn validate(&self) -> Result<()> {
        if self.num_employees == 0 {
            return Err(ScheduleError::config(
                "instance",
                "num_employees",
                "must be at least one",
            ));
        }
        if self.num_weeks == 0 {
            return Err(ScheduleError::config(
                "instance",
                "num_weeks",
                "must be at least one",
            ));
        }
        if self.shifts.is_empty() {
            return Err(ScheduleError::config(
                "instance",
                "shifts",
                "must name at least one shift",
            ));
        }
        check_index("shift", self.off_shift, self.num_shifts())
    }

    /// Eight employees over three weeks with off, morning, afternoon and night shifts
    pub fn sample() -> Self {
        let fixed = [
            (0, 0, 0),
            (1, 0, 0),
            (2, 0, 1),
            (3, 0, 1),
            (4, 0, 2),
            (5, 0, 2),
            (6, 0, 2),
            (7, 0, 3),
            (0, 1, 1),
            (1, 1, 1),
            (2, 1, 2),
            (3, 1, 2),
            (4, 1, 2),
            (5, 1, 0),
            (6, 1, 0),
            (7, 1, 3),
        ];

        Self {
            name: "shift_scheduling".to_string(),
            num_employees: 8,
            num_weeks: 3,
            shifts: ["Off", "Morning", "Afternoon", "Night"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            off_shift: 0,
            fixed_assignments: fixed
                .iter()
                .map(|&(e, d, s)| FixedAssignment::new(e, d, s))
                .collect(),
            requests: vec![
                // Employee 3 wants the first Saturday off.
                Request::wants(3, 5, 0, 2),
                // Employee 5 wants a night shift on the second Thursday.
                Request::wants(5, 10, 3, 2),
                // Employee 2 does not want a night shift on the first Friday.
                Request::avoids(2, 4, 3, 4),
            ],
            run_rules: vec![
                // One or two consecutive days of rest.
                BoundedRunRule {
                    shift: 0,
                    hard_min: 1,
                    soft_min: 1,
                    min_cost: 0,
                    soft_max: 2,
                    hard_max: 2,
                    max_cost: 0,
                },
                // Two or three consecutive nights; one or four are penalized.
                BoundedRunRule {
                    shift: 3,
                    hard_min: 1,
                    soft_min: 2,
                    min_cost: 20,
                    soft_max: 3,
                    hard_max: 4,
                    max_cost: 5,
                },
            ],
            sum_rules: vec![
                // Rest days per week.
                BoundedSumRule {
                    shift: 0,
                    hard_min: 1,
                    soft_min: 2,
                    min_cost: 7,
                    soft_max: 2,
                    hard_max: 3,
                    max_cost: 4,
                    window: DAYS_PER_WEEK,
                },
                // At least one night per week (soft), at most four (hard).
                BoundedSumRule {
                    shift: 3,
                    hard_min: 0,
                    soft_min: 1,
                    min_cost: 3,
                    soft_max: 4,
                    hard_max: 4,
                    max_cost: 0,
                    window: DAYS_PER_WEEK,
                },
            ],
            transitions: vec![
                TransitionRule {
                    previous: 2,
                    next: 3,
                    cost: 4,
                },
                // Night to morning is forbidden.
                TransitionRule {
                    previous: 3,
                    next: 1,
                    cost: 0,
                },
            ],
            coverage: vec![
                CoverageDemand {
                    shift: 1,
                    weekly_minimum: vec![2, 2, 2, 2, 2, 1, 1],
                    excess_cost: 2,
                },
                CoverageDemand {
                    shift: 2,
                    weekly_minimum: vec![3, 3, 2, 3, 2, 2, 3],
                    excess_cost: 2,
                },
                CoverageDemand {
                    shift: 3,
                    weekly_minimum: vec![1, 1, 2, 1, 2, 3, 1],
                    excess_cost: 5,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape() {
        let sample = ShiftProblem::sample();
        assert_eq!(sample.num_days(), 21);
        assert_eq!(sample.num_shifts(), 4);
        assert_eq!(sample.fixed_assignments.len(), 16);
        assert!(sample.validate().is_ok());
    }

    #[test]
    fn test_toml_instance() {
        let toml = r#"
            name = "small"
            num_employees = 3
            num_weeks = 1
            shifts = ["Off", "Day"]

            [[fixed_assignments]]
            employee = 0
            day = 0
            shift = 1

            [[requests]]
            employee = 1
            day = 2
            shift = 0
            weight = 3
            polarity = "positive"

            [[run_rules]]
            shift = 0
            hard_min = 1
            soft_min = 1
            min_cost = 0
            soft_max = 2
            hard_max = 3
            max_cost = 1

            [[coverage]]
            shift = 1
            weekly_minimum = [1, 1, 1, 1, 1, 0, 0]
            excess_cost = 1
        "#;

        let problem = ShiftProblem::from_toml_str(toml).unwrap();
        assert_eq!(problem.num_days(), 7);
        assert_eq!(problem.off_shift, 0);
        assert_eq!(problem.requests[0].signed_weight(), -3);
        assert_eq!(problem.run_rules[0].hard_max, 3);
        assert!(problem.sum_rules.is_empty());
    }

    #[test]
    fn test_rejects_empty_horizon() {
        let problem = ShiftProblem {
            num_weeks: 0,
            ..ShiftProblem::sample()
        };
        assert!(problem.validate().is_err());

        let problem = ShiftProblem {
            off_shift: 4,
            ..ShiftProblem::sample()
        };
        assert!(matches!(
            problem.validate(),
            Err(ScheduleError::Index { what: "shift", .. })
        ));
    }
}
