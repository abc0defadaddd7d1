// Scheduling rule records.
//
// Every rule is a named-field record so that instance files and code never
// depend on field order. Each record validates itself before it is encoded;
// invalid bounds and negative costs are rejected rather than clamped.

use serde::{Deserialize, Serialize};

use super::error::{check_index, Result, ScheduleError};

/// Locks `employee` to `shift` on `day`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FixedAssignment {
    pub employee: usize,
    pub day: usize,
    pub shift: usize,
}

impl FixedAssignment {
    pub fn new(employee: usize, day: usize, shift: usize) -> Self {
        Self {
            employee,
            day,
            shift,
        }
    }
}

/// Whether a request rewards or penalizes the requested assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// The employee wants this assignment
    Positive,
    /// The employee wants to avoid this assignment
    Negative,
}

/// Soft preference on a single assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Request {
    pub employee: usize,
    pub day: usize,
    pub shift: usize,
    pub weight: i64,
    pub polarity: Polarity,
}

impl Request {
    pub fn wants(employee: usize, day: usize, shift: usize, weight: i64) -> Self {
        Self {
            employee,
            day,
            shift,
            weight,
            polarity: Polarity::Positive,
        }
    }

    pub fn avoids(employee: usize, day: usize, shift: usize, weight: i64) -> Self {
        Self {
            employee,
            day,
            shift,
            weight,
            polarity: Polarity::Negative,
        }
    }

    /// Objective coefficient on the requested assignment: a reward is negative
    pub fn signed_weight(&self) -> i64 {
        match self.polarity {
            Polarity::Positive => -self.weight,
            Polarity::Negative => self.weight,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.weight < 0 {
            return Err(ScheduleError::config(
                format!(
                    "request (employee {}, day {}, shift {})",
                    self.employee, self.day, self.shift
                ),
                "weight",
                format!("must not be negative (got {})", self.weight),
            ));
        }
        Ok(())
    }
}

/// Bounds on the length of every maximal run of `shift`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoundedRunRule {
    pub shift: usize,
    pub hard_min: usize,
    pub soft_min: usize,
    pub min_cost: i64,
    pub soft_max: usize,
    pub hard_max: usize,
    pub max_cost: i64,
}

impl BoundedRunRule {
    pub fn label(&self) -> String {
        format!("run rule on shift {}", self.shift)
    }

    pub fn validate(&self) -> Result<()> {
        check_bounds(
            &self.label(),
            (self.hard_min, self.soft_min, self.soft_max, self.hard_max),
            self.min_cost,
            self.max_cost,
        )
    }
}

fn default_window() -> usize {
    7
}

/// Bounds on how many days of `shift` fall inside each `window`-day block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoundedSumRule {
    pub shift: usize,
    pub hard_min: usize,
    pub soft_min: usize,
    pub min_cost: i64,
    pub soft_max: usize,
    pub hard_max: usize,
    pub max_cost: i64,
    #[serde(default = "default_window")]
    pub window: usize,
}

impl BoundedSumRule {
    pub fn label(&self) -> String {
        format!("sum rule on shift {}", self.shift)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(ScheduleError::config(
                self.label(),
                "window",
                "must be at least one day",
            ));
        }
        check_bounds(
            &self.label(),
            (self.hard_min, self.soft_min, self.soft_max, self.hard_max),
            self.min_cost,
            self.max_cost,
        )?;
        if self.hard_max > self.window {
            return Err(ScheduleError::config(
                self.label(),
                "hard_max",
                format!(
                    "({}) exceeds the window length ({})",
                    self.hard_max, self.window
                ),
            ));
        }
        Ok(())
    }
}

/// `previous` on day d followed by `next` on day d+1; a zero cost forbids it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransitionRule {
    pub previous: usize,
    pub next: usize,
    pub cost: i64,
}

impl TransitionRule {
    pub fn label(&self) -> String {
        format!("transition rule {} -> {}", self.previous, self.next)
    }

    pub fn is_forbidden(&self) -> bool {
        self.cost == 0
    }

    pub fn validate(&self, num_shifts: usize) -> Result<()> {
        check_index("shift", self.previous, num_shifts)?;
        check_index("shift", self.next, num_shifts)?;
        if self.cost < 0 {
            return Err(ScheduleError::config(
                self.label(),
                "cost",
                format!("must not be negative (got {})", self.cost),
            ));
        }
        Ok(())
    }
}

/// Minimum headcount of `shift` per day of the week, with a per-unit cost on overstaffing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CoverageDemand {
    pub shift: usize,
    /// Indexed by day of the week, Monday first
    pub weekly_minimum: Vec<usize>,
    #[serde(default)]
    pub excess_cost: i64,
}

impl CoverageDemand {
    pub fn label(&self) -> String {
        format!("coverage demand on shift {}", self.shift)
    }

    pub fn minimum_on(&self, day_of_week: usize) -> usize {
        self.weekly_minimum.get(day_of_week).copied().unwrap_or(0)
    }

    pub fn validate(&self, num_employees: usize, days_per_week: usize) -> Result<()> {
        if self.weekly_minimum.len() != days_per_week {
            return Err(ScheduleError::config(
                self.label(),
                "weekly_minimum",
                format!(
                    "has {} entries, expected one per day of the week ({})",
                    self.weekly_minimum.len(),
                    days_per_week
                ),
            ));
        }
        if let Some(&too_many) = self.weekly_minimum.iter().find(|&&m| m > num_employees) {
            return Err(ScheduleError::config(
                self.label(),
                "weekly_minimum",
                format!(
                    "demands {} employees but only {} exist",
                    too_many, num_employees
                ),
            ));
        }
        if self.excess_cost < 0 {
            return Err(ScheduleError::config(
                self.label(),
                "excess_cost",
                format!("must not be negative (got {})", self.excess_cost),
            ));
        }
        Ok(())
    }
}

/// Shared checks for the (hard_min, soft_min, soft_max, hard_max) bound family
fn check_bounds(
    rule: &str,
    (hard_min, soft_min, soft_max, hard_max): (usize, usize, usize, usize),
    min_cost: i64,
    max_cost: i64,
) -> Result<()> {
    if hard_min > hard_max {
        return Err(ScheduleError::config(
            rule,
            "hard_min",
            format!("({}) exceeds hard_max ({})", hard_min, hard_max),
        ));
    }
    if !(hard_min..=hard_max).contains(&soft_min) {
        return Err(ScheduleError::config(
            rule,
            "soft_min",
            format!(
                "({}) lies outside the hard range [{}, {}]",
                soft_min, hard_min, hard_max
            ),
        ));
    }
    if !(hard_min..=hard_max).contains(&soft_max) {
        return Err(ScheduleError::config(
            rule,
            "soft_max",
            format!(
                "({}) lies outside the hard range [{}, {}]",
                soft_max, hard_min, hard_max
            ),
        ));
    }
    if min_cost < 0 {
        return Err(ScheduleError::config(
            rule,
            "min_cost",
            format!("must not be negative (got {})", min_cost),
        ));
    }
    if max_cost < 0 {
        return Err(ScheduleError::config(
            rule,
            "max_cost",
            format!("must not be negative (got {})", max_cost),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn night_runs() -> BoundedRunRule {
        BoundedRunRule {
            shift: 3,
            hard_min: 1,
            soft_min: 2,
            min_cost: 20,
            soft_max: 3,
            hard_max: 4,
            max_cost: 5,
        }
    }

    fn field_of(err: ScheduleError) -> &'static str {
        match err {
            ScheduleError::Config { field, .. } => field,
            other => panic!("expected a configuration error, got {other}"),
        }
    }

    #[test]
    fn test_valid_rule_passes() {
        assert!(night_runs().validate().is_ok());
    }

    #[test]
    fn test_inverted_hard_bounds() {
        let rule = BoundedRunRule {
            hard_min: 5,
            ..night_runs()
        };
        assert_eq!(field_of(rule.validate().unwrap_err()), "hard_min");
    }

    #[test]
    fn test_soft_bounds_outside_hard_range() {
        let rule = BoundedRunRule {
            soft_min: 0,
            ..night_runs()
        };
        assert_eq!(field_of(rule.validate().unwrap_err()), "soft_min");

        let rule = BoundedRunRule {
            soft_max: 6,
            ..night_runs()
        };
        assert_eq!(field_of(rule.validate().unwrap_err()), "soft_max");
    }

    #[test]
    fn test_negative_costs() {
        let rule = BoundedRunRule {
            max_cost: -1,
            ..night_runs()
        };
        let err = rule.validate().unwrap_err();
        assert!(err.to_string().contains("run rule on shift 3"));
        assert_eq!(field_of(err), "max_cost");

        let transition = TransitionRule {
            previous: 2,
            next: 3,
            cost: -4,
        };
        assert_eq!(field_of(transition.validate(4).unwrap_err()), "cost");
    }

    #[test]
    fn test_sum_rule_window() {
        let rule = BoundedSumRule {
            shift: 0,
            hard_min: 1,
            soft_min: 2,
            min_cost: 7,
            soft_max: 2,
            hard_max: 3,
            max_cost: 4,
            window: 7,
        };
        assert!(rule.validate().is_ok());
        assert_eq!(
            field_of(BoundedSumRule { window: 0, ..rule }.validate().unwrap_err()),
            "window"
        );
        assert_eq!(
            field_of(BoundedSumRule { window: 2, ..rule }.validate().unwrap_err()),
            "hard_max"
        );
    }

    #[test]
    fn test_transition_shift_out_of_range() {
        let rule = TransitionRule {
            previous: 3,
            next: 9,
            cost: 0,
        };
        assert!(matches!(
            rule.validate(4),
            Err(ScheduleError::Index { index: 9, limit: 4, .. })
        ));
    }

    #[test]
    fn test_coverage_demand_shape() {
        let demand = CoverageDemand {
            shift: 1,
            weekly_minimum: vec![2, 2, 2],
            excess_cost: 2,
        };
        assert_eq!(field_of(demand.validate(8, 7).unwrap_err()), "weekly_minimum");

        let demand = CoverageDemand {
            weekly_minimum: vec![2, 2, 2, 2, 2, 1, 9],
            ..demand
        };
        assert_eq!(field_of(demand.validate(8, 7).unwrap_err()), "weekly_minimum");
    }

    #[test]
    fn test_request_sign() {
        assert_eq!(Request::wants(3, 5, 0, 2).signed_weight(), -2);
        assert_eq!(Request::avoids(2, 4, 3, 4).signed_weight(), 4);
        assert!(Request::avoids(2, 4, 3, -1).validate().is_err());
    }

    #[test]
    fn test_sum_rule_window_defaults_to_a_week() {
        let rule: BoundedSumRule = toml::from_str(
            "shift = 3\nhard_min = 0\nsoft_min = 1\nmin_cost = 3\nsoft_max = 4\nhard_max = 4\nmax_cost = 0\n",
        )
        .unwrap();
        assert_eq!(rule.window, 7);
    }
}
