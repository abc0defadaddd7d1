// Bounds on how often a shift occurs inside a fixed window of days.

use crate::domain::{ConstraintType, VarId};

use crate::scheduling::context::ModelContext;
use crate::scheduling::error::{Result, ScheduleError};
use crate::scheduling::penalty::PenaltyTerm;
use crate::scheduling::rules::BoundedSumRule;

/// Constrains the number of true entries of `works` to the rule's bounds.
///
/// The count is an integer column in `[hard_min, hard_max]`. Shortfall below
/// `soft_min` and excess above `soft_max` become integer penalty columns
/// clamped at zero. Their ranges are sized to `works.len()`.
pub fn add_window_sum_constraint(
    ctx: &mut ModelContext,
    works: &[VarId],
    rule: &BoundedSumRule,
    basename: &str,
) -> Result<Vec<PenaltyTerm>> {
    rule.validate()?;
    let window = works.len() as i64;
    if rule.hard_max as i64 > window {
        return Err(ScheduleError::config(
            rule.label(),
            "hard_max",
            format!("({}) exceeds the {}-day slice", rule.hard_max, window),
        ));
    }

    let mut penalties = Vec::new();
    let sum = ctx.new_int(
        rule.hard_min as i64,
        rule.hard_max as i64,
        format!("{}: sum", basename),
    );
    let mut count: Vec<_> = works.iter().map(|&v| (v, 1.0)).collect();
    count.push((sum, -1.0));
    ctx.add_linear(count, ConstraintType::Equal, 0.0, format!("{}: count", basename));

    if rule.soft_min > rule.hard_min && rule.min_cost > 0 {
        // delta = soft_min - sum
        let name = format!("{}: under_sum", basename);
        let delta = ctx.new_int(-window, window, format!("{}: under_delta", basename));
        ctx.add_linear(
            vec![(delta, 1.0), (sum, 1.0)],
            ConstraintType::Equal,
            rule.soft_min as f64,
            format!("{}: under_delta", basename),
        );
        let excess = ctx.new_int(0, window, name.clone());
        ctx.add_max_with_zero(excess, delta, -window, window, &name);
        penalties.push(PenaltyTerm::int(excess, rule.min_cost));
    }

    if rule.soft_max < rule.hard_max && rule.max_cost > 0 {
        // delta = sum - soft_max
        let name = format!("{}: over_sum", basename);
        let delta = ctx.new_int(-window, window, format!("{}: over_delta", basename));
        ctx.add_linear(
            vec![(delta, 1.0), (sum, -1.0)],
            ConstraintType::Equal,
            -(rule.soft_max as f64),
            format!("{}: over_delta", basename),
        );
        let excess = ctx.new_int(0, window, name.clone());
        ctx.add_max_with_zero(excess, delta, -window, window, &name);
        penalties.push(PenaltyTerm::int(excess, rule.max_cost));
    }

    Ok(penalties)
}
