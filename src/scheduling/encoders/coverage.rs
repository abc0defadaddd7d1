// Minimum staffing per day and shift, with a per-unit cost on overstaffing.

use crate::domain::{ConstraintType, VarId};

use crate::scheduling::context::{AssignmentGrid, ModelContext};
use crate::scheduling::error::{check_index, Result, ScheduleError};
use crate::scheduling::penalty::PenaltyTerm;
use crate::scheduling::rules::CoverageDemand;

/// Counts `works` into a column bounded below by `min_demand`.
///
/// Understaffing is infeasible. With a positive `excess_cost`, each assignment
/// beyond the minimum is charged through an integer excess column.
pub fn add_cover_constraint(
    ctx: &mut ModelContext,
    works: &[VarId],
    min_demand: usize,
    excess_cost: i64,
    name: &str,
) -> Option<PenaltyTerm> {
    let headcount = works.len() as i64;
    let demand = min_demand as i64;

    let worked = ctx.new_int(demand, headcount, format!("{}: worked", name));
    let mut count: Vec<_> = works.iter().map(|&v| (v, 1.0)).collect();
    count.push((worked, -1.0));
    ctx.add_linear(count, ConstraintType::Equal, 0.0, format!("{}: count", name));

    if excess_cost <= 0 {
        return None;
    }
    let excess = ctx.new_int(0, headcount - demand, name.to_string());
    ctx.add_linear(
        vec![(excess, 1.0), (worked, -1.0)],
        ConstraintType::Equal,
        -(demand as f64),
        format!("{}: excess", name),
    );
    Some(PenaltyTerm::int(excess, excess_cost))
}

/// Applies `demand` on every day of every week of the horizon
pub fn add_coverage_constraints(
    ctx: &mut ModelContext,
    grid: &AssignmentGrid,
    demand: &CoverageDemand,
    off_shift: usize,
    days_per_week: usize,
) -> Result<Vec<PenaltyTerm>> {
    check_index("shift", demand.shift, grid.num_shifts())?;
    if demand.shift == off_shift {
        return Err(ScheduleError::config(
            demand.label(),
            "shift",
            "cannot be the off shift",
        ));
    }
    demand.validate(grid.num_employees(), days_per_week)?;

    let mut penalties = Vec::new();
    let num_weeks = grid.num_days() / days_per_week;
    for w in 0..num_weeks {
        for d in 0..days_per_week {
            let day = w * days_per_week + d;
            let works = grid.employees_on(demand.shift, day);
            let name = format!(
                "excess_demand(shift={}, week={}, day={})",
                demand.shift, w, d
            );
            penalties.extend(add_cover_constraint(
                ctx,
                &works,
                demand.minimum_on(d),
                demand.excess_cost,
                &name,
            ));
        }
    }

    Ok(penalties)
}
