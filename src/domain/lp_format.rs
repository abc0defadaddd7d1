// Text rendering of an optimization problem in CPLEX LP syntax.
// Columns are written as `x<index>`; descriptive names go into `\` comments.

use std::fmt;

use super::models::{LinearTerm, OptimizationProblem};
use super::value_objects::{OptimizationType, VariableType};

/// Borrowing view that renders a problem with `Display`
pub struct LpFormat<'a>(pub &'a OptimizationProblem);

impl OptimizationProblem {
    /// Render the problem without solving it
    pub fn to_lp_string(&self) -> String {
        LpFormat(self).to_string()
    }
}

fn write_expression(f: &mut fmt::Formatter<'_>, terms: &[LinearTerm]) -> fmt::Result {
    if terms.is_empty() {
        return write!(f, " 0");
    }
    for (i, &(var, coeff)) in terms.iter().enumerate() {
        let sign = if coeff < 0.0 { "-" } else { "+" };
        let magnitude = coeff.abs();
        if i == 0 && sign == "+" {
            write!(f, " ")?;
        } else {
            write!(f, " {} ", sign)?;
        }
        if magnitude == 1.0 {
            write!(f, "{}", var)?;
        } else {
            write!(f, "{} {}", magnitude, var)?;
        }
    }
    Ok(())
}

impl fmt::Display for LpFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problem = self.0;

        if !problem.name.is_empty() {
            writeln!(f, "\\ Problem: {}", problem.name)?;
        }
        if !problem.description.is_empty() {
            writeln!(f, "\\ {}", problem.description)?;
        }
        for (i, var) in problem.variables.iter().enumerate() {
            if !var.name.is_empty() {
                writeln!(f, "\\ x{} = {}", i, var.name)?;
            }
        }

        match problem.objective.optimization_type {
            OptimizationType::Minimize => writeln!(f, "Minimize")?,
            OptimizationType::Maximize => writeln!(f, "Maximize")?,
        }
        write!(f, " obj:")?;
        write_expression(f, &problem.objective.terms)?;
        writeln!(f)?;

        writeln!(f, "Subject To")?;
        for (i, constraint) in problem.constraints.iter().enumerate() {
            if !constraint.name.is_empty() {
                writeln!(f, " \\ {}", constraint.name)?;
            }
            write!(f, " r{}:", i)?;
            write_expression(f, &constraint.terms)?;
            writeln!(
                f,
                " {} {}",
                constraint.constraint_type.symbol(),
                constraint.bound
            )?;
        }

        writeln!(f, "Bounds")?;
        for (i, var) in problem.variables.iter().enumerate() {
            if var.variable_type == VariableType::Binary {
                continue;
            }
            match var.upper_bound {
                Some(upper) => writeln!(f, " {} <= x{} <= {}", var.lower_bound, i, upper)?,
                None => writeln!(f, " x{} >= {}", i, var.lower_bound)?,
            }
        }

        let generals: Vec<usize> = column_indices(problem, VariableType::Integer);
        if !generals.is_empty() {
            writeln!(f, "General")?;
            write_columns(f, &generals)?;
        }
        let binaries: Vec<usize> = column_indices(problem, VariableType::Binary);
        if !binaries.is_empty() {
            writeln!(f, "Binary")?;
            write_columns(f, &binaries)?;
        }

        writeln!(f, "End")
    }
}

fn column_indices(problem: &OptimizationProblem, kind: VariableType) -> Vec<usize> {
    problem
        .variables
        .iter()
        .enumerate()
        .filter(|(_, v)| v.variable_type == kind)
        .map(|(i, _)| i)
        .collect()
}

fn write_columns(f: &mut fmt::Formatter<'_>, columns: &[usize]) -> fmt::Result {
    for chunk in columns.chunks(10) {
        for i in chunk {
            write!(f, " x{}", i)?;
        }
        writeln!(f)?;
    }
    Ok(())
}
