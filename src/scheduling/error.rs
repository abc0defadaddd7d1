use crate::domain::SolverError;

/// Errors raised while assembling or solving a shift-scheduling model
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid {rule}: `{field}` {reason}")]
    Config {
        rule: String,
        field: &'static str,
        reason: String,
    },

    #[error("{what} index {index} out of range (must be below {limit})")]
    Index {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl ScheduleError {
    pub(crate) fn config(
        rule: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        ScheduleError::Config {
            rule: rule.into(),
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Fails with [`ScheduleError::Index`] unless `index < limit`
pub(crate) fn check_index(what: &'static str, index: usize, limit: usize) -> Result<()> {
    if index < limit {
        Ok(())
    } else {
        Err(ScheduleError::Index { what, index, limit })
    }
}
