// Application service: assemble a scheduling instance, hand it to a solver
// backend, and read the result back as a schedule.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{ProgressListener, SolverConfig, SolverService};
use crate::scheduling::{build_model, Result, ScheduleReport, ShiftModel, ShiftProblem};

pub struct ScheduleService {
    solver: Arc<dyn SolverService>,
}

impl ScheduleService {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self { solver }
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Builds the model without solving it
    pub fn assemble(&self, problem: &ShiftProblem, config: &SolverConfig) -> Result<ShiftModel> {
        build_model(problem, config.clone())
    }

    /// Single synchronous handoff to the backend; its status is passed through unchanged
    pub fn solve(
        &self,
        model: &ShiftModel,
        listener: Option<&mut dyn ProgressListener>,
    ) -> Result<ScheduleReport> {
        info!(
            event = "solve_start",
            solver = self.solver.name(),
            variables = model.problem().num_variables(),
            constraints = model.problem().constraints.len(),
        );

        let solution = self.solver.solve_with_listener(model.problem(), listener)?;

        info!(
            event = "solve_end",
            status = %solution.status,
            objective = ?solution.optimal_value,
            time_ms = solution.statistics.solve_time_ms,
        );
        if solution.is_feasible() && !solution.quality.is_within_tolerance() {
            warn!(
                event = "solution_violates_rows",
                max_violation = solution.quality.max_constraint_violation,
            );
        }

        Ok(ScheduleReport::from_solution(model, &solution))
    }

    pub fn schedule(
        &self,
        problem: &ShiftProblem,
        config: &SolverConfig,
        listener: Option<&mut dyn ProgressListener>,
    ) -> Result<ScheduleReport> {
        let model = self.assemble(problem, config)?;
        self.solve(&model, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Incumbent, IncumbentLog, OptimizationProblem, Solution, SolutionQuality, SolutionStatus,
        SolverError, SolverStatistics,
    };
    use crate::scheduling::ScheduleError;
    use std::time::Duration;

    /// Backend that answers with a fixed status, reporting one incumbent when feasible
    struct CannedSolver {
        status: SolutionStatus,
    }

    impl SolverService for CannedSolver {
        fn solve_with_listener(
            &self,
            problem: &OptimizationProblem,
            listener: Option<&mut dyn ProgressListener>,
        ) -> crate::domain::Result<Solution> {
            self.validate(problem)?;
            match self.status {
                SolutionStatus::Error => Err(SolverError::ExecutionFailed("crashed".to_string())),
                SolutionStatus::Optimal => {
                    let values = vec![0.0; problem.num_variables()];
                    if let Some(listener) = listener {
                        listener.on_incumbent(&Incumbent {
                            objective_value: 0.0,
                            best_bound: Some(0.0),
                            elapsed: Duration::ZERO,
                            solution_count: 1,
                        });
                    }
                    Ok(Solution::optimal(0.0, values)
                        .with_statistics(SolverStatistics::for_problem(problem)))
                }
                SolutionStatus::Feasible => {
                    let values = vec![0.0; problem.num_variables()];
                    let quality = SolutionQuality::measure(problem, &values);
                    Ok(Solution::feasible(0.0, values).with_quality(quality))
                }
                status => Ok(Solution::new(status, "canned")),
            }
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn supports_mip(&self) -> bool {
            true
        }
    }

    fn service(status: SolutionStatus) -> ScheduleService {
        ScheduleService::new(Arc::new(CannedSolver { status }))
    }

    #[test]
    fn test_status_passes_through() {
        for status in [SolutionStatus::Infeasible, SolutionStatus::Unknown] {
            let report = service(status)
                .schedule(&ShiftProblem::sample(), &SolverConfig::default(), None)
                .unwrap();
            assert_eq!(report.status, status);
            assert!(report.assignments.is_empty());
        }
    }

    #[test]
    fn test_unverified_feasible_result_is_reported_unchanged() {
        crate::logging::init_test();
        let report = service(SolutionStatus::Feasible)
            .schedule(&ShiftProblem::sample(), &SolverConfig::default(), None)
            .unwrap();
        // All-zero values break the exactly-one rows; the status is still passed through.
        assert_eq!(report.status, SolutionStatus::Feasible);
        assert!(!report.assignments.is_empty());
    }

    #[test]
    fn test_solver_failure_is_not_retried() {
        let err = service(SolutionStatus::Error)
            .schedule(&ShiftProblem::sample(), &SolverConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Solver(SolverError::ExecutionFailed(_))));
    }

    #[test]
    fn test_listener_sees_incumbents() {
        crate::logging::init_test();
        let service = service(SolutionStatus::Optimal);
        let model = service
            .assemble(&ShiftProblem::sample(), &SolverConfig::default().with_time_limit(5.0))
            .unwrap();
        assert_eq!(model.problem().solver_config.time_limit, Some(5.0));

        let mut log = IncumbentLog::default();
        let report = service.solve(&model, Some(&mut log)).unwrap();
        assert_eq!(log.incumbents.len(), 1);
        assert_eq!(report.status, SolutionStatus::Optimal);
        assert_eq!(report.statistics.num_variables as usize, model.problem().num_variables());
    }
}
