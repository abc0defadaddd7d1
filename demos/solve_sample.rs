// Solves the sample instance with each backend under a time limit.
//
// cargo run --example solve_sample --features solvers

use shiftopt::domain::IncumbentLog;
use shiftopt::{ScheduleService, ShiftProblem, SolverBackend, SolverConfig, SolverFactory};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    shiftopt::logging::init("info");
    let problem = ShiftProblem::sample();

    for backend in [SolverBackend::Highs, SolverBackend::CoinCbc] {
        let config = SolverConfig::default()
            .with_backend(backend)
            .with_time_limit(60.0)
            .with_workers(4);
        let service = ScheduleService::new(SolverFactory::create_from_backend(backend));

        println!("=== {} ===", service.solver_name());
        let mut progress = IncumbentLog::default();
        let report = service.schedule(&problem, &config, Some(&mut progress))?;
        println!("{}", report);
        println!("Incumbents reported: {}\n", progress.incumbents.len());
    }

    Ok(())
}
