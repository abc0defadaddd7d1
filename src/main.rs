use shiftopt::domain::IncumbentLog;
use shiftopt::{logging, AppConfig, ScheduleService, ShiftProblem, SolverFactory};

const DEFAULT_CONFIG: &str = "shiftopt.toml";

// Usage: shiftopt [instance.toml] [config.toml]
// Without an instance the built-in sample is solved; the config defaults to ./shiftopt.toml if present.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let instance_path = args.next();
    let config = match args.next() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_or_default(DEFAULT_CONFIG)?,
    };
    logging::init(&config.logging.filter);

    let problem = match instance_path {
        Some(path) => ShiftProblem::load(path)?,
        None => ShiftProblem::sample(),
    };

    let solver = SolverFactory::create_from_backend(config.solver.backend);
    let service = ScheduleService::new(solver);
    tracing::info!(event = "start", instance = %problem.name, solver = service.solver_name());

    let mut progress = IncumbentLog::default();
    let report = service.schedule(&problem, &config.solver, Some(&mut progress))?;

    println!("{}", report);
    Ok(())
}
