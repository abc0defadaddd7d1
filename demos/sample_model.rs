// Builds the sample instance and writes its model as LP text, without solving.
//
// cargo run --example sample_model > sample.lp

use shiftopt::ShiftProblem;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    shiftopt::logging::init("info");

    let model = ShiftProblem::sample().build_model()?;
    let problem = model.problem();

    eprintln!("Variables:   {}", problem.num_variables());
    eprintln!("Constraints: {}", problem.constraints.len());
    eprintln!("Penalties:   {}", model.penalties().len());

    print!("{}", model);
    Ok(())
}
