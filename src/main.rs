use std::error::Error;
use std::path::PathBuf;

use colored::*;

use petrel::input::*;
use petrel::output::*;
use petrel::*;

fn main() -> Result<(), Box<dyn Error>> {
    let runtime = std::time::Instant::now();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(InputError::file())?;

    println!("{} configuration from {}...", "Reading".bold().cyan(), path.display().to_string().bold().blue());

    let mut input = Config::from_file(&path)?;
    input.with_context("constants")?;

    let detector = input.detector()?;
    let settings = input.sampler()?;
    let accuracy = input.accuracy()?;
    let query = input.probe()?;
    let spec = input.table(&detector)?;

    println!("\t* {}", detector);
    println!("\t* {} trial rays, seed = {}", settings.trials, settings.seed);

    let model = OpticalModel::new(detector, settings, accuracy);

    if let Some(ProbeQuery {vertex, pmt}) = query {
        println!("{} vertex at {} m, PMT at {}...", "Probing".bold().cyan(), vertex, pmt);
        let sample = model.grid_sample(vertex, pmt)?;
        println!("\t* direct:    p = {:.6e}, <t> = {}, std = {}",
            sample.direct_probability, ArrivalTime(sample.direct_mean_time), ArrivalTime(sample.direct_std_time));
        println!("\t* reflected: p = {:.6e}, <t> = {}, std = {}",
            sample.reflected_probability, ArrivalTime(sample.reflected_mean_time), ArrivalTime(sample.reflected_std_time));
        println!("\t* naive:     p = {:.6e}", model.naive_probability(vertex, pmt));
    }

    if let Some(spec) = spec {
        let filename = input.output_file()?;
        println!(
            "{} probe table, {} x {} nodes on {} threads...",
            "Building".bold().cyan(),
            spec.radii(detector.ls_radius).len(), spec.thetas().len(), spec.threads,
        );
        let table = ProbeTable::build(&model, &spec)?;
        write_table(&table, &filename)?;
        println!("{} probe table to {}.", "Written".bold().bright_green(), filename.bold().blue());
    }

    println!("{}, running time = {}.", "Finished".bold().bright_green(), PrettyDuration::from(runtime.elapsed()));

    Ok(())
}
