//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - layers configuration (defaults, `GROWTH_*` environment, flags)
//! - ingests observations and groups them by species
//! - runs curve fitting + model selection
//! - prints reports/plots
//! - writes optional exports

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Command, FitArgs, SampleArgs};
use crate::config::ModelingConfig;
use crate::data::{SampleConfig, generate_sample};
use crate::domain::GrowthObservation;
use crate::error::AppError;

pub mod pipeline;

use pipeline::SpeciesRun;

/// Entry point for the `growth` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = modeling_config_from_args(ModelingConfig::from_env()?, &args)?;
    let ingest = crate::io::load_observations(&args.input, args.format)?;

    let groups = select_groups(&ingest.observations, args.species.as_deref())?;
    println!("{}", crate::report::format_ingest_summary(&ingest, groups.len()));

    let multi = groups.len() > 1;
    let results = pipeline::run_all(groups, &config);

    let mut first_error = None;
    let mut succeeded = 0usize;
    for (species, result) in results {
        match result {
            Ok(run) => {
                print_run(&run, &args);
                write_exports(&run, &args, multi)?;
                succeeded += 1;
            }
            Err(err) => {
                warn!(species = %species, error = %err, "modeling failed");
                eprintln!("{species}: {err}");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) if succeeded == 0 => Err(err.into()),
        _ => Ok(()),
    }
}

/// Apply CLI overrides on top of the environment-derived config.
pub fn modeling_config_from_args(mut config: ModelingConfig, args: &FitArgs) -> Result<ModelingConfig, AppError> {
    if let Some(rate) = args.logistic_rate {
        config.logistic_rate = rate;
    }
    if let Some(multiplier) = args.capacity_multiplier {
        config.capacity_multiplier = multiplier;
    }
    if let Some(horizon) = args.horizon {
        config.horizon = horizon;
    }
    if let Some(order) = args.order {
        config.order = order;
    }
    config.validate()?;
    Ok(config)
}

fn select_groups(
    observations: &[GrowthObservation],
    species: Option<&str>,
) -> Result<Vec<(String, Vec<GrowthObservation>)>, AppError> {
    match species {
        Some(name) => {
            let filtered = crate::io::filter_species(observations, name);
            let Some(first) = filtered.first() else {
                return Err(AppError::new(3, format!("No observations for species '{name}'.")));
            };
            Ok(vec![(first.species_name.clone(), filtered)])
        }
        None => Ok(crate::io::group_by_species(observations)),
    }
}

fn print_run(run: &SpeciesRun, args: &FitArgs) {
    println!("{}", crate::report::format_report_summary(&run.species, &run.report));

    let best = run.report.best_model();
    println!("{}", crate::report::format_predictions(best, args.show_predictions));

    if !args.no_plot {
        let plot = crate::plot::render_ascii_plot(&run.observations, best, args.width, args.height);
        println!("{plot}");
    }
}

fn write_exports(run: &SpeciesRun, args: &FitArgs, multi: bool) -> Result<(), AppError> {
    let generated_at = Local::now();

    if let Some(path) = &args.export_predictions {
        let path = path_for_species(path, &run.species, multi);
        let mut out = crate::io::create_output(&path)?;
        crate::io::write_predictions_csv(&mut out, run.report.best_model())?;
        flush(&mut out, &path)?;
        info!(path = %path.display(), "wrote predictions");
    }
    if let Some(path) = &args.export_report {
        let path = path_for_species(path, &run.species, multi);
        let mut out = crate::io::create_output(&path)?;
        crate::io::write_report_json(&mut out, &run.species, &run.report, generated_at)?;
        flush(&mut out, &path)?;
        info!(path = %path.display(), "wrote report");
    }
    if let Some(path) = &args.export_html {
        let path = path_for_species(path, &run.species, multi);
        let html = crate::io::render_html_report(&run.species, &run.observations, &run.report, generated_at);
        let mut out = crate::io::create_output(&path)?;
        out.write_all(html.as_bytes())
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
        flush(&mut out, &path)?;
        info!(path = %path.display(), "wrote HTML report");
    }
    Ok(())
}

fn flush(out: &mut impl Write, path: &Path) -> Result<(), AppError> {
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))
}

/// With several species, insert the species name into the file stem:
/// `out/pred.csv` becomes `out/pred_atlantic_salmon.csv`.
pub fn path_for_species(path: &Path, species: &str, multi: bool) -> PathBuf {
    if !multi {
        return path.to_path_buf();
    }
    let slug: String = species
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{slug}.{ext}"),
        None => format!("{stem}_{slug}"),
    };
    path.with_file_name(file_name)
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        species: args.species,
        count: args.count,
        interval: args.interval,
        seed: args.seed,
        noise: args.noise,
        ..SampleConfig::default()
    };
    let observations = generate_sample(&config)?;

    match &args.output {
        Some(path) => {
            let out = crate::io::create_output(path)?;
            write_sample_csv(out, &observations)?;
            info!(path = %path.display(), rows = observations.len(), "wrote sample");
        }
        None => write_sample_csv(std::io::stdout().lock(), &observations)?,
    }
    Ok(())
}

/// Write observations in the same layout `fit` reads.
pub fn write_sample_csv<W: Write>(out: W, observations: &[GrowthObservation]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    for o in observations {
        wtr.serialize(o)
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationOrder;

    fn fit_args(extra: &[&str]) -> FitArgs {
        let mut argv = vec!["growth", "fit", "-i", "data.csv"];
        argv.extend_from_slice(extra);
        match crate::cli::Cli::parse_from(argv).command {
            Command::Fit(args) => args,
            Command::Sample(_) => unreachable!(),
        }
    }

    #[test]
    fn cli_flags_override_config() {
        let base = ModelingConfig {
            horizon: 5,
            ..ModelingConfig::default()
        };
        let args = fit_args(&["--logistic-rate", "0.2", "--order", "time"]);
        let config = modeling_config_from_args(base, &args).unwrap();
        assert_eq!(config.logistic_rate, 0.2);
        assert_eq!(config.horizon, 5);
        assert_eq!(config.order, ObservationOrder::Time);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = fit_args(&["--horizon", "0"]);
        let err = modeling_config_from_args(ModelingConfig::default(), &args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn species_paths_only_change_for_multi_species_runs() {
        let p = Path::new("out/pred.csv");
        assert_eq!(path_for_species(p, "Atlantic Salmon", false), PathBuf::from("out/pred.csv"));
        assert_eq!(
            path_for_species(p, "Atlantic Salmon", true),
            PathBuf::from("out/pred_atlantic_salmon.csv")
        );
        assert_eq!(path_for_species(Path::new("report"), "cod", true), PathBuf::from("report_cod"));
    }

    #[test]
    fn unknown_species_is_an_error() {
        let obs = vec![GrowthObservation::new("cod", 0.0, 1.0)];
        let err = select_groups(&obs, Some("halibut")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        let groups = select_groups(&obs, Some("COD")).unwrap();
        assert_eq!(groups[0].0, "cod");
    }

    #[test]
    fn sample_csv_round_trips_through_ingest() {
        let obs = generate_sample(&SampleConfig {
            count: 4,
            ..SampleConfig::default()
        })
        .unwrap();
        let mut buf = Vec::new();
        write_sample_csv(&mut buf, &obs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("species_name,time_point,length\n"));

        let ingest = crate::io::read_observations_csv(text.as_bytes()).unwrap();
        assert_eq!(ingest.observations, obs);
    }
}
