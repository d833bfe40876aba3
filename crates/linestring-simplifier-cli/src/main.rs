mod error;
mod input;
mod logging;
mod settings;

use error::CliError;
use linestring_simplifier_lib::{Geometry, SimplificationEngine};
use settings::{Command, Settings};
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = Settings::from_cli();
    logging::setup_logging(settings.verbose);

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<(), CliError> {
    let geometry = input::load_geometry(settings.command.input())?;
    let output = execute(&settings.command, &geometry)?;
    write_output(&output, settings)
}

/// Run one subcommand against an already loaded geometry
fn execute(command: &Command, geometry: &Geometry) -> Result<serde_json::Value, CliError> {
    let engine = SimplificationEngine::new(command.detection().to_options());

    let value = match command {
        Command::Simplify {
            max_coordinates, ..
        } => {
            let result = engine.simplify(geometry, *max_coordinates)?;
            for warning in &result.warnings {
                tracing::warn!("{}", warning);
            }
            tracing::info!(
                original = result.original_count,
                simplified = result.simplified_count,
                length_preserved = result.length_preserved,
                "Simplified geometry"
            );
            serde_json::to_value(result)?
        }
        Command::Analyze { .. } => {
            let analysis = engine.analyze(geometry);
            if let Some(error) = &analysis.error {
                tracing::warn!("Geometry is not valid: {}", error);
            }
            serde_json::to_value(analysis)?
        }
        Command::Preview { options, .. } => serde_json::to_value(engine.preview(geometry, options)?)?,
    };
    Ok(value)
}

fn write_output(value: &serde_json::Value, settings: &Settings) -> Result<(), CliError> {
    let text = if settings.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match &settings.output {
        Some(path) => {
            std::fs::write(path, text + "\n").map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
