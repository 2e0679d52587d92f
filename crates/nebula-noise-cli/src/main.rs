//! `nebula-noise`: render, sample and self-check the noise library.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.

mod check;
mod field;
mod render;

use std::process::ExitCode;

use clap::Parser;
use glam::{Vec2, Vec3};
use nebula_config::{CliArgs, Command, Config, default_config_dir};
use nebula_noise::grid::GridSpec;
use tracing::{error, info};

use crate::render::RenderError;

/// Failures that end the process with a non-zero status.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("quality check failed for at least one noise type")]
    CheckFailed,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    nebula_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    info!(
        seed = config.hash.seed,
        noise_type = %config.hash.noise_type,
        bits = config.hash.width.bits(),
        "nebula-noise starting"
    );

    let command = args.command.unwrap_or(Command::Render { field: None });
    match run(&config, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: Command) -> Result<(), CliError> {
    match command {
        Command::Render { field } => {
            let field = field.unwrap_or(config.render.field);
            let generator = field::build_field(config, field);
            let render = &config.render;
            let spec = GridSpec::centered(render.width, render.height, Vec2::ZERO, render.scale);
            info!(%field, width = render.width, height = render.height, "rendering");
            let summary = render::render_to_file(generator.as_ref(), &spec, render.threads, &render.output)?;
            info!(
                min = summary.range.min,
                max = summary.range.max,
                mean = summary.range.mean,
                threads = summary.threads,
                "render complete"
            );
            Ok(())
        }
        Command::Sample { field, x, y, z } => {
            let generator = field::build_field(config, field);
            let value = match z {
                Some(z) => generator.sample_3d(Vec3::new(x, y, z)),
                None => generator.sample_2d(Vec2::new(x, y)),
            };
            println!("{value}");
            Ok(())
        }
        Command::Check { samples } => {
            if check::run_check(samples) {
                Ok(())
            } else {
                Err(CliError::CheckFailed)
            }
        }
    }
}
