//! Command-line argument parsing for the noise tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nebula_noise::NoiseType;

use crate::{Config, RenderField};

/// Nebula noise command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "nebula-noise", about = "Deterministic noise renderer and inspector")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hash mixing schedule (shift_xor, balanced, rotational, chacha_quarter, chacha_double).
    #[arg(long)]
    pub noise_type: Option<NoiseType>,

    /// Image width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Fractal octave count.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Base frequency for fractal and cellular fields.
    #[arg(long)]
    pub frequency: Option<f32>,

    /// PNG output path.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// What to do. Defaults to rendering the configured field.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Render a field to a grayscale PNG.
    Render {
        /// Field to render (defaults to `render.field` from the config).
        #[arg(value_enum)]
        field: Option<RenderField>,
    },
    /// Print the value of a field at one coordinate.
    Sample {
        /// Field to sample.
        #[arg(value_enum)]
        field: RenderField,
        /// X coordinate.
        #[arg(allow_negative_numbers = true)]
        x: f32,
        /// Y coordinate.
        #[arg(allow_negative_numbers = true)]
        y: f32,
        /// Z coordinate; samples the 3D field when given.
        #[arg(long, allow_negative_numbers = true)]
        z: Option<f32>,
    },
    /// Run the statistical self-check on every mixing schedule.
    Check {
        /// Samples per measurement.
        #[arg(long, default_value_t = 8192)]
        samples: u64,
    },
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.hash.seed = seed;
        }
        if let Some(kind) = args.noise_type {
            self.hash.noise_type = kind;
        }
        if let Some(w) = args.width {
            self.render.width = w;
        }
        if let Some(h) = args.height {
            self.render.height = h;
        }
        if let Some(octaves) = args.octaves {
            self.fractal.octaves = octaves;
        }
        if let Some(frequency) = args.frequency {
            self.fractal.frequency = frequency;
            self.cellular.frequency = frequency;
        }
        if let Some(ref output) = args.output {
            self.render.output = output.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(Command::Render { field: Some(field) }) = args.command {
            self.render.field = field;
        }
    }
}
