//! Configuration for the nebula noise tool.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line via clap. Every section is `#[serde(default)]`, so files
//! written by older or newer versions still load.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, Command};
pub use config::{
    CellularConfig, CellularPreset, Config, DebugConfig, HashConfig, HashWidth, RenderConfig,
    RenderField, UberConfig, default_config_dir,
};
pub use error::ConfigError;
