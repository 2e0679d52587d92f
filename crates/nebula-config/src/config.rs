//! Configuration structs with sensible defaults and RON persistence.

use std::fmt;
use std::path::{Path, PathBuf};

use nebula_noise::{
    CellularParams, DistanceMetric, FractalParams, NoiseType, UberParams, WarpParams,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration for the noise tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed, mixing schedule and word width.
    pub hash: HashConfig,
    /// Octave settings for fBm, billow and ridge fields.
    pub fractal: FractalParams,
    /// Cellular noise settings.
    pub cellular: CellularConfig,
    /// First (or only) domain warp.
    pub warp: WarpParams,
    /// Extra settings for the composite field.
    pub uber: UberConfig,
    /// Image output settings.
    pub render: RenderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Hash word width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashWidth {
    /// 32-bit words.
    W32,
    /// 64-bit words.
    #[default]
    W64,
}

impl HashWidth {
    /// Number of bits.
    pub fn bits(self) -> u32 {
        match self {
            HashWidth::W32 => 32,
            HashWidth::W64 => 64,
        }
    }
}

/// Hashing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HashConfig {
    /// World seed.
    pub seed: u64,
    /// Mixing schedule.
    pub noise_type: NoiseType,
    /// Hash word width.
    pub width: HashWidth,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            noise_type: NoiseType::default(),
            width: HashWidth::W64,
        }
    }
}

/// Named cellular parameter sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellularPreset {
    /// Use the explicit fields of [`CellularConfig`].
    #[default]
    Custom,
    /// [`CellularParams::wormy`].
    Wormy,
    /// [`CellularParams::blocky`].
    Blocky,
}

/// Cellular noise configuration. A preset other than `custom` replaces
/// every explicit field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CellularConfig {
    /// Named parameter set.
    pub preset: CellularPreset,
    /// Cells per unit of input space.
    pub frequency: f32,
    /// Feature displacement, `[0, 1]`.
    pub jitter: f32,
    /// Distance function.
    pub metric: DistanceMetric,
    /// Width of the vein band.
    pub edge_width: f32,
    /// Steepness of the exponential vein.
    pub vein_contrast: f32,
}

impl Default for CellularConfig {
    fn default() -> Self {
        let params = CellularParams::default();
        Self {
            preset: CellularPreset::Custom,
            frequency: params.frequency,
            jitter: params.jitter,
            metric: params.metric,
            edge_width: params.edge_width,
            vein_contrast: params.vein_contrast,
        }
    }
}

impl CellularConfig {
    /// Resolve into core parameters.
    pub fn params(&self) -> CellularParams {
        match self.preset {
            CellularPreset::Wormy => CellularParams::wormy(),
            CellularPreset::Blocky => CellularParams::blocky(),
            CellularPreset::Custom => CellularParams {
                frequency: self.frequency,
                jitter: self.jitter,
                metric: self.metric,
                edge_width: self.edge_width,
                vein_contrast: self.vein_contrast,
            },
        }
    }
}

/// Composite-field settings beyond the shared fractal and first warp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UberConfig {
    /// Finer warp applied after `warp`.
    pub second_warp: WarpParams,
    /// Weight of the subtracted ridge term.
    pub ridge_mix: f32,
    /// Frequency multiplier for the ridge term.
    pub ridge_scale: f32,
}

impl Default for UberConfig {
    fn default() -> Self {
        let params = UberParams::default();
        Self {
            second_warp: params.second_warp,
            ridge_mix: params.ridge_mix,
            ridge_scale: params.ridge_scale,
        }
    }
}

/// Field rendered or sampled by the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RenderField {
    /// Single-octave Perlin noise.
    Perlin,
    /// Single-octave simplex noise.
    Simplex,
    /// Fractional Brownian motion.
    #[default]
    Fbm,
    /// Billow fractal.
    Billow,
    /// Ridge fractal.
    Ridge,
    /// Nearest cellular distance.
    CellularF1,
    /// Cellular `F2 - F1`.
    CellularEdge,
    /// Smooth cellular vein.
    CellularVein,
    /// Domain-warped fBm.
    Warp,
    /// Composite field.
    Uber,
}

impl RenderField {
    /// Every field, in declaration order.
    pub const ALL: [RenderField; 10] = [
        RenderField::Perlin,
        RenderField::Simplex,
        RenderField::Fbm,
        RenderField::Billow,
        RenderField::Ridge,
        RenderField::CellularF1,
        RenderField::CellularEdge,
        RenderField::CellularVein,
        RenderField::Warp,
        RenderField::Uber,
    ];

    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            RenderField::Perlin => "perlin",
            RenderField::Simplex => "simplex",
            RenderField::Fbm => "fbm",
            RenderField::Billow => "billow",
            RenderField::Ridge => "ridge",
            RenderField::CellularF1 => "cellular-f1",
            RenderField::CellularEdge => "cellular-edge",
            RenderField::CellularVein => "cellular-vein",
            RenderField::Warp => "warp",
            RenderField::Uber => "uber",
        }
    }
}

impl fmt::Display for RenderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Image output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Noise-space units spanned by the image width.
    pub scale: f32,
    /// PNG output path.
    pub output: PathBuf,
    /// Worker threads (0 = one per CPU).
    pub threads: usize,
    /// Field rendered when none is given on the command line.
    pub field: RenderField,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            scale: 8.0,
            output: PathBuf::from("noise.png"),
            threads: 0,
            field: RenderField::Fbm,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Conversions into core parameters ---

impl Config {
    /// Octave settings for fractal fields.
    pub fn fractal_params(&self) -> FractalParams {
        self.fractal
    }

    /// Cellular settings after preset resolution.
    pub fn cellular_params(&self) -> CellularParams {
        self.cellular.params()
    }

    /// Domain warp settings.
    pub fn warp_params(&self) -> WarpParams {
        self.warp
    }

    /// Composite-field settings assembled from `fractal`, `warp` and `uber`.
    pub fn uber_params(&self) -> UberParams {
        UberParams {
            fractal: self.fractal,
            warp: self.warp,
            second_warp: self.uber.second_warp,
            ridge_mix: self.uber.ridge_mix,
            ridge_scale: self.uber.ridge_scale,
        }
    }
}

/// Default configuration directory: `<platform config dir>/nebula-noise`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("nebula-noise"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.clone(),
                source,
            })?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
            path: config_path.clone(),
            source,
        })?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
