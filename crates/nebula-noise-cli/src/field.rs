//! Builds the generator selected on the command line.

use nebula_config::{Config, HashWidth, RenderField};
use nebula_noise::{
    Cellular, CellularOutput, DomainWarp, Fractal, FractalKind, HashWord, NoiseField,
    NoiseHasher, Perlin, Simplex, Uber,
};

/// Generator for `field`, using the seed, schedule and width from `config`.
pub fn build_field(config: &Config, field: RenderField) -> Box<dyn NoiseField> {
    match config.hash.width {
        HashWidth::W32 => build::<u32>(config, field),
        HashWidth::W64 => build::<u64>(config, field),
    }
}

fn build<W: HashWord>(config: &Config, field: RenderField) -> Box<dyn NoiseField> {
    let hasher = NoiseHasher::<W>::new(W::from_u64(config.hash.seed), config.hash.noise_type);
    let fractal = config.fractal_params();
    let cellular = config.cellular_params();

    match field {
        RenderField::Perlin => Box::new(Perlin::new(hasher)),
        RenderField::Simplex => Box::new(Simplex::new(hasher)),
        RenderField::Fbm => Box::new(Fractal::new(hasher, fractal, FractalKind::Fbm)),
        RenderField::Billow => Box::new(Fractal::new(hasher, fractal, FractalKind::Billow)),
        RenderField::Ridge => Box::new(Fractal::new(hasher, fractal, FractalKind::Ridge)),
        RenderField::CellularF1 => Box::new(Cellular::new(hasher, cellular, CellularOutput::F1)),
        RenderField::CellularEdge => {
            Box::new(Cellular::new(hasher, cellular, CellularOutput::Edge))
        }
        RenderField::CellularVein => {
            Box::new(Cellular::new(hasher, cellular, CellularOutput::Vein))
        }
        RenderField::Warp => Box::new(DomainWarp::new(
            hasher,
            config.warp_params(),
            fractal,
            FractalKind::Fbm,
        )),
        RenderField::Uber => Box::new(Uber::new(hasher, config.uber_params())),
    }
}
