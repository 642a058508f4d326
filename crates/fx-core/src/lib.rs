pub mod catalog;
pub mod config;
pub mod disposer;
pub mod kinetics;
pub mod particles;
pub mod procedural;
pub mod rng;
pub mod spawn;
pub mod surface;

pub static FIRE_WGSL: &str = include_str!("../shaders/fire.wgsl");
pub static RIPPLE_WGSL: &str = include_str!("../shaders/ripple.wgsl");

pub use config::{resolve_effect_config, ConfigError, ConfigValue, Motion};
pub use disposer::Disposable;
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use rng::FxRng;
pub use surface::{NullSurface, Rgba, Surface, TraceSurface};
