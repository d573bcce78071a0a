//! Sandfield core engine: platform-agnostic particle field, pointer handling and frame loop.

pub mod config;
pub mod error;
pub mod field;
pub mod frame_loop;
pub mod particle;
pub mod recording;
pub mod simulator;

pub use config::{FieldConfig, FieldProfile};
pub use error::{FieldError, Result};
pub use field::{connection_alpha, particle_count, FrameStats, ParticleField};
pub use frame_loop::{CancelToken, FrameLoop, LoopControl};
pub use particle::Particle;
pub use recording::RecordingSurface;
pub use simulator::{PointerState, Simulator};
