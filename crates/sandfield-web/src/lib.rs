//! Browser host for the particle field: a full-viewport, pointer-transparent
//! canvas behind the page content, animated with `requestAnimationFrame`.

pub mod viewport;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod listeners;
#[cfg(target_arch = "wasm32")]
mod scheduler;
#[cfg(target_arch = "wasm32")]
mod surface;

#[cfg(target_arch = "wasm32")]
pub use host::{mount, mount_with_config, mount_with_toml, FieldHandle};
