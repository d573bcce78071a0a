//! Tunable constants for the particle field, loadable from TOML.
//!
//! Defaults reproduce the stock behaviour exactly; a config file only needs to
//! name the values it overrides. Overrides are merged table-by-table onto the
//! serialised defaults, so `[compact]` with one key keeps every other compact
//! default.

use std::{fs, path::Path};

use sandfield_platform::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// Per device-class tuning. One profile for full layouts, one for compact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldProfile {
    pub max_particles: usize,
    /// Surface area (px²) per particle before the cap applies.
    pub density_divisor: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub repel_distance: f32,
    pub attract_min: f32,
    pub attract_max: f32,
    pub connection_distance: f32,
    pub glow_blur: f32,
}

impl FieldProfile {
    pub fn full() -> Self {
        Self {
            max_particles: 150,
            density_divisor: 8000.0,
            size_min: 1.0,
            size_max: 3.0,
            repel_distance: 100.0,
            attract_min: 200.0,
            attract_max: 300.0,
            connection_distance: 80.0,
            glow_blur: 10.0,
        }
    }

    pub fn compact() -> Self {
        Self {
            max_particles: 50,
            density_divisor: 15000.0,
            size_min: 1.5,
            size_max: 4.0,
            repel_distance: 80.0,
            attract_min: 150.0,
            attract_max: 250.0,
            connection_distance: 60.0,
            glow_blur: 8.0,
        }
    }

    fn warnings(&self, label: &str, out: &mut Vec<String>) {
        if self.density_divisor <= 0.0 {
            out.push(format!(
                "{label}.density_divisor must be positive (got {})",
                self.density_divisor
            ));
        }
        if self.size_min <= 0.0 || self.size_max < self.size_min {
            out.push(format!(
                "{label}.size range [{}, {}] should be positive and ordered",
                self.size_min, self.size_max
            ));
        }
        if self.attract_max < self.attract_min {
            out.push(format!(
                "{label}.attract range [{}, {}] is inverted; attraction never applies",
                self.attract_min, self.attract_max
            ));
        }
        if self.repel_distance <= 0.0 {
            out.push(format!(
                "{label}.repel_distance must be positive (got {})",
                self.repel_distance
            ));
        }
        if self.connection_distance <= 0.0 {
            out.push(format!(
                "{label}.connection_distance must be positive (got {})",
                self.connection_distance
            ));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Viewports narrower than this (px) use the compact profile.
    pub compact_breakpoint: f32,
    /// Initial velocity components are drawn from [-initial_speed, initial_speed].
    pub initial_speed: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    pub repel_strength: f32,
    pub attraction_force: f32,
    /// Per-axis velocity noise added each frame, drawn from [-jitter, jitter].
    pub jitter: f32,
    pub damping: f32,
    /// Velocity retained (and inverted) on a wall hit.
    pub bounce: f32,
    pub connection_alpha: f32,
    pub connection_width: f32,
    pub palette: Vec<Rgb>,
    pub full: FieldProfile,
    pub compact: FieldProfile,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            compact_breakpoint: 768.0,
            initial_speed: 0.25,
            opacity_min: 0.2,
            opacity_max: 0.8,
            repel_strength: 0.5,
            attraction_force: 0.001,
            jitter: 0.01,
            damping: 0.99,
            bounce: 0.8,
            connection_alpha: 0.3,
            connection_width: 0.5,
            palette: vec![Rgb::new(0x00, 0xff, 0x99), Rgb::new(0x00, 0x99, 0xff)],
            full: FieldProfile::full(),
            compact: FieldProfile::compact(),
        }
    }
}

impl FieldConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut merged = toml::Value::try_from(Self::default())?;
        merge_value(&mut merged, toml::Value::Table(text.parse::<toml::Table>()?));
        let config: Self = merged.try_into()?;
        if config.palette.is_empty() {
            return Err(FieldError::EmptyPalette);
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn profile(&self, compact: bool) -> &FieldProfile {
        if compact {
            &self.compact
        } else {
            &self.full
        }
    }

    pub fn is_compact_width(&self, viewport_width: f32) -> bool {
        viewport_width < self.compact_breakpoint
    }

    /// Non-fatal problems worth logging. Empty means the config looks sane.
    pub fn validate(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.palette.is_empty() {
            out.push("palette is empty; particles cannot be coloured".to_owned());
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            out.push(format!(
                "damping {} outside (0, 1]; velocities will not settle",
                self.damping
            ));
        }
        if !(0.0..=1.0).contains(&self.bounce) {
            out.push(format!("bounce {} outside [0, 1]", self.bounce));
        }
        if self.opacity_min <= 0.0
            || self.opacity_max > 1.0
            || self.opacity_max < self.opacity_min
        {
            out.push(format!(
                "opacity range [{}, {}] should sit inside (0, 1]",
                self.opacity_min, self.opacity_max
            ));
        }
        if self.initial_speed < 0.0 || self.jitter < 0.0 {
            out.push("initial_speed and jitter must not be negative".to_owned());
        }
        self.full.warnings("full", &mut out);
        self.compact.warnings("compact", &mut out);
        out
    }
}

fn merge_value(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
