//! The particle collection and its per-frame update/render pass.

use glam::Vec2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sandfield_platform::{DrawSurface, FillStyle, StrokeStyle, SurfaceSize};
use tracing::debug;

use crate::config::{FieldConfig, FieldProfile};
use crate::error::{FieldError, Result};
use crate::particle::Particle;

/// Counts from the most recent rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub connections: usize,
}

/// `min(cap, floor(area / divisor))`; degenerate surfaces yield zero.
pub fn particle_count(size: SurfaceSize, profile: &FieldProfile) -> usize {
    let area = f64::from(size.width) * f64::from(size.height);
    let divisor = f64::from(profile.density_divisor);
    if !area.is_finite() || area <= 0.0 || divisor <= 0.0 {
        return 0;
    }
    ((area / divisor).floor() as usize).min(profile.max_particles)
}

/// Line alpha for two particles `distance` apart, or `None` when they are not connected.
pub fn connection_alpha(distance: f32, connection_distance: f32, max_alpha: f32) -> Option<f32> {
    (distance < connection_distance)
        .then(|| (connection_distance - distance) / connection_distance * max_alpha)
}

pub struct ParticleField {
    config: FieldConfig,
    compact: bool,
    size: SurfaceSize,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(config: FieldConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic field for tests and benchmarks.
    pub fn with_seed(config: FieldConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FieldConfig, rng: StdRng) -> Result<Self> {
        if config.palette.is_empty() {
            return Err(FieldError::EmptyPalette);
        }
        Ok(Self {
            config,
            compact: false,
            size: SurfaceSize::default(),
            particles: Vec::new(),
            rng,
        })
    }

    /// Discard every particle and reseed for a surface of `width` x `height`.
    pub fn configure(&mut self, width: f32, height: f32, compact: bool) -> usize {
        self.size = SurfaceSize::new(width, height);
        self.compact = compact;
        let profile = self.config.profile(compact);
        let count = particle_count(self.size, profile);
        let palette = &self.config.palette;

        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let color = palette[self.rng.gen_range(0..palette.len())];
            particles.push(Particle::spawn(&mut self.rng, self.size, profile, &self.config, color));
        }
        self.particles = particles;
        debug!(width, height, compact, count, "particle field reseeded");
        count
    }

    /// Physics only; no drawing.
    pub fn step(&mut self, pointer: Vec2) {
        let profile = self.config.profile(self.compact);
        for particle in &mut self.particles {
            particle.advance(&mut self.rng, pointer, self.size, profile, &self.config);
        }
    }

    /// Clear, move and draw every particle, then draw the connections.
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, pointer: Vec2, surface: &mut S) -> FrameStats {
        surface.clear();
        let profile = self.config.profile(self.compact);
        for particle in &mut self.particles {
            particle.advance(&mut self.rng, pointer, self.size, profile, &self.config);
            surface.fill_circle(
                particle.pos,
                particle.size,
                &FillStyle {
                    color: particle.color,
                    alpha: particle.opacity,
                    glow: profile.glow_blur,
                },
            );
        }

        let width = self.config.connection_width;
        let connections = self.for_each_connection(|from, to, alpha| {
            surface.stroke_line(
                from.pos,
                to.pos,
                &StrokeStyle {
                    color: from.color,
                    alpha,
                    width,
                },
            );
        });

        FrameStats {
            particles: self.particles.len(),
            connections,
        }
    }

    /// Visits each connected unordered pair once, first particle first. O(n²).
    pub fn for_each_connection<F>(&self, mut visit: F) -> usize
    where
        F: FnMut(&Particle, &Particle, f32),
    {
        let max_distance = self.profile().connection_distance;
        let max_alpha = self.config.connection_alpha;
        let mut count = 0;
        for (i, first) in self.particles.iter().enumerate() {
            for second in &self.particles[i + 1..] {
                let distance = first.pos.distance(second.pos);
                if let Some(alpha) = connection_alpha(distance, max_distance, max_alpha) {
                    visit(first, second, alpha);
                    count += 1;
                }
            }
        }
        count
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Direct access for hosts and tests that place particles by hand.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn profile(&self) -> &FieldProfile {
        self.config.profile(self.compact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_uses_density_then_cap() {
        let config = FieldConfig::default();
        let size = SurfaceSize::new(800.0, 600.0);
        assert_eq!(particle_count(size, &config.full), 60);
        assert_eq!(particle_count(size, &config.compact), 32);
        let huge = SurfaceSize::new(3840.0, 2160.0);
        assert_eq!(particle_count(huge, &config.full), 150);
        assert_eq!(particle_count(huge, &config.compact), 50);
    }

    #[test]
    fn degenerate_surfaces_have_no_particles() {
        let config = FieldConfig::default();
        assert_eq!(particle_count(SurfaceSize::new(0.0, 600.0), &config.full), 0);
        assert_eq!(particle_count(SurfaceSize::new(-10.0, 600.0), &config.full), 0);
        assert_eq!(particle_count(SurfaceSize::new(f32::INFINITY, 600.0), &config.full), 0);
    }

    #[test]
    fn connection_threshold_is_exclusive() {
        assert_eq!(connection_alpha(80.0, 80.0, 0.3), None);
        assert_eq!(connection_alpha(0.0, 80.0, 0.3), Some(0.3));
        let alpha = connection_alpha(79.0, 80.0, 0.3).unwrap();
        assert!((alpha - 0.3 / 80.0).abs() < 1e-6);
    }

    #[test]
    fn empty_palette_cannot_build_a_field() {
        let config = FieldConfig {
            palette: Vec::new(),
            ..FieldConfig::default()
        };
        assert!(matches!(ParticleField::with_seed(config, 1), Err(FieldError::EmptyPalette)));
    }

    #[test]
    fn configure_colours_come_from_palette() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 3).unwrap();
        assert_eq!(field.configure(1920.0, 1080.0, false), 150);
        let palette = field.config().palette.clone();
        assert!(field.particles().iter().all(|p| palette.contains(&p.color)));
        // both colours show up in a sample this large
        assert!(palette
            .iter()
            .all(|c| field.particles().iter().any(|p| p.color == *c)));
    }

    #[test]
    fn pairs_are_visited_once() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 9).unwrap();
        field.configure(800.0, 600.0, false);
        let layout = [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (500.0, 500.0)];
        for (particle, (x, y)) in field.particles_mut().iter_mut().zip(layout) {
            particle.pos = Vec2::new(x, y);
        }
        // park the rest far from the cluster and from each other
        for (i, particle) in field.particles_mut().iter_mut().enumerate().skip(layout.len()) {
            particle.pos = Vec2::new(100.0 * (i % 8) as f32, 700.0 + 100.0 * (i / 8) as f32);
        }
        let mut seen = Vec::new();
        let count = field.for_each_connection(|a, b, _| seen.push((a.pos.x, b.pos.x)));
        assert_eq!(count, 3);
        assert_eq!(seen, vec![(0.0, 10.0), (0.0, 20.0), (10.0, 20.0)]);
    }
}
