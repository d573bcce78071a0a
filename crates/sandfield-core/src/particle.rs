use glam::Vec2;
use rand::Rng;
use sandfield_platform::{Rgb, SurfaceSize};

use crate::config::{FieldConfig, FieldProfile};

/// One simulated grain. Size, opacity and colour are fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub color: Rgb,
}

/// Uniform sample from `[min, max)`; tolerates `min >= max` instead of panicking.
fn sample<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + (max - min) * rng.gen::<f32>()
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        surface: SurfaceSize,
        profile: &FieldProfile,
        config: &FieldConfig,
        color: Rgb,
    ) -> Self {
        let speed = config.initial_speed;
        Self {
            pos: Vec2::new(
                sample(rng, 0.0, surface.width),
                sample(rng, 0.0, surface.height),
            ),
            vel: Vec2::new(sample(rng, -speed, speed), sample(rng, -speed, speed)),
            size: sample(rng, profile.size_min, profile.size_max),
            opacity: sample(rng, config.opacity_min, config.opacity_max),
            color,
        }
    }

    /// Repel inside `repel_distance`, attract inside the `(attract_min, attract_max)` band.
    pub fn react_to_pointer(
        &mut self,
        pointer: Vec2,
        profile: &FieldProfile,
        config: &FieldConfig,
    ) {
        let delta = pointer - self.pos;
        let distance = delta.length();

        // d == 0 has no direction; skip rather than divide by zero.
        if distance < profile.repel_distance && distance > 0.0 {
            let force = (profile.repel_distance - distance) / profile.repel_distance;
            self.vel -= delta / distance * force * config.repel_strength;
        }

        if distance > profile.attract_min && distance < profile.attract_max {
            self.vel += delta * config.attraction_force;
        }
    }

    /// Lossy reflection off the surface edges, then clamp back inside.
    pub fn contain(&mut self, surface: SurfaceSize, bounce: f32) {
        if self.pos.x < 0.0 || self.pos.x > surface.width {
            self.vel.x *= -bounce;
            self.pos.x = self.pos.x.min(surface.width).max(0.0);
        }
        if self.pos.y < 0.0 || self.pos.y > surface.height {
            self.vel.y *= -bounce;
            self.pos.y = self.pos.y.min(surface.height).max(0.0);
        }
    }

    /// One frame of physics: pointer forces, integrate, jitter, damp, contain.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pointer: Vec2,
        surface: SurfaceSize,
        profile: &FieldProfile,
        config: &FieldConfig,
    ) {
        self.react_to_pointer(pointer, profile, config);
        self.pos += self.vel;
        self.vel += Vec2::new(
            sample(rng, -config.jitter, config.jitter),
            sample(rng, -config.jitter, config.jitter),
        );
        self.vel *= config.damping;
        self.contain(surface, config.bounce);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: 2.0,
            opacity: 0.5,
            color: Rgb::new(0, 255, 153),
        }
    }

    #[test]
    fn spawn_respects_ranges() {
        let config = FieldConfig::default();
        let surface = SurfaceSize::new(320.0, 480.0);
        let mut rng = StdRng::seed_from_u64(7);
        for (compact, sizes) in [(true, 1.5..=4.0), (false, 1.0..=3.0)] {
            let profile = config.profile(compact);
            for _ in 0..500 {
                let p = Particle::spawn(&mut rng, surface, profile, &config, config.palette[0]);
                assert!(surface.contains(p.pos));
                assert!(p.vel.x.abs() <= 0.25 && p.vel.y.abs() <= 0.25);
                assert!(sizes.contains(&p.size), "compact={compact} size={}", p.size);
                assert!((0.2..=0.8).contains(&p.opacity));
            }
        }
    }

    #[test]
    fn close_pointer_repels() {
        let config = FieldConfig::default();
        let mut p = particle_at(100.0, 100.0);
        // 50 px to the right: half the full repel distance
        p.react_to_pointer(Vec2::new(150.0, 100.0), &config.full, &config);
        assert!((p.vel.x - (-0.25)).abs() < 1e-6, "{:?}", p.vel);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn pointer_on_top_of_particle_is_ignored() {
        let config = FieldConfig::default();
        let mut p = particle_at(10.0, 10.0);
        p.react_to_pointer(Vec2::new(10.0, 10.0), &config.full, &config);
        assert_eq!(p.vel, Vec2::ZERO);
        assert!(p.vel.is_finite());
    }

    #[test]
    fn pointer_in_attraction_band_pulls() {
        let config = FieldConfig::default();
        let mut p = particle_at(0.0, 0.0);
        p.react_to_pointer(Vec2::new(250.0, 0.0), &config.full, &config);
        assert!((p.vel.x - 0.25).abs() < 1e-6);

        let mut far = particle_at(0.0, 0.0);
        far.react_to_pointer(Vec2::new(300.0, 0.0), &config.full, &config);
        assert_eq!(far.vel, Vec2::ZERO, "attract_max is exclusive");

        let mut between = particle_at(0.0, 0.0);
        between.react_to_pointer(Vec2::new(150.0, 0.0), &config.full, &config);
        assert_eq!(between.vel, Vec2::ZERO, "dead zone between repel and attract");
    }

    #[test]
    fn wall_hit_reflects_and_clamps() {
        let surface = SurfaceSize::new(100.0, 50.0);
        let mut p = particle_at(104.0, -2.0);
        p.vel = Vec2::new(5.0, -1.0);
        p.contain(surface, 0.8);
        assert_eq!(p.pos, Vec2::new(100.0, 0.0));
        assert!((p.vel.x - (-4.0)).abs() < 1e-6);
        assert!((p.vel.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn advance_damps_without_forces() {
        let mut config = FieldConfig::default();
        config.jitter = 0.0;
        let surface = SurfaceSize::new(10_000.0, 10_000.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = particle_at(5_000.0, 5_000.0);
        p.vel = Vec2::new(1.0, -1.0);
        // pointer far outside every band
        let pointer = Vec2::new(-50_000.0, -50_000.0);
        p.advance(&mut rng, pointer, surface, &config.full, &config);
        assert_eq!(p.pos, Vec2::new(5_001.0, 4_999.0));
        assert!((p.vel.x - 0.99).abs() < 1e-6);
        assert!((p.vel.y + 0.99).abs() < 1e-6);
    }
}
