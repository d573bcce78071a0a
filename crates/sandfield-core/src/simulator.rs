use glam::Vec2;
use sandfield_platform::{DrawSurface, HostEvent, SurfaceSize};
use tracing::info;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::field::{FrameStats, ParticleField};

/// Latest pointer position. Written by input handlers, read once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    position: Vec2,
}

impl PointerState {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set(&mut self, position: Vec2) {
        self.position = position;
    }
}

/// A particle field plus the pointer it reacts to, fed by host events.
pub struct Simulator {
    field: ParticleField,
    pointer: PointerState,
}

impl Simulator {
    pub fn new(field: ParticleField) -> Self {
        Self {
            field,
            pointer: PointerState::default(),
        }
    }

    /// Build and seed a field for the surface the host has at mount time.
    pub fn mount(config: FieldConfig, size: SurfaceSize, compact: bool) -> Result<Self> {
        let mut field = ParticleField::new(config)?;
        let count = field.configure(size.width, size.height, compact);
        info!(
            "particle field mounted: {}x{} compact={} particles={}",
            size.width, size.height, compact, count
        );
        Ok(Self::new(field))
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::PointerMove(position)
            | HostEvent::TouchMove(position)
            | HostEvent::TouchStart(position) => self.pointer.set(position),
            HostEvent::Resize { size, compact } => {
                let count = self.field.configure(size.width, size.height, compact);
                info!(
                    "surface resized to {}x{} compact={} -> {} particles",
                    size.width, size.height, compact, count
                );
            }
        }
    }

    pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        self.field.frame(self.pointer.position(), surface)
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(width: f32, height: f32) -> Simulator {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 11).unwrap();
        field.configure(width, height, false);
        Simulator::new(field)
    }

    #[test]
    fn pointer_starts_at_origin_and_keeps_last_write() {
        let mut sim = seeded(800.0, 600.0);
        assert_eq!(sim.pointer().position(), Vec2::ZERO);
        sim.handle_event(HostEvent::PointerMove(Vec2::new(10.0, 20.0)));
        sim.handle_event(HostEvent::TouchMove(Vec2::new(30.0, 40.0)));
        assert_eq!(sim.pointer().position(), Vec2::new(30.0, 40.0));
        sim.handle_event(HostEvent::TouchStart(Vec2::new(5.0, 6.0)));
        assert_eq!(sim.pointer().position(), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn resize_switches_profile_and_count() {
        let mut sim = seeded(800.0, 600.0);
        assert_eq!(sim.field().particles().len(), 60);
        sim.handle_event(HostEvent::Resize {
            size: SurfaceSize::new(800.0, 600.0),
            compact: true,
        });
        assert!(sim.field().is_compact());
        assert_eq!(sim.field().particles().len(), 32);
        assert_eq!(sim.field().size(), SurfaceSize::new(800.0, 600.0));
    }
}
