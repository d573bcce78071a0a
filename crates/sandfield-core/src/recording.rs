//! Headless [`DrawSurface`] that records draw calls instead of rasterising.

use glam::Vec2;
use sandfield_platform::{DrawSurface, FillStyle, StrokeStyle, SurfaceSize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub style: FillStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    pub style: StrokeStyle,
}

/// Keeps the calls made since the last `clear`, plus lifetime totals.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: SurfaceSize,
    pub circles: Vec<Circle>,
    pub lines: Vec<Line>,
    pub clears: u64,
    pub draw_calls: u64,
}

impl RecordingSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.circles.clear();
        self.lines.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, style: &FillStyle) {
        self.circles.push(Circle {
            center,
            radius,
            style: *style,
        });
        self.draw_calls += 1;
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: &StrokeStyle) {
        self.lines.push(Line {
            from,
            to,
            style: *style,
        });
        self.draw_calls += 1;
    }
}
