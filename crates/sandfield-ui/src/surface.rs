use egui::{Color32, Painter, Pos2, Stroke};
use glam::Vec2;
use sandfield_platform::{DrawSurface, FillStyle, Rgb, StrokeStyle, SurfaceSize};

fn color(rgb: Rgb, alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(rgb.r, rgb.g, rgb.b, alpha)
}

/// [`DrawSurface`] over an egui painter. egui repaints from scratch each
/// frame, so `clear` has nothing to erase.
pub struct PainterSurface {
    painter: Painter,
    origin: Pos2,
    size: SurfaceSize,
}

impl PainterSurface {
    pub fn new(painter: Painter) -> Self {
        let rect = painter.clip_rect();
        Self {
            origin: rect.min,
            size: SurfaceSize::new(rect.width(), rect.height()),
            painter,
        }
    }

    fn to_screen(&self, point: Vec2) -> Pos2 {
        Pos2::new(self.origin.x + point.x, self.origin.y + point.y)
    }
}

impl DrawSurface for PainterSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {}

    fn fill_circle(&mut self, center: Vec2, radius: f32, style: &FillStyle) {
        let center = self.to_screen(center);
        // no shadow blur in egui; a faint halo stands in for the glow
        if style.glow > 0.0 {
            self.painter.circle_filled(
                center,
                radius + style.glow * 0.5,
                color(style.color, style.alpha * 0.15),
            );
        }
        self.painter
            .circle_filled(center, radius, color(style.color, style.alpha));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: &StrokeStyle) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(style.width, color(style.color, style.alpha)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_maps_to_byte_range() {
        let rgb = Rgb::new(0, 255, 153);
        assert_eq!(color(rgb, 1.0), Color32::from_rgba_unmultiplied(0, 255, 153, 255));
        assert_eq!(color(rgb, 0.0).a(), 0);
        assert_eq!(color(rgb, 2.0).a(), 255);
    }
}
