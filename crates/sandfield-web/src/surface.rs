use std::f64::consts::TAU;

use glam::Vec2;
use sandfield_platform::{DrawSurface, FillStyle, StrokeStyle, SurfaceSize};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`DrawSurface`] over a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, context: CanvasRenderingContext2d) -> Self {
        Self { canvas, context }
    }

    /// Canvas backing store follows the viewport; this also wipes its contents.
    pub fn resize(&self, size: SurfaceSize) {
        self.canvas.set_width(size.width as u32);
        self.canvas.set_height(size.height as u32);
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.context
            .clear_rect(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, style: &FillStyle) {
        let ctx = &self.context;
        let color = style.color.to_hex();
        ctx.save();
        ctx.set_global_alpha(f64::from(style.alpha));
        ctx.set_fill_style_str(&color);
        ctx.set_shadow_blur(f64::from(style.glow));
        ctx.set_shadow_color(&color);
        ctx.begin_path();
        // arc only fails on a negative radius
        let _ = ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            TAU,
        );
        ctx.fill();
        ctx.restore();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: &StrokeStyle) {
        let ctx = &self.context;
        ctx.save();
        ctx.set_global_alpha(f64::from(style.alpha));
        ctx.set_stroke_style_str(&style.color.to_hex());
        ctx.set_line_width(f64::from(style.width));
        ctx.begin_path();
        ctx.move_to(f64::from(from.x), f64::from(from.y));
        ctx.line_to(f64::from(to.x), f64::from(to.y));
        ctx.stroke();
        ctx.restore();
    }
}
