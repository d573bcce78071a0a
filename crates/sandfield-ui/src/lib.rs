//! Native preview host: draws the particle field in a transparent eframe window.

mod surface;

use egui::Context;
use sandfield_core::{FieldConfig, FrameLoop, LoopControl, ParticleField, Simulator};
use sandfield_platform::{DrawSurface, FrameScheduler, HostEvent, Result, SurfaceSize};
use tracing::{info, warn};

pub use crate::surface::PainterSurface;

#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub config: FieldConfig,
    pub width: f32,
    pub height: f32,
    /// `None` derives the device class from the window width.
    pub force_compact: Option<bool>,
    pub seed: Option<u64>,
    pub show_stats: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            config: FieldConfig::default(),
            width: 1280.0,
            height: 720.0,
            force_compact: None,
            seed: None,
            show_stats: false,
        }
    }
}

/// Open the preview window and block until it closes.
pub fn run_preview(options: PreviewOptions) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sandfield")
            .with_inner_size([options.width, options.height])
            .with_transparent(true),
        ..Default::default()
    };
    let app = PreviewApp::new(options)?;
    eframe::run_native(
        "Sandfield",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )
    .map_err(|err| format!("eframe failed: {err}"))?;
    Ok(())
}

/// Asks egui for another repaint; egui has nothing to cancel.
struct RepaintScheduler<'a> {
    context: &'a Context,
}

impl FrameScheduler for RepaintScheduler<'_> {
    fn request_frame(&mut self) -> Result<()> {
        self.context.request_repaint();
        Ok(())
    }

    fn cancel_frame(&mut self) {}
}

pub struct PreviewApp {
    sim: Simulator,
    frame_loop: FrameLoop,
    force_compact: Option<bool>,
    surface_size: SurfaceSize,
    show_stats: bool,
}

impl PreviewApp {
    pub fn new(options: PreviewOptions) -> Result<Self> {
        for warning in options.config.validate() {
            warn!("field config: {warning}");
        }
        let field = match options.seed {
            Some(seed) => ParticleField::with_seed(options.config, seed)?,
            None => ParticleField::new(options.config)?,
        };
        Ok(Self {
            sim: Simulator::new(field),
            frame_loop: FrameLoop::new(),
            force_compact: options.force_compact,
            // zero forces a reseed on the first frame, once the real window size is known
            surface_size: SurfaceSize::default(),
            show_stats: options.show_stats,
        })
    }

    fn resize_if_needed(&mut self, size: SurfaceSize) {
        if size == self.surface_size {
            return;
        }
        self.surface_size = size;
        let compact = self
            .force_compact
            .unwrap_or_else(|| self.sim.field().config().is_compact_width(size.width));
        self.sim.handle_event(HostEvent::Resize { size, compact });
    }
}

impl eframe::App for PreviewApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, context: &Context, _frame: &mut eframe::Frame) {
        if context.input(|i| i.viewport().close_requested()) {
            info!("preview: close requested, stopping frame loop");
            self.frame_loop.cancel();
        }

        let (pointer, touching) = context.input(|i| (i.pointer.latest_pos(), i.any_touches()));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(context, |ui| {
                let mut surface = PainterSurface::new(ui.painter().clone());
                self.resize_if_needed(surface.size());
                if let Some(pos) = pointer {
                    let rect = ui.max_rect();
                    let local = glam::Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);
                    self.sim.handle_event(if touching {
                        HostEvent::TouchMove(local)
                    } else {
                        HostEvent::PointerMove(local)
                    });
                }

                let mut scheduler = RepaintScheduler { context };
                match self.frame_loop.drive(&mut self.sim, &mut surface, &mut scheduler) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Stop) => return,
                    Err(err) => warn!("preview frame failed: {err}"),
                }

                if self.show_stats {
                    let stats = self.frame_loop.last_stats();
                    ui.label(format!(
                        "particles {}  connections {}  frame {}",
                        stats.particles,
                        stats.connections,
                        self.frame_loop.frames()
                    ));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_resize_follows_window_width() {
        let mut app = PreviewApp::new(PreviewOptions {
            seed: Some(1),
            ..PreviewOptions::default()
        })
        .unwrap();
        app.resize_if_needed(SurfaceSize::new(600.0, 800.0));
        assert!(app.sim.field().is_compact());
        assert_eq!(app.sim.field().particles().len(), 32);

        // unchanged size keeps the same particles
        let before = app.sim.field().particles().to_vec();
        app.resize_if_needed(SurfaceSize::new(600.0, 800.0));
        assert_eq!(app.sim.field().particles(), &before[..]);
    }

    #[test]
    fn forced_profile_ignores_width() {
        let mut app = PreviewApp::new(PreviewOptions {
            seed: Some(2),
            force_compact: Some(false),
            ..PreviewOptions::default()
        })
        .unwrap();
        app.resize_if_needed(SurfaceSize::new(600.0, 800.0));
        assert!(!app.sim.field().is_compact());
        assert_eq!(app.sim.field().particles().len(), 60);
    }
}
