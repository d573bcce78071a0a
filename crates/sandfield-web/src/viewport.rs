use sandfield_core::FieldConfig;
use sandfield_platform::{HostEvent, SurfaceSize};

/// Inline style for the overlay canvas: fixed, full-viewport, behind content, click-through.
pub const OVERLAY_STYLE: &str =
    "position:fixed;inset:0;pointer-events:none;z-index:0;background:transparent";

pub fn viewport_size(inner_width: f64, inner_height: f64) -> SurfaceSize {
    SurfaceSize::new(inner_width.max(0.0) as f32, inner_height.max(0.0) as f32)
}

/// Resize event for a window of the given inner size.
pub fn resize_event(inner_width: f64, inner_height: f64, config: &FieldConfig) -> HostEvent {
    let size = viewport_size(inner_width, inner_height);
    HostEvent::Resize {
        size,
        compact: config.is_compact_width(size.width),
    }
}
