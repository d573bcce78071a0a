//! Platform abstraction traits so `sandfield-core` stays host-agnostic.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Pixel dimensions of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("colour `{0}` must start with '#'")]
    MissingHash(String),
    #[error("colour `{0}` must have 3 or 6 hex digits")]
    BadLength(String),
    #[error("colour `{0}` contains a non-hex digit")]
    BadDigit(String),
}

/// Opaque sRGB colour, written `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(text: &str) -> std::result::Result<Self, ColorParseError> {
        let digits = text
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(text.to_owned()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(text.to_owned()));
        }
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::BadDigit(text.to_owned()))
        };
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // #abc is shorthand for #aabbcc
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(ColorParseError::BadLength(text.to_owned())),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Filled circle styling. `glow` is the shadow blur radius in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: Rgb,
    pub alpha: f32,
    pub glow: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb,
    pub alpha: f32,
    pub width: f32,
}

/// 2D drawing target. Lives on the host's UI thread, so no `Send` bound.
pub trait DrawSurface {
    fn size(&self) -> SurfaceSize;
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, style: &FillStyle);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: &StrokeStyle);
}

/// Host display-refresh primitive (`requestAnimationFrame` and friends).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<()>;
    /// Drops the pending request, if any. No completion signal.
    fn cancel_frame(&mut self);
}

/// Source of pointer, touch and resize events.
pub trait InputSource {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Host events the simulator consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize { size: SurfaceSize, compact: bool },
    PointerMove(Vec2),
    TouchMove(Vec2),
    TouchStart(Vec2),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#00ff99").unwrap(), Rgb::new(0x00, 0xff, 0x99));
        assert_eq!(Rgb::from_hex("#09f").unwrap(), Rgb::new(0x00, 0x99, 0xff));
        assert_eq!(Rgb::new(0x00, 0x99, 0xff).to_hex(), "#0099ff");
    }

    #[test]
    fn rejects_malformed_colours() {
        assert!(matches!(Rgb::from_hex("00ff99"), Err(ColorParseError::MissingHash(_))));
        assert!(matches!(Rgb::from_hex("#00ff9"), Err(ColorParseError::BadLength(_))));
        assert!(matches!(Rgb::from_hex("#00ffzz"), Err(ColorParseError::BadDigit(_))));
        assert!(matches!(Rgb::from_hex("#é0"), Err(ColorParseError::BadDigit(_))));
    }

    #[test]
    fn colour_serialises_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Rgb = serde_json::from_str("\"#ABCDEF\"").unwrap();
        assert_eq!(back, Rgb::new(0xab, 0xcd, 0xef));
    }

    #[test]
    fn surface_bounds_are_inclusive() {
        let size = SurfaceSize::new(800.0, 600.0);
        assert!(size.contains(Vec2::ZERO));
        assert!(size.contains(Vec2::new(800.0, 600.0)));
        assert!(!size.contains(Vec2::new(800.1, 10.0)));
        assert!(!size.contains(Vec2::new(10.0, -0.1)));
    }
}
