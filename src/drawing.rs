//! Drawing model: a fixed 32×32 indexed-color bitmap and its palette.
//!
//! Everything that enters from outside (pasted JSON, stored files, request
//! bodies) goes through [`Drawing::validate`] or [`Drawing::normalize`], so a
//! `Drawing` obtained from JSON always satisfies the model invariants:
//!
//! - exactly [`CELLS`] pixels,
//! - a non-empty palette of at most [`MAX_PALETTE`] entries,
//! - every pixel index inside the palette.

use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Grid width in cells
pub const WIDTH: usize = 32;
/// Grid height in cells
pub const HEIGHT: usize = 32;
/// Number of cells in a drawing
pub const CELLS: usize = WIDTH * HEIGHT;
/// Largest palette the binary payload can carry
pub const MAX_PALETTE: usize = 255;

/// A palette color.
///
/// Serializes as canonical `#rrggbb` and deserializes leniently: anything that
/// is not a well-formed hex color becomes black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Strict parse of `#rrggbb` (surrounding whitespace and case ignored).
    pub fn parse(input: &str) -> Option<Rgb> {
        let hex = input.trim().to_ascii_lowercase();
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lenient parse: malformed input maps to black.
    pub fn normalize(input: &str) -> Rgb {
        Rgb::parse(input).unwrap_or(Rgb::BLACK)
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<&str> for Rgb {
    fn from(s: &str) -> Self {
        Rgb::normalize(s)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(b: [u8; 3]) -> Self {
        Rgb::new(b[0], b[1], b[2])
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(color_from_value(&value))
    }
}

/// Why a JSON value was rejected as a drawing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("drawing must be a JSON object")]
    NotAnObject,
    #[error("width must be {WIDTH}")]
    WrongWidth,
    #[error("height must be {HEIGHT}")]
    WrongHeight,
    #[error("palette must be an array")]
    PaletteNotArray,
    #[error("pixels must be an array")]
    PixelsNotArray,
    #[error("palette must not be empty")]
    EmptyPalette,
    #[error("expected {CELLS} pixels, found {0}")]
    WrongPixelCount(usize),
}

/// A 32×32 indexed-color drawing.
///
/// Fields are public so editing code can work on them directly; callers that
/// poke at them are responsible for keeping indices in range, and
/// [`Drawing::normalized`] restores the invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawing {
    pub palette: Vec<Rgb>,
    pub pixels: Vec<u16>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::blank()
    }
}

impl Drawing {
    /// Blank drawing on a black background.
    pub fn blank() -> Self {
        Self::blank_with(Rgb::BLACK)
    }

    /// Blank drawing: every pixel is index 0, palette is `[background, white]`.
    pub fn blank_with(background: Rgb) -> Self {
        Self {
            palette: vec![background, Rgb::WHITE],
            pixels: vec![0; CELLS],
        }
    }

    /// Schema-checked decode of untrusted JSON.
    ///
    /// On success the palette is truncated to [`MAX_PALETTE`] entries, every
    /// color is canonicalized and every pixel clamped into the palette.
    pub fn validate(value: &Value) -> std::result::Result<Drawing, ShapeError> {
        let obj = value.as_object().ok_or(ShapeError::NotAnObject)?;
        if !is_dimension(obj.get("w"), WIDTH) {
            return Err(ShapeError::WrongWidth);
        }
        if !is_dimension(obj.get("h"), HEIGHT) {
            return Err(ShapeError::WrongHeight);
        }
        let palette = obj
            .get("palette")
            .and_then(Value::as_array)
            .ok_or(ShapeError::PaletteNotArray)?;
        let pixels = obj
            .get("pixels")
            .and_then(Value::as_array)
            .ok_or(ShapeError::PixelsNotArray)?;
        if palette.is_empty() {
            return Err(ShapeError::EmptyPalette);
        }
        if pixels.len() != CELLS {
            return Err(ShapeError::WrongPixelCount(pixels.len()));
        }

        let palette: Vec<Rgb> = palette
            .iter()
            .take(MAX_PALETTE)
            .map(color_from_value)
            .collect();
        let max = palette.len() as i64 - 1;
        let pixels = pixels
            .iter()
            .map(|p| pixel_from_value(p).clamp(0, max) as u16)
            .collect();
        Ok(Drawing { palette, pixels })
    }

    /// Fail-soft decode: any shape problem yields a blank drawing.
    pub fn normalize(value: &Value) -> Drawing {
        Drawing::validate(value).unwrap_or_else(|e| {
            log::debug!("replacing malformed drawing with blank: {}", e);
            Drawing::blank()
        })
    }

    /// Fail-soft decode of JSON text; unparseable text yields a blank drawing.
    pub fn from_json_str(text: &str) -> Drawing {
        match serde_json::from_str::<Value>(text) {
            Ok(v) => Drawing::normalize(&v),
            Err(e) => {
                log::debug!("drawing JSON did not parse: {}", e);
                Drawing::blank()
            }
        }
    }

    /// Copy of this drawing with the model invariants re-established.
    ///
    /// Equivalent to normalizing the drawing's own JSON form.
    pub fn normalized(&self) -> Drawing {
        if self.palette.is_empty() || self.pixels.len() != CELLS {
            return Drawing::blank();
        }
        let palette: Vec<Rgb> = self.palette.iter().take(MAX_PALETTE).copied().collect();
        let max = (palette.len() - 1) as u16;
        let pixels = self.pixels.iter().map(|&p| p.min(max)).collect();
        Drawing { palette, pixels }
    }

    /// Index of `color` in the palette, appending it when absent.
    ///
    /// The first matching entry wins. Colors appended past the 255th entry
    /// stay usable in memory but cannot round-trip through the share payload.
    pub fn palette_index_for(&mut self, color: impl Into<Rgb>) -> u16 {
        let color = color.into();
        if let Some(i) = self.palette.iter().position(|c| *c == color) {
            return i as u16;
        }
        if self.palette.len() > u16::MAX as usize {
            // index space exhausted; fall back to the background
            return 0;
        }
        self.palette.push(color);
        (self.palette.len() - 1) as u16
    }

    /// Color shown for cell `idx`: its palette entry, else the background, else black.
    pub fn color_at(&self, idx: usize) -> Rgb {
        let p = self.pixels.get(idx).copied().unwrap_or(0) as usize;
        self.palette
            .get(p)
            .or_else(|| self.palette.first())
            .copied()
            .unwrap_or(Rgb::BLACK)
    }

    pub fn to_json_pretty(&self) -> String {
        // serializing plain strings and integers cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Cell index for grid coordinates, `None` outside the grid.
pub fn cell_index(x: usize, y: usize) -> Option<usize> {
    (x < WIDTH && y < HEIGHT).then_some(y * WIDTH + x)
}

impl Serialize for Drawing {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Drawing", 4)?;
        s.serialize_field("w", &WIDTH)?;
        s.serialize_field("h", &HEIGHT)?;
        s.serialize_field("palette", &self.palette)?;
        s.serialize_field("pixels", &self.pixels)?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for Drawing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Drawing::normalize(&value))
    }
}

fn is_dimension(v: Option<&Value>, expected: usize) -> bool {
    v.and_then(Value::as_f64) == Some(expected as f64)
}

fn color_from_value(v: &Value) -> Rgb {
    v.as_str().map(Rgb::normalize).unwrap_or(Rgb::BLACK)
}

fn pixel_from_value(v: &Value) -> i64 {
    fn truncate(f: f64) -> i64 {
        if f.is_finite() {
            f.trunc() as i64
        } else {
            0
        }
    }
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(truncate)).unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(truncate).unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}
