//! Rendering: drawing → pixels, pointer → cell.
//!
//! The editor surface shows each cell as a 3×3 block with a 1px gap, giving a
//! 127×127 frame. The LED frame is the bare 32×32 grid, one pixel per cell.

pub mod layout;
pub mod paint;
pub mod raster;

use sha2::{Digest, Sha256};

/// A rendered RGB frame, rows top to bottom, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Frame {
    /// Frame filled with one color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            rgb: rgb.iter().copied().cycle().take(len * 3).collect(),
        }
    }

    /// Color at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.rgb[o], self.rgb[o + 1], self.rgb[o + 2]])
    }

    /// Hex SHA-256 of the pixel data, used for golden comparisons.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.rgb))
    }

    /// Binary PPM (P6) encoding.
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.rgb);
        out
    }
}
