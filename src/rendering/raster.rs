//! Rasterizer: executes paint commands into an RGB frame

use super::layout::{SURFACE_HEIGHT, SURFACE_WIDTH};
use super::paint::{paint_commands, PaintCommand};
use super::Frame;
use crate::drawing::{Drawing, CELLS, HEIGHT, WIDTH};

/// Execute `commands` on a black frame of the given size. Rects are clipped.
pub fn execute(commands: &[PaintCommand], width: u32, height: u32) -> Frame {
    let mut frame = Frame::solid(width, height, [0, 0, 0]);
    for cmd in commands {
        match *cmd {
            PaintCommand::SolidRect {
                x,
                y,
                width: w,
                height: h,
                rgb,
            } => {
                let x1 = x.saturating_add(w).min(width);
                let y1 = y.saturating_add(h).min(height);
                for py in y.min(height)..y1 {
                    let row = py as usize * width as usize;
                    for px in x.min(width)..x1 {
                        let o = (row + px as usize) * 3;
                        frame.rgb[o..o + 3].copy_from_slice(&rgb);
                    }
                }
            }
        }
    }
    frame
}

/// Render the editor surface (127×127).
pub fn rasterize(drawing: &Drawing) -> Frame {
    execute(&paint_commands(drawing), SURFACE_WIDTH, SURFACE_HEIGHT)
}

/// Render one pixel per cell, as shown on the LED matrix (32×32).
pub fn rasterize_led(drawing: &Drawing) -> Frame {
    let mut rgb = Vec::with_capacity(CELLS * 3);
    for idx in 0..CELLS {
        rgb.extend_from_slice(&drawing.color_at(idx).to_bytes());
    }
    Frame {
        width: WIDTH as u32,
        height: HEIGHT as u32,
        rgb,
    }
}
