//! Surface geometry for the editor canvas and pointer hit-testing

use crate::drawing::{cell_index, HEIGHT, WIDTH};

/// Side of a cell block in surface pixels
pub const PIXEL_SIZE: u32 = 3;
/// Gap between cell blocks in surface pixels
pub const GAP_SIZE: u32 = 1;
/// Distance between the origins of neighbouring cells
pub const PITCH: u32 = PIXEL_SIZE + GAP_SIZE;
/// Surface width: 32 blocks and 31 gaps
pub const SURFACE_WIDTH: u32 = WIDTH as u32 * PIXEL_SIZE + (WIDTH as u32 - 1) * GAP_SIZE;
/// Surface height: 32 blocks and 31 gaps
pub const SURFACE_HEIGHT: u32 = HEIGHT as u32 * PIXEL_SIZE + (HEIGHT as u32 - 1) * GAP_SIZE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where the surface is displayed, in client (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A grid cell hit by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub idx: usize,
}

/// Surface rectangle occupied by cell `idx`.
pub fn cell_rect(idx: usize) -> Rect {
    let x = (idx % WIDTH) as u32;
    let y = (idx / WIDTH) as u32;
    Rect {
        x: x * PITCH,
        y: y * PITCH,
        width: PIXEL_SIZE,
        height: PIXEL_SIZE,
    }
}

/// Map a pointer position to the cell under it.
///
/// The client rect may be scaled arbitrarily; positions are first mapped to
/// surface pixels. Gaps belong to the cell on their left/top.
pub fn cell_from_pointer(rect: &ClientRect, client_x: f64, client_y: f64) -> Option<Cell> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let sx = (client_x - rect.left) / rect.width * SURFACE_WIDTH as f64;
    let sy = (client_y - rect.top) / rect.height * SURFACE_HEIGHT as f64;
    let cx = (sx / PITCH as f64).floor();
    let cy = (sy / PITCH as f64).floor();
    if !(0.0..WIDTH as f64).contains(&cx) || !(0.0..HEIGHT as f64).contains(&cy) {
        return None;
    }
    let (x, y) = (cx as usize, cy as usize);
    cell_index(x, y).map(|idx| Cell { x, y, idx })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: ClientRect = ClientRect {
        left: 0.0,
        top: 0.0,
        width: SURFACE_WIDTH as f64,
        height: SURFACE_HEIGHT as f64,
    };

    #[test]
    fn surface_is_127_square() {
        assert_eq!(SURFACE_WIDTH, 127);
        assert_eq!(SURFACE_HEIGHT, 127);
        let last = cell_rect(1023);
        assert_eq!(last.x + last.width, SURFACE_WIDTH);
    }

    #[test]
    fn pointer_hits_cell_it_was_drawn_in() {
        for idx in [0usize, 1, 32, 517, 1023] {
            let r = cell_rect(idx);
            let cell = cell_from_pointer(&NATIVE, r.x as f64 + 1.5, r.y as f64 + 1.5).unwrap();
            assert_eq!(cell.idx, idx);
        }
    }

    #[test]
    fn scaled_and_offset_surface() {
        let rect = ClientRect { left: 100.0, top: 50.0, width: 508.0, height: 508.0 };
        // 4x scale: client (100 + 4*5, 50 + 4*9) is surface (5, 9) -> cell (1, 2)
        let cell = cell_from_pointer(&rect, 120.0, 86.0).unwrap();
        assert_eq!((cell.x, cell.y, cell.idx), (1, 2, 65));
    }

    #[test]
    fn pointer_outside_surface_is_none() {
        assert_eq!(cell_from_pointer(&NATIVE, -1.0, 5.0), None);
        assert_eq!(cell_from_pointer(&NATIVE, 5.0, 128.0), None);
        let empty = ClientRect { left: 0.0, top: 0.0, width: 0.0, height: 0.0 };
        assert_eq!(cell_from_pointer(&empty, 0.0, 0.0), None);
    }
}
