//! Point paint and flood fill over a [`Drawing`].

use crate::drawing::{Drawing, Rgb, CELLS, HEIGHT, WIDTH};
use std::collections::VecDeque;

/// Paint one cell. Returns whether the cell changed.
///
/// Off-grid indices leave the drawing untouched, palette included.
pub fn paint_pixel(drawing: &mut Drawing, idx: usize, color: impl Into<Rgb>) -> bool {
    if idx >= drawing.pixels.len() {
        return false;
    }
    let pal = drawing.palette_index_for(color);
    match drawing.pixels.get_mut(idx) {
        Some(cell) if *cell != pal => {
            *cell = pal;
            true
        }
        _ => false,
    }
}

/// Set every cell to `color`. Returns whether anything changed.
pub fn fill_all(drawing: &mut Drawing, color: impl Into<Rgb>) -> bool {
    let pal = drawing.palette_index_for(color);
    let mut changed = false;
    for cell in drawing.pixels.iter_mut() {
        if *cell != pal {
            *cell = pal;
            changed = true;
        }
    }
    changed
}

/// 4-connected breadth-first region fill from `start`.
///
/// Recolors the connected region of cells sharing the start cell's index;
/// diagonal neighbours are not connected and the grid does not wrap. Returns
/// the number of cells recolored, 0 when the fill color already matches the
/// start cell or `start` is off the grid.
pub fn flood_fill(drawing: &mut Drawing, start: usize, color: impl Into<Rgb>) -> usize {
    if start >= CELLS || drawing.pixels.len() != CELLS {
        return 0;
    }
    let target = drawing.palette_index_for(color);
    let original = drawing.pixels[start];
    if target == original {
        return 0;
    }

    let mut visited = vec![false; CELLS];
    let mut queue = VecDeque::with_capacity(CELLS);
    visited[start] = true;
    queue.push_back(start);
    let mut filled = 0;

    while let Some(idx) = queue.pop_front() {
        drawing.pixels[idx] = target;
        filled += 1;

        for next in neighbours(idx).into_iter().flatten() {
            if !visited[next] && drawing.pixels[next] == original {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }
    filled
}

fn neighbours(idx: usize) -> [Option<usize>; 4] {
    let (x, y) = (idx % WIDTH, idx / WIDTH);
    [
        (y > 0).then(|| idx - WIDTH),
        (y + 1 < HEIGHT).then(|| idx + WIDTH),
        (x > 0).then(|| idx - 1),
        (x + 1 < WIDTH).then(|| idx + 1),
    ]
}
