//! Paint command list for a drawing

use super::layout::{cell_rect, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::drawing::{Drawing, CELLS};

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rgb: [u8; 3],
    },
}

/// Commands that draw `drawing` onto the editor surface: a black backdrop
/// (which shows through the gaps) followed by one block per cell.
pub fn paint_commands(drawing: &Drawing) -> Vec<PaintCommand> {
    let mut cmds = Vec::with_capacity(CELLS + 1);
    cmds.push(PaintCommand::SolidRect {
        x: 0,
        y: 0,
        width: SURFACE_WIDTH,
        height: SURFACE_HEIGHT,
        rgb: [0, 0, 0],
    });
    for idx in 0..CELLS {
        let r = cell_rect(idx);
        cmds.push(PaintCommand::SolidRect {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
            rgb: drawing.color_at(idx).to_bytes(),
        });
    }
    cmds
}
