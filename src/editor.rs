//! Editor state machine.
//!
//! Pointer and button events from whatever UI hosts the editor are fed in as
//! plain method calls, so the whole interaction model is testable without a
//! display surface.
//!
//! ```text
//! Idle --pointer_down--> Painting --pointer_up / pointer_cancel--> Idle
//! ```
//!
//! A stroke is bracketed by two history saves (before the first paint and
//! after release), so undo reverts a whole stroke. The fill tool is a toggle:
//! the next point-down on the grid flood-fills once and the tool falls back
//! to drawing.

use crate::codec;
use crate::drawing::{Drawing, Rgb};
use crate::history::History;
use crate::paint;

/// Active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Draw,
    Fill,
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    Painting {
        /// Stroke started with the fill tool; moves do not paint.
        fill: bool,
        /// Last cell painted in this stroke.
        last_cell: Option<usize>,
        /// Whether the stroke changed the drawing.
        dirty: bool,
    },
}

/// Editor session: live drawing, history, tool and stroke state.
#[derive(Debug, Clone)]
pub struct Editor {
    drawing: Drawing,
    history: History,
    state: StrokeState,
    tool: Tool,
    color: Rgb,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Editor on a blank drawing, brush color white.
    pub fn new() -> Self {
        Self::with_drawing(Drawing::blank())
    }

    pub fn with_drawing(drawing: Drawing) -> Self {
        let drawing = drawing.normalized();
        Self {
            history: History::new(&drawing),
            drawing,
            state: StrokeState::Idle,
            tool: Tool::Draw,
            color: Rgb::WHITE,
        }
    }

    /// Editor opened from a page fragment; falls back to blank without `#p=`.
    pub fn from_fragment(fragment: &str) -> Self {
        let drawing = codec::payload_from_fragment(fragment)
            .map(codec::decode)
            .unwrap_or_default();
        Self::with_drawing(drawing)
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: impl Into<Rgb>) {
        self.color = color.into();
    }

    /// Flip between draw and fill tools, returning the new tool.
    pub fn toggle_fill(&mut self) -> Tool {
        self.tool = match self.tool {
            Tool::Draw => Tool::Fill,
            Tool::Fill => Tool::Draw,
        };
        self.tool
    }

    /// Pointer pressed over `cell` (`None` when off the grid).
    ///
    /// Returns whether the drawing changed.
    pub fn pointer_down(&mut self, cell: Option<usize>) -> bool {
        if matches!(self.state, StrokeState::Painting { .. }) {
            return self.pointer_move(cell);
        }
        match (self.tool, cell) {
            (Tool::Fill, Some(idx)) => {
                self.history.save(&self.drawing);
                let filled = paint::flood_fill(&mut self.drawing, idx, self.color);
                self.tool = Tool::Draw;
                self.state = StrokeState::Painting {
                    fill: true,
                    last_cell: Some(idx),
                    dirty: filled > 0,
                };
                filled > 0
            }
            // a fill click off the grid keeps the fill tool armed
            (Tool::Fill, None) => false,
            (Tool::Draw, _) => {
                self.history.save(&self.drawing);
                self.state = StrokeState::Painting {
                    fill: false,
                    last_cell: None,
                    dirty: false,
                };
                self.pointer_move(cell)
            }
        }
    }

    /// Pointer moved over `cell` while pressed. Returns whether the drawing changed.
    pub fn pointer_move(&mut self, cell: Option<usize>) -> bool {
        let StrokeState::Painting {
            fill: false,
            last_cell,
            dirty,
        } = self.state
        else {
            return false;
        };
        let Some(idx) = cell else { return false };
        if last_cell == Some(idx) {
            return false;
        }
        let changed = paint::paint_pixel(&mut self.drawing, idx, self.color);
        self.state = StrokeState::Painting {
            fill: false,
            last_cell: Some(idx),
            dirty: dirty || changed,
        };
        changed
    }

    /// Pointer released. Returns whether a history entry was committed.
    pub fn pointer_up(&mut self) -> bool {
        self.finish_stroke()
    }

    /// Pointer capture lost; treated like a release.
    pub fn pointer_cancel(&mut self) -> bool {
        self.finish_stroke()
    }

    pub fn undo(&mut self) -> bool {
        self.finish_stroke();
        match self.history.undo() {
            Some(d) => {
                self.drawing = d;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.finish_stroke();
        match self.history.redo() {
            Some(d) => {
                self.drawing = d;
                true
            }
            None => false,
        }
    }

    /// Replace the drawing wholesale (clear, import, load); undoable.
    pub fn replace(&mut self, drawing: Drawing) {
        self.finish_stroke();
        self.history.save(&self.drawing);
        self.drawing = drawing.normalized();
        self.history.save(&self.drawing);
    }

    pub fn clear(&mut self) {
        self.replace(Drawing::blank());
    }

    /// Paint every cell with the current color.
    pub fn fill_canvas(&mut self) -> bool {
        self.finish_stroke();
        self.history.save(&self.drawing);
        let changed = paint::fill_all(&mut self.drawing, self.color);
        self.history.save(&self.drawing);
        changed
    }

    /// Import drawing JSON; malformed text yields a blank drawing.
    pub fn import_json(&mut self, text: &str) {
        self.replace(Drawing::from_json_str(text));
    }

    /// Load a share token; malformed tokens yield a blank drawing.
    pub fn load_token(&mut self, token: &str) {
        self.replace(codec::decode(token));
    }

    pub fn export_json(&self) -> String {
        self.drawing.normalized().to_json_pretty()
    }

    pub fn share_token(&self) -> String {
        codec::encode(&self.drawing)
    }

    pub fn share_url(&self, base: &str) -> Result<String, url::ParseError> {
        codec::share_url(base, &self.drawing)
    }

    fn finish_stroke(&mut self) -> bool {
        let committed = match self.state {
            StrokeState::Painting { dirty: true, .. } => self.history.save(&self.drawing),
            _ => false,
        };
        self.state = StrokeState::Idle;
        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::CELLS;

    fn stroke(editor: &mut Editor, cells: &[usize]) {
        editor.pointer_down(cells.first().copied());
        for &c in &cells[1..] {
            editor.pointer_move(Some(c));
        }
        editor.pointer_up();
    }

    #[test]
    fn stroke_lifecycle() {
        let mut e = Editor::new();
        assert_eq!(e.state(), StrokeState::Idle);
        assert!(e.pointer_down(Some(0)));
        assert!(matches!(e.state(), StrokeState::Painting { fill: false, .. }));
        assert!(e.pointer_move(Some(1)));
        assert!(!e.pointer_move(Some(1)));
        assert!(e.pointer_up());
        assert_eq!(e.state(), StrokeState::Idle);
        assert_eq!(e.history().len(), 2);
    }

    #[test]
    fn undo_reverts_whole_stroke() {
        let mut e = Editor::new();
        stroke(&mut e, &[0, 1, 2, 3]);
        assert!(e.undo());
        assert_eq!(e.drawing(), &Drawing::blank());
        assert!(!e.undo());
    }

    #[test]
    fn moves_outside_stroke_do_nothing() {
        let mut e = Editor::new();
        assert!(!e.pointer_move(Some(4)));
        assert!(!e.pointer_up());
        assert_eq!(e.history().len(), 1);
    }

    #[test]
    fn stroke_without_change_adds_no_history() {
        let mut e = Editor::new();
        e.set_color("#000000");
        stroke(&mut e, &[0, 1]);
        assert_eq!(e.history().len(), 1);
    }

    #[test]
    fn fill_tool_fires_once_then_reverts() {
        let mut e = Editor::new();
        e.set_color("#ff0000");
        assert_eq!(e.toggle_fill(), Tool::Fill);
        assert!(!e.pointer_down(None));
        assert_eq!(e.tool(), Tool::Fill);
        assert!(e.pointer_down(Some(100)));
        assert_eq!(e.tool(), Tool::Draw);
        assert!(!e.pointer_move(Some(5)));
        assert!(e.pointer_up());
        assert_eq!(e.history().len(), 2);
        assert!(e.drawing().pixels.iter().all(|&p| p == 2));
    }

    #[test]
    fn undo_n_then_redo_n_restores_state() {
        let mut e = Editor::new();
        let colors = ["#ff0000", "#00ff00", "#0000ff", "#ffff00"];
        for (i, c) in colors.iter().enumerate() {
            e.set_color(*c);
            stroke(&mut e, &[i * 10, i * 10 + 1, i * 10 + 2]);
        }
        let before = e.drawing().clone();
        for _ in 0..colors.len() {
            assert!(e.undo());
        }
        assert_eq!(e.drawing(), &Drawing::blank());
        for _ in 0..colors.len() {
            assert!(e.redo());
        }
        assert_eq!(e.drawing(), &before);
    }

    #[test]
    fn undo_mid_stroke_commits_first() {
        let mut e = Editor::new();
        e.pointer_down(Some(0));
        e.pointer_move(Some(1));
        assert!(e.undo());
        assert_eq!(e.state(), StrokeState::Idle);
        assert_eq!(e.drawing(), &Drawing::blank());
        assert!(e.redo());
        assert_eq!(e.drawing().pixels[1], 1);
    }

    #[test]
    fn clear_and_import_are_undoable() {
        let mut e = Editor::new();
        stroke(&mut e, &[7]);
        let painted = e.drawing().clone();
        e.clear();
        assert_eq!(e.drawing(), &Drawing::blank());
        assert!(e.undo());
        assert_eq!(e.drawing(), &painted);

        e.import_json("not json at all");
        assert_eq!(e.drawing(), &Drawing::blank());
    }

    #[test]
    fn share_token_round_trips_through_fragment() {
        let mut e = Editor::new();
        e.set_color("#123456");
        stroke(&mut e, &[0, 33, 66]);
        let fragment = format!("#p={}", e.share_token());
        let reopened = Editor::from_fragment(&fragment);
        assert_eq!(reopened.drawing(), e.drawing());
        assert_eq!(Editor::from_fragment("").drawing(), &Drawing::blank());
    }

    #[test]
    fn fill_canvas_sets_all_cells() {
        let mut e = Editor::new();
        e.set_color("#abcdef");
        assert!(e.fill_canvas());
        assert_eq!(e.drawing().pixels.len(), CELLS);
        assert!(e.drawing().pixels.iter().all(|&p| p == 2));
        assert!(e.undo());
    }
}
