//! GameView: maps a [`GameState`] snapshot into a terminal framebuffer.
//!
//! Pure (no I/O) and allocation-free once the framebuffer has its size.
//! Only the 20 visible rows are drawn; the two hidden spawn rows above them
//! are skipped, as are piece cells that sit in them.

use crate::core::{shape_at, ActivePiece, GameState};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, Rotation, BOARD_WIDTH, HIDDEN_ROWS, VISIBLE_ROWS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const NEXT_SHOWN: usize = 3;

/// Display color of a piece kind
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(34, 211, 238),
        PieceKind::O => Rgb::new(250, 204, 21),
        PieceKind::T => Rgb::new(167, 139, 250),
        PieceKind::L => Rgb::new(251, 146, 60),
        PieceKind::J => Rgb::new(96, 165, 250),
        PieceKind::S => Rgb::new(52, 211, 153),
        PieceKind::Z => Rgb::new(248, 113, 113),
    }
}

/// Board renderer with a side panel.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
    show_ghost: bool,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Top-left corner of the well's border
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
            show_ghost: true,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_ghost(mut self, show_ghost: bool) -> Self {
        self.show_ghost = show_ghost;
        self
    }

    fn frame_size(&self) -> (u16, u16) {
        (
            BOARD_WIDTH as u16 * self.cell_w + 2,
            VISIBLE_ROWS as u16 * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, state: &GameState, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let origin = Origin {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
        };

        self.draw_border(fb, origin, frame_w, frame_h);

        for (vy, row) in state.board.visible_rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                match PieceKind::from_id(cell) {
                    Some(kind) => {
                        let style = CellStyle::new(piece_color(kind), WELL_BG).bold();
                        self.fill_cell(fb, origin, x as u16, vy as u16, '█', style);
                    }
                    None => {
                        let style = CellStyle::new(Rgb::new(90, 90, 100), WELL_BG).dim();
                        self.fill_cell(fb, origin, x as u16, vy as u16, '·', style);
                    }
                }
            }
        }

        if let Some(active) = state.active {
            if self.show_ghost {
                let ghost = active.shifted(0, state.board.drop_distance(&active));
                let style = CellStyle::new(piece_color(active.kind), WELL_BG).dim();
                self.draw_piece(fb, origin, &ghost, '░', style);
            }
            let style = CellStyle::new(piece_color(active.kind), WELL_BG).bold();
            self.draw_piece(fb, origin, &active, '█', style);
        }

        self.draw_side_panel(fb, state, viewport, origin, frame_w);

        if state.over {
            self.draw_overlay_text(fb, origin, frame_w, frame_h, "GAME OVER");
        } else if state.paused {
            self.draw_overlay_text(fb, origin, frame_w, frame_h, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, state: &GameState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(state, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, origin: Origin, w: u16, h: u16) {
        let style = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let Origin { x, y } = origin;

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    /// Piece cells in hidden rows or off the board are not drawn
    fn draw_piece(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        piece: &ActivePiece,
        ch: char,
        style: CellStyle,
    ) {
        for (x, y) in piece.cells() {
            let vy = y - HIDDEN_ROWS as i8;
            if x < 0 || x >= BOARD_WIDTH as i8 || vy < 0 || vy >= VISIBLE_ROWS as i8 {
                continue;
            }
            self.fill_cell(fb, origin, x as u16, vy as u16, ch, style);
        }
    }

    /// Fill one board cell; `vy` counts visible rows from the top
    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        x: u16,
        vy: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = origin.x + 1 + x * self.cell_w;
        let py = origin.y + 1 + vy * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        state: &GameState,
        viewport: Viewport,
        origin: Origin,
        frame_w: u16,
    ) {
        let panel_x = origin.x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 4 * self.cell_w {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = origin.y;
        for (name, number) in [
            ("SCORE", state.score),
            ("LEVEL", state.level),
            ("LINES", state.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), number, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for &kind in state.next_queue.iter().take(NEXT_SHOWN) {
            if y >= viewport.height {
                break;
            }
            self.draw_preview(fb, panel_x, y, kind);
            y = y.saturating_add(3);
        }
    }

    /// North orientation in two rows; every kind fits in the top half of its box
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
        let bitmap = shape_at(kind, Rotation::North);
        let style = CellStyle::new(piece_color(kind), PANEL_BG);
        for (row, bits) in bitmap.iter().take(2).enumerate() {
            for (col, &filled) in bits.iter().enumerate() {
                if filled {
                    fb.fill_rect(
                        x + col as u16 * self.cell_w,
                        y + row as u16,
                        self.cell_w,
                        1,
                        '█',
                        style,
                    );
                }
            }
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = origin.y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = origin.x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Store;

    fn top_view() -> GameView {
        GameView::default().with_anchor_y(AnchorY::Top)
    }

    /// Occurrences of `ch` inside the well of a top-anchored default view
    fn well_count(fb: &FrameBuffer, ch: char) -> usize {
        let left = (fb.width() - 22) / 2;
        (1..21)
            .flat_map(|y| (left + 1..left + 21).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get(x, y).map(|c| c.ch) == Some(ch))
            .count()
    }

    #[test]
    fn frame_is_twenty_rows_plus_border() {
        let store = Store::new(1);
        let fb = top_view().render(store.state(), Viewport::new(60, 30));
        assert!(fb.row_text(0).contains('┌'));
        assert!(fb.row_text(21).contains('└'));
        assert!(fb.row_text(20).contains('│'));
    }

    #[test]
    fn hidden_rows_are_not_drawn() {
        let mut store = Store::new(1);
        let mut board = store.state().board.clone();
        board.set(0, 0, PieceKind::T.id());
        board.set(0, 1, PieceKind::T.id());
        board.set(0, 2, PieceKind::Z.id());
        store.set_board(board);

        let view = top_view();
        let fb = view.render(store.state(), Viewport::new(60, 30));
        let (frame_w, _) = view.frame_size();
        let left = (60 - frame_w) / 2;

        // First visible row is board row 2.
        let cell = fb.get(left + 1, 1).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, piece_color(PieceKind::Z));
        let below = fb.get(left + 1, 2).unwrap();
        assert_eq!(below.ch, '·');
    }

    #[test]
    fn spawned_piece_in_hidden_rows_is_invisible() {
        let mut store = Store::new(1);
        store.set_active(Some(ActivePiece::spawn(PieceKind::O)));
        let view = top_view().with_ghost(false);
        let fb = view.render(store.state(), Viewport::new(60, 30));
        assert_eq!(well_count(&fb, '█'), 0);
    }

    #[test]
    fn active_and_ghost_are_drawn() {
        let mut store = Store::new(1);
        store.set_active(Some(ActivePiece::spawn(PieceKind::I).shifted(0, 3)));
        let fb = top_view().render(store.state(), Viewport::new(24, 30));
        // Narrow viewport: no side panel, only the well.
        assert_eq!(well_count(&fb, '█'), 8);
        assert_eq!(well_count(&fb, '░'), 8);
        assert_eq!(fb.row_text(20).matches('░').count(), 8);
    }

    #[test]
    fn side_panel_shows_stats_and_three_next_pieces() {
        let mut store = Store::new(1);
        store.add_score(1200);
        store.add_lines(12);
        let fb = top_view().render(store.state(), Viewport::new(60, 30));

        let text: Vec<String> = (0..30).map(|y| fb.row_text(y)).collect();
        assert!(text[0].contains("SCORE"));
        assert!(text[1].contains("1200"));
        assert!(text[3].contains("LEVEL"));
        assert!(text[4].contains('2'));
        assert!(text[6].contains("LINES"));
        assert!(text[7].contains("12"));
        assert!(text[9].contains("NEXT"));
        let panel_has_block = |y: usize| text[y].chars().skip(43).any(|c| c == '█');
        for slot in 0..3 {
            let top = 10 + slot * 3;
            assert!(panel_has_block(top) || panel_has_block(top + 1), "slot {}", slot);
        }
        assert!(!panel_has_block(19));
    }

    #[test]
    fn overlays() {
        let mut store = Store::new(1);
        store.set_paused(true);
        let fb = top_view().render(store.state(), Viewport::new(60, 30));
        assert!((0..30).any(|y| fb.row_text(y).contains("PAUSED")));

        store.set_over(true);
        let fb = top_view().render(store.state(), Viewport::new(60, 30));
        assert!((0..30).any(|y| fb.row_text(y).contains("GAME OVER")));
        assert!(!(0..30).any(|y| fb.row_text(y).contains("PAUSED")));
    }
}
