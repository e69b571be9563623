//! Board module - the playfield grid, collision and line clearing
//!
//! The board is a 10x22 grid: two hidden spawn rows on top of twenty visible
//! rows. Cells hold `0` when empty or the identifier of the piece kind that
//! filled them. Storage is a flat row-major array, so a `Board` is a plain
//! value that is cheap to clone into a new snapshot.
//!
//! Coordinates: (x, y) where x ranges 0..9 (left to right) and y ranges
//! 0..21 (top to bottom). Rows above the top (negative y) are outside the
//! grid but never count as a collision.

use arrayvec::ArrayVec;

use crate::pieces::ActivePiece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, EMPTY, HIDDEN_ROWS};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// The game board - 10 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

/// Result of removing full rows from a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    pub board: Board,
    /// Number of rows removed
    pub cleared: usize,
    /// Indices (in the input board) of the removed rows, top to bottom
    pub rows: ArrayVec<usize, HEIGHT>,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [EMPTY; BOARD_SIZE],
        }
    }

    /// Build a board from rows, top to bottom.
    ///
    /// # Panics
    ///
    /// Panics unless there are exactly `BOARD_HEIGHT` rows of `BOARD_WIDTH`
    /// cells. A non-rectangular board is a construction defect, not input
    /// to recover from.
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Self {
        assert_eq!(rows.len(), HEIGHT, "board must have {} rows", HEIGHT);
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(row.len(), WIDTH, "row {} must have {} cells", y, WIDTH);
            board.cells[y * WIDTH..(y + 1) * WIDTH].copy_from_slice(row);
        }
        board
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y); `None` if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y); returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(c) if c != EMPTY)
    }

    /// One row of cells. Panics if `y` is out of range.
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * WIDTH..(y + 1) * WIDTH]
    }

    /// Rows top to bottom, hidden rows included
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Rows shown to the player (the hidden spawn rows are skipped)
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows().skip(HIDDEN_ROWS as usize)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < HEIGHT && self.row(y).iter().all(|&c| c != EMPTY)
    }

    /// True if any mino of `piece` is left/right of the walls, below the
    /// floor, or on a filled cell. Minos above the top never collide.
    pub fn collides(&self, piece: &ActivePiece) -> bool {
        piece.cells().iter().any(|&(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    pub fn can_place(&self, piece: &ActivePiece) -> bool {
        !self.collides(piece)
    }

    /// The piece shifted by (dx, dy), if it fits there
    pub fn try_move(&self, piece: &ActivePiece, dx: i8, dy: i8) -> Option<ActivePiece> {
        let moved = piece.shifted(dx, dy);
        self.can_place(&moved).then_some(moved)
    }

    /// Resting on the floor or on locked cells (cannot move one row down)
    pub fn is_grounded(&self, piece: &ActivePiece) -> bool {
        self.try_move(piece, 0, 1).is_none()
    }

    /// How many rows the piece can fall before it is grounded
    pub fn drop_distance(&self, piece: &ActivePiece) -> i8 {
        let mut distance = 0i8;
        while self.can_place(&piece.shifted(0, distance + 1)) {
            distance += 1;
        }
        distance
    }

    /// A copy of this board with the piece's minos stamped in with its kind
    /// identifier. Minos outside the grid are dropped.
    pub fn with_piece(&self, piece: &ActivePiece) -> Board {
        let mut next = self.clone();
        let id = piece.kind.id();
        for (x, y) in piece.cells() {
            next.set(x, y, id);
        }
        next
    }

    /// Remove every full row and compact the rest downward
    ///
    /// Uses a two-pointer pass from the bottom: kept rows are copied down to
    /// the write cursor, then the rows above it are emptied. The row count
    /// never changes; with nothing to clear the result equals the input.
    pub fn clear_full_lines(&self) -> LineClear {
        let mut board = self.clone();
        let mut rows = ArrayVec::new();
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    board
                        .cells
                        .copy_within(read_y * WIDTH..(read_y + 1) * WIDTH, write_y * WIDTH);
                }
            }
        }

        board.cells[..write_y * WIDTH].fill(EMPTY);

        rows.reverse();
        LineClear {
            board,
            cleared: rows.len(),
            rows,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, Rotation};

    fn full_row() -> [Cell; WIDTH] {
        [PieceKind::J.id(); WIDTH]
    }

    #[test]
    fn index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 21), Some(219));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 22), None);
    }

    #[test]
    fn from_rows_round_trips_through_rows() {
        let mut rows = vec![[EMPTY; WIDTH]; HEIGHT];
        rows[5][3] = PieceKind::O.id();
        rows[21][9] = PieceKind::Z.id();

        let board = Board::from_rows(&rows);
        let back: Vec<Vec<Cell>> = board.rows().map(|r| r.to_vec()).collect();
        let expected: Vec<Vec<Cell>> = rows.iter().map(|r| r.to_vec()).collect();
        assert_eq!(back, expected);
    }

    #[test]
    #[should_panic(expected = "board must have 22 rows")]
    fn from_rows_rejects_wrong_height() {
        let rows = vec![[EMPTY; WIDTH]; 20];
        let _ = Board::from_rows(&rows);
    }

    #[test]
    #[should_panic(expected = "must have 10 cells")]
    fn from_rows_rejects_ragged_rows() {
        let mut rows = vec![vec![EMPTY; WIDTH]; HEIGHT];
        rows[4].pop();
        let _ = Board::from_rows(&rows);
    }

    #[test]
    fn negative_rows_never_collide() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::I);
        piece.y = -1;
        assert!(!board.collides(&piece));

        piece.rotation = Rotation::East;
        piece.y = -3;
        assert!(!board.collides(&piece));
    }

    #[test]
    fn walls_and_floor_collide() {
        let board = Board::new();
        let piece = ActivePiece::spawn(PieceKind::T);

        assert!(board.collides(&piece.shifted(-4, 0)));
        assert!(board.collides(&piece.shifted(5, 0)));
        assert!(!board.collides(&piece.shifted(0, 20)));
        assert!(board.collides(&piece.shifted(0, 21)));
    }

    #[test]
    fn locked_cells_collide() {
        let mut board = Board::new();
        let piece = ActivePiece::spawn(PieceKind::T);
        board.set(4, 1, PieceKind::S.id());
        assert!(board.collides(&piece));
        assert!(!board.can_place(&piece));
    }

    #[test]
    fn drop_distance_reaches_the_floor() {
        let board = Board::new();
        let piece = ActivePiece::spawn(PieceKind::T);
        // T north occupies box rows 0-1, so its box top can reach row 20.
        assert_eq!(board.drop_distance(&piece), 20);
        assert!(board.is_grounded(&piece.shifted(0, 20)));
        assert!(!board.is_grounded(&piece));
    }

    #[test]
    fn with_piece_stamps_kind_id_and_ignores_offgrid_cells() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::T);
        piece.y = -1;

        let stamped = board.with_piece(&piece);
        // Nub at row -1 is dropped, the bar lands on row 0.
        assert_eq!(stamped.row(0)[3..6], [3, 3, 3]);
        assert_eq!(stamped.cells().iter().filter(|&&c| c != EMPTY).count(), 3);
        // Input board is untouched.
        assert_eq!(board, Board::new());
    }

    #[test]
    fn clear_without_full_rows_returns_equal_board() {
        let mut board = Board::new();
        board.set(0, 21, PieceKind::L.id());
        board.set(7, 12, PieceKind::S.id());

        let result = board.clear_full_lines();
        assert_eq!(result.cleared, 0);
        assert!(result.rows.is_empty());
        assert_eq!(result.board, board);
    }

    #[test]
    fn clear_bottom_rows_shifts_everything_down() {
        let mut rows = vec![[EMPTY; WIDTH]; HEIGHT];
        rows[20] = full_row();
        rows[21] = full_row();
        rows[19][2] = PieceKind::T.id();

        let result = Board::from_rows(&rows).clear_full_lines();
        assert_eq!(result.cleared, 2);
        assert_eq!(result.rows.as_slice(), &[20, 21]);
        assert_eq!(result.board.get(2, 21), Some(PieceKind::T.id()));
        assert_eq!(result.board.row(20), &[EMPTY; WIDTH]);
    }
}
