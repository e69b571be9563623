//! Pieces module - tetromino shape table and the active piece
//!
//! Every kind has one canonical 4x4 bitmap in the North (spawn) orientation.
//! The other orientations are produced by rotating that bitmap clockwise
//! inside its 4x4 box, so East/South/West are never stored.

use crate::types::{PieceKind, Rotation};

/// 4x4 occupancy grid, indexed `[row][col]`.
pub type Bitmap = [[bool; 4]; 4];

/// Offset of a single mino relative to the top-left of the 4x4 box
pub type MinoOffset = (i8, i8);

/// The four minos of a piece, in row-major order
pub type PieceShape = [MinoOffset; 4];

/// North bitmaps, one row per nibble (bit 3 = column 0).
const NORTH_ROWS: [[u8; 4]; 7] = [
    // I
    [0b0000, 0b1111, 0b0000, 0b0000],
    // O
    [0b0110, 0b0110, 0b0000, 0b0000],
    // T
    [0b0100, 0b1110, 0b0000, 0b0000],
    // L
    [0b0010, 0b1110, 0b0000, 0b0000],
    // J
    [0b1000, 0b1110, 0b0000, 0b0000],
    // S
    [0b0110, 0b1100, 0b0000, 0b0000],
    // Z
    [0b1100, 0b0110, 0b0000, 0b0000],
];

/// Canonical North bitmap for a kind.
pub fn north_bitmap(kind: PieceKind) -> Bitmap {
    let rows = &NORTH_ROWS[kind.id() as usize - 1];
    let mut out = [[false; 4]; 4];
    for (y, bits) in rows.iter().enumerate() {
        for (x, cell) in out[y].iter_mut().enumerate() {
            *cell = bits & (0b1000 >> x) != 0;
        }
    }
    out
}

/// Rotate a bitmap 90° clockwise inside its 4x4 box.
pub fn rotate_bitmap_cw(bitmap: &Bitmap) -> Bitmap {
    let mut out = [[false; 4]; 4];
    for (y, row) in out.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = bitmap[3 - x][y];
        }
    }
    out
}

/// Bitmap of `kind` after `rotation.index()` clockwise quarter turns.
pub fn shape_at(kind: PieceKind, rotation: Rotation) -> Bitmap {
    let mut bitmap = north_bitmap(kind);
    for _ in 0..rotation.index() {
        bitmap = rotate_bitmap_cw(&bitmap);
    }
    bitmap
}

/// Mino offsets for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let bitmap = shape_at(kind, rotation);
    let mut out = [(0i8, 0i8); 4];
    let mut n = 0usize;
    for (y, row) in bitmap.iter().enumerate() {
        for (x, &filled) in row.iter().enumerate() {
            if filled {
                // Every bitmap holds exactly four minos.
                out[n] = (x as i8, y as i8);
                n += 1;
            }
        }
    }
    debug_assert_eq!(n, 4, "{:?} {:?} does not have four minos", kind, rotation);
    out
}

/// Spawn row: the top of the 4x4 box sits on the topmost hidden row.
pub const SPAWN_Y: i8 = 0;

/// Spawn column of the 4x4 box. O is shifted one column right so the square
/// lands over the middle two columns.
pub fn spawn_x(kind: PieceKind) -> i8 {
    match kind {
        PieceKind::O => 4,
        _ => 3,
    }
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
}

impl ActivePiece {
    /// Standard spawn pose for a kind
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            x: spawn_x(kind),
            y: SPAWN_Y,
            rotation: Rotation::North,
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Board coordinates of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Same piece shifted by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Position/orientation signature used to detect movement while grounded.
    pub fn signature(&self) -> PieceSignature {
        PieceSignature {
            x: self.x,
            y: self.y,
            rotation: self.rotation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSignature {
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn north_bitmaps_match_the_table() {
        let t = north_bitmap(PieceKind::T);
        assert_eq!(t[0], [false, true, false, false]);
        assert_eq!(t[1], [true, true, true, false]);
        assert_eq!(t[2], [false; 4]);

        let i = north_bitmap(PieceKind::I);
        assert_eq!(i[1], [true; 4]);
    }

    #[test]
    fn rotation_zero_is_the_canonical_bitmap() {
        for kind in PieceKind::ALL {
            assert_eq!(shape_at(kind, Rotation::North), north_bitmap(kind));
        }
    }

    #[test]
    fn four_clockwise_turns_restore_the_bitmap() {
        for kind in PieceKind::ALL {
            let mut b = north_bitmap(kind);
            for _ in 0..4 {
                b = rotate_bitmap_cw(&b);
            }
            assert_eq!(b, north_bitmap(kind));
        }
    }

    #[test]
    fn i_piece_orientations_follow_srs_columns_and_rows() {
        assert_eq!(
            get_shape(PieceKind::I, Rotation::North),
            [(0, 1), (1, 1), (2, 1), (3, 1)]
        );
        assert_eq!(
            get_shape(PieceKind::I, Rotation::East),
            [(2, 0), (2, 1), (2, 2), (2, 3)]
        );
        assert_eq!(
            get_shape(PieceKind::I, Rotation::South),
            [(0, 2), (1, 2), (2, 2), (3, 2)]
        );
        assert_eq!(
            get_shape(PieceKind::I, Rotation::West),
            [(1, 0), (1, 1), (1, 2), (1, 3)]
        );
    }

    #[test]
    fn t_piece_east_is_the_box_rotation() {
        assert_eq!(
            get_shape(PieceKind::T, Rotation::East),
            [(2, 0), (2, 1), (3, 1), (2, 2)]
        );
    }

    #[test]
    fn every_orientation_has_four_minos() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let bitmap = shape_at(kind, Rotation::from_index(r));
                let n = bitmap.iter().flatten().filter(|&&c| c).count();
                assert_eq!(n, 4, "{:?} rotation {}", kind, r);
            }
        }
    }

    #[test]
    fn spawn_pose_shifts_o_one_column_right() {
        let o = ActivePiece::spawn(PieceKind::O);
        assert_eq!((o.x, o.y, o.rotation), (4, 0, Rotation::North));

        let t = ActivePiece::spawn(PieceKind::T);
        assert_eq!((t.x, t.y, t.rotation), (3, 0, Rotation::North));
    }

    #[test]
    fn cells_are_box_offsets_plus_position() {
        let p = ActivePiece::spawn(PieceKind::O);
        assert_eq!(p.cells(), [(5, 0), (6, 0), (5, 1), (6, 1)]);
    }
}
