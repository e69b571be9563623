//! SRS rotation with wall kicks
//!
//! Kick tables are the guideline SRS offsets expressed on this board's axes,
//! where y grows downward (an upward kick has negative `dy`). Tables are
//! indexed by the source rotation; the target is always one quarter turn away.

use crate::board::Board;
use crate::pieces::ActivePiece;
use crate::types::{PieceKind, Rotation, RotationDir};

/// Kick offset (dx, dy)
pub type Kick = (i8, i8);

/// Five kicks per source rotation
pub type KickTable = [[Kick; 5]; 4];

/// J, L, S, T, Z clockwise: N->E, E->S, S->W, W->N
pub const JLSTZ_CW: KickTable = [
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// J, L, S, T, Z counter-clockwise: N->W, E->N, S->E, W->S
pub const JLSTZ_CCW: KickTable = [
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// I clockwise: N->E, E->S, S->W, W->N
pub const I_CW: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

/// I counter-clockwise: N->W, E->N, S->E, W->S
pub const I_CCW: KickTable = [
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
];

/// Per-rotation position correction for O. Rotating the O bitmap inside its
/// 4x4 box moves the square; the difference of two entries puts it back.
pub const O_OFFSETS: [Kick; 4] = [(0, 0), (-1, -1), (0, -2), (1, -1)];

/// Candidate offsets for rotating `kind` from `from` in direction `dir`,
/// in the order they must be tried.
pub fn kick_candidates(kind: PieceKind, from: Rotation, dir: RotationDir) -> &'static [Kick] {
    let to = from.rotate(dir);
    let src = from.index();
    match (kind, dir) {
        (PieceKind::O, _) => o_kick(src, to.index()),
        (PieceKind::I, RotationDir::Cw) => &I_CW[src],
        (PieceKind::I, RotationDir::Ccw) => &I_CCW[src],
        (_, RotationDir::Cw) => &JLSTZ_CW[src],
        (_, RotationDir::Ccw) => &JLSTZ_CCW[src],
    }
}

/// O has a single candidate per transition. Every pair is precomputed so
/// the candidate slice can stay `'static`.
fn o_kick(from: usize, to: usize) -> &'static [Kick] {
    const fn build() -> [[[Kick; 1]; 4]; 4] {
        let mut out = [[[(0, 0)]; 4]; 4];
        let mut f = 0;
        while f < 4 {
            let mut t = 0;
            while t < 4 {
                out[f][t] = [(
                    O_OFFSETS[t].0 - O_OFFSETS[f].0,
                    O_OFFSETS[t].1 - O_OFFSETS[f].1,
                )];
                t += 1;
            }
            f += 1;
        }
        out
    }
    const O_KICKS: [[[Kick; 1]; 4]; 4] = build();
    &O_KICKS[from][to]
}

/// Rotate `piece` one quarter turn on `board`
///
/// Returns the first candidate pose that does not collide, or `None` when
/// every kick is blocked (the rotation is cancelled).
pub fn try_rotate(board: &Board, piece: &ActivePiece, dir: RotationDir) -> Option<ActivePiece> {
    let rotation = piece.rotation.rotate(dir);
    kick_candidates(piece.kind, piece.rotation, dir)
        .iter()
        .map(|&(dx, dy)| ActivePiece {
            kind: piece.kind,
            x: piece.x + dx,
            y: piece.y + dy,
            rotation,
        })
        .find(|candidate| board.can_place(candidate))
}
