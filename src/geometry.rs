//! Line geometry on the 8×8 board.
//!
//! Directions are unit vectors `(df, dr)`; a line is valid when it runs
//! along a rank, a file or a diagonal.

use crate::oracle::BoardQuery;
use crate::types::{Piece, PieceKind, Square};

/// A unit step along a rank, file or diagonal.
pub type Direction = (i8, i8);

/// Direction vectors for sliding pieces.
pub const ROOK_DIRS: [Direction; 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const BISHOP_DIRS: [Direction; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub const QUEEN_DIRS: [Direction; 8] = [
    (-1, 0), (1, 0), (0, -1), (0, 1),
    (-1, -1), (-1, 1), (1, -1), (1, 1),
];

/// Knight jump offsets.
pub const KNIGHT_OFFSETS: [Direction; 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

/// Returns the sliding directions of a piece kind (empty for non-sliders).
pub fn slider_directions(kind: PieceKind) -> &'static [Direction] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRS,
        PieceKind::Rook => &ROOK_DIRS,
        PieceKind::Queen => &QUEEN_DIRS,
        _ => &[],
    }
}

/// Whether a piece of `kind` slides along `dir`.
pub fn slides_along(kind: PieceKind, dir: Direction) -> bool {
    slider_directions(kind).contains(&dir)
}

/// The unit direction from `from` toward `to`, if both lie on one
/// rank, file or diagonal and differ.
pub fn direction_between(from: Square, to: Square) -> Option<Direction> {
    let (fx, fy) = from.xy();
    let (tx, ty) = to.xy();
    let (dx, dy) = (tx - fx, ty - fy);
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx == 0 || dy == 0 || dx.abs() == dy.abs() {
        Some((dx.signum(), dy.signum()))
    } else {
        None
    }
}

/// Whether `s` lies strictly between `a` and `b` on a common line.
pub fn is_strictly_between(a: Square, b: Square, s: Square) -> bool {
    match (direction_between(a, b), direction_between(a, s)) {
        (Some(ab), Some(as_)) if ab == as_ => chebyshev(a, s) < chebyshev(a, b),
        _ => false,
    }
}

/// Max of the file and rank deltas.
pub fn chebyshev(a: Square, b: Square) -> u32 {
    let (ax, ay) = a.xy();
    let (bx, by) = b.xy();
    (ax - bx).unsigned_abs().max((ay - by).unsigned_abs()) as u32
}

/// Walks from `from` (exclusive) along `dir` and returns the first
/// occupied square with its piece.
pub fn first_piece_along<B: BoardQuery + ?Sized>(
    board: &B,
    from: Square,
    dir: Direction,
) -> Option<(Square, Piece)> {
    let mut cur = from;
    while let Some(next) = cur.offset(dir.0, dir.1) {
        if let Some(piece) = board.piece_at(next) {
            return Some((next, piece));
        }
        cur = next;
    }
    None
}
