//! Attack detection and piece movement for the built-in board.
//!
//! This covers what the tactics engine asks of a board:
//!
//! - Which pieces of a color attack a square (sliders stop at the first
//!   blocker, pawns attack diagonally forward)
//! - Whether a king is in check
//! - Where a single piece may move by its movement pattern
//! - Applying a recorded move to a board (castling rook, en passant
//!   victim and promotion included)

use crate::geometry::{Direction, BISHOP_DIRS, KNIGHT_OFFSETS, QUEEN_DIRS, ROOK_DIRS};
use crate::position::Board;
use crate::types::*;

// ---------------------------------------------------------------------------
// Attack detection
// ---------------------------------------------------------------------------

/// Returns every square holding a piece of `attacker_color` that attacks `sq`.
///
/// Order: knights, king, pawns, then diagonal sliders and orthogonal
/// sliders in direction order.
pub fn attackers_of(board: &Board, sq: Square, attacker_color: Color) -> Vec<Square> {
    let mut attackers = Vec::new();

    for &(df, dr) in &KNIGHT_OFFSETS {
        if let Some(from) = sq.offset(df, dr)
            && let Some(piece) = board.get(from)
            && piece.color == attacker_color && piece.kind == PieceKind::Knight
        {
            attackers.push(from);
        }
    }

    // One square in any direction
    for &(df, dr) in &QUEEN_DIRS {
        if let Some(from) = sq.offset(df, dr)
            && let Some(piece) = board.get(from)
            && piece.color == attacker_color && piece.kind == PieceKind::King
        {
            attackers.push(from);
        }
    }

    // The attacking pawn sits below (white) or above (black) the target
    let pawn_dir = attacker_color.pawn_direction();
    for df in [-1i8, 1] {
        if let Some(from) = sq.offset(df, -pawn_dir)
            && let Some(piece) = board.get(from)
            && piece.color == attacker_color && piece.kind == PieceKind::Pawn
        {
            attackers.push(from);
        }
    }

    collect_slider_attackers(
        board,
        sq,
        attacker_color,
        &BISHOP_DIRS,
        PieceKind::Bishop,
        &mut attackers,
    );
    collect_slider_attackers(
        board,
        sq,
        attacker_color,
        &ROOK_DIRS,
        PieceKind::Rook,
        &mut attackers,
    );

    attackers
}

/// Walks each ray out of `sq`; the first piece met attacks `sq` if it is
/// a `kind` or a queen of `attacker_color`.
fn collect_slider_attackers(
    board: &Board,
    sq: Square,
    attacker_color: Color,
    directions: &[Direction],
    kind: PieceKind,
    attackers: &mut Vec<Square>,
) {
    for &(df, dr) in directions {
        let mut cur = sq;
        while let Some(next) = cur.offset(df, dr) {
            if let Some(piece) = board.get(next) {
                if piece.color == attacker_color
                    && (piece.kind == kind || piece.kind == PieceKind::Queen)
                {
                    attackers.push(next);
                }
                break; // blocked by another piece
            }
            cur = next;
        }
    }
}

/// Returns `true` if the given square is attacked by any piece of `attacker_color`.
pub fn is_square_attacked(board: &Board, sq: Square, attacker_color: Color) -> bool {
    !attackers_of(board, sq, attacker_color).is_empty()
}

/// Returns `true` if the king of the given color is currently in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king_sq) => is_square_attacked(board, king_sq, color.opponent()),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Per-piece movement
// ---------------------------------------------------------------------------

/// Destinations of the piece on `from` by its movement pattern.
///
/// Captures of enemy pieces are included; own king safety and castling
/// are not considered. Returns an empty list for an empty square.
pub fn destinations_from(board: &Board, from: Square, en_passant: Option<Square>) -> Vec<Square> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    let mut dests = Vec::with_capacity(28);

    match piece.kind {
        PieceKind::King => step_moves(board, from, piece.color, &QUEEN_DIRS, &mut dests),
        PieceKind::Queen => sliding_moves(board, from, piece.color, &QUEEN_DIRS, &mut dests),
        PieceKind::Rook => sliding_moves(board, from, piece.color, &ROOK_DIRS, &mut dests),
        PieceKind::Bishop => sliding_moves(board, from, piece.color, &BISHOP_DIRS, &mut dests),
        PieceKind::Knight => step_moves(board, from, piece.color, &KNIGHT_OFFSETS, &mut dests),
        PieceKind::Pawn => pawn_moves(board, from, piece.color, en_passant, &mut dests),
    }

    dests
}

/// Generates sliding piece destinations (rook, bishop, queen).
fn sliding_moves(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[Direction],
    dests: &mut Vec<Square>,
) {
    for &(df, dr) in directions {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            match board.get(to) {
                None => {
                    dests.push(to);
                    cur = to;
                }
                Some(target) => {
                    if target.color != color {
                        dests.push(to); // capture
                    }
                    break; // blocked
                }
            }
        }
    }
}

/// Generates single-step destinations (knight jumps, king steps).
fn step_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[Direction],
    dests: &mut Vec<Square>,
) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            match board.get(to) {
                None => dests.push(to),
                Some(target) if target.color != color => dests.push(to),
                Some(_) => {}
            }
        }
    }
}

/// Generates pawn destinations (forward steps, captures, en passant).
fn pawn_moves(
    board: &Board,
    from: Square,
    color: Color,
    en_passant: Option<Square>,
    dests: &mut Vec<Square>,
) {
    let dir = color.pawn_direction();

    // Single step forward
    if let Some(one_ahead) = from.offset(0, dir)
        && board.get(one_ahead).is_none()
    {
        dests.push(one_ahead);

        // Double step from starting rank
        if from.rank == color.pawn_start_rank()
            && let Some(two_ahead) = from.offset(0, dir * 2)
            && board.get(two_ahead).is_none()
        {
            dests.push(two_ahead);
        }
    }

    // Diagonal captures
    for df in [-1i8, 1] {
        if let Some(to) = from.offset(df, dir) {
            let enemy = matches!(board.get(to), Some(target) if target.color != color);
            if enemy || en_passant == Some(to) {
                dests.push(to);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Move application
// ---------------------------------------------------------------------------

/// Applies a move to a board (mutating it).
///
/// This handles:
/// - Normal moves and captures
/// - Castling (moves both king and rook)
/// - En passant (removes the captured pawn)
/// - Promotion (replaces pawn with promoted piece)
///
/// Does nothing when `from` is empty.
pub fn apply_move_to_board(board: &mut Board, from: Square, to: Square, flags: &MoveFlags) {
    let Some(piece) = board.get(from) else {
        return;
    };

    board.set(from, None);

    if flags.is_castling() {
        let rank = from.rank;
        let (rook_from, rook_to) = if flags.castle_kingside {
            (Square::new(7, rank), Square::new(5, rank))
        } else {
            (Square::new(0, rank), Square::new(3, rank))
        };
        let rook = board.get(rook_from);
        board.set(rook_from, None);
        board.set(rook_to, rook);
    }

    if flags.en_passant
        && let Some(victim) = to.offset(0, -piece.color.pawn_direction())
    {
        board.set(victim, None);
    }

    let placed = match flags.promotion {
        Some(kind) => Piece::new(kind, piece.color),
        None => piece,
    };
    board.set(to, Some(placed));
}
