//! Two-hit ray casting, the shared primitive behind pins and skewers.
//!
//! For every piece P of the examined color and every enemy slider A that
//! attacks it, the ray A→P is extended past P to find the next piece of
//! P's color behind it. A candidate only counts when P could actually step
//! off that line; a piece that can only shuffle along the ray is left out.

use crate::geometry::{self, Direction};
use crate::oracle::{BoardQuery, Scratch};
use crate::types::{Color, PieceRef, Square};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A slider's line through one piece onto the piece behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RayCast {
    pub attacker: PieceRef,
    pub direction: Direction,
    pub first_hit: PieceRef,
    pub second_hit: PieceRef,
}

impl RayCast {
    /// A lesser piece shields a more valuable one.
    pub fn is_pin(&self) -> bool {
        self.second_hit.kind.value() > self.first_hit.kind.value()
    }

    /// A valuable-or-equal piece stands in front of a lesser one.
    pub fn is_skewer(&self) -> bool {
        !self.is_pin()
    }
}

/// Collects every two-hit ray cast against pieces of `color`.
///
/// The board is mutated while candidates are tried, always through a
/// [`Scratch`] guard; it is back in its original state on return.
pub fn two_hit_ray_casts<B: BoardQuery + ?Sized>(board: &mut B, color: Color) -> Vec<RayCast> {
    let mut casts = Vec::new();

    for target in board.pieces_of_color(color) {
        for attacker_sq in board.attackers_of(target.square, color.opponent()) {
            let Some(attacker) = board.piece_at(attacker_sq) else {
                continue;
            };
            if !attacker.kind.is_slider() {
                continue;
            }
            let Some(direction) = geometry::direction_between(attacker_sq, target.square) else {
                continue;
            };
            if !can_leave_ray(&mut *board, attacker_sq, direction, target) {
                continue;
            }
            if let Some(second_hit) =
                hit_behind(&mut *board, attacker_sq, direction, target, color)
            {
                casts.push(RayCast {
                    attacker: PieceRef::new(attacker.kind, attacker_sq),
                    direction,
                    first_hit: target,
                    second_hit,
                });
            }
        }
    }

    casts
}

/// Whether the target has a move after which the attacker's ray in
/// `direction` is either clear or stops on some other square.
///
/// Capturing the attacker does not count as leaving the line.
fn can_leave_ray<B: BoardQuery + ?Sized>(
    board: &mut B,
    attacker: Square,
    direction: Direction,
    target: PieceRef,
) -> bool {
    let Some(piece) = board.piece_at(target.square) else {
        return false;
    };
    let destinations = board.moves_from(target.square);

    destinations
        .into_iter()
        .filter(|&dest| dest != attacker)
        .any(|dest| {
            let mut scratch = Scratch::new(&mut *board);
            scratch.remove(target.square);
            scratch.put(piece, dest);
            match geometry::first_piece_along(&*scratch, attacker, direction) {
                None => true,
                Some((hit, _)) => hit != dest,
            }
        })
}

/// The first piece of `color` behind `target` on the attacker's ray.
fn hit_behind<B: BoardQuery + ?Sized>(
    board: &mut B,
    attacker: Square,
    direction: Direction,
    target: PieceRef,
    color: Color,
) -> Option<PieceRef> {
    let mut scratch = Scratch::new(board);
    scratch.remove(target.square);
    let (square, piece) = geometry::first_piece_along(&*scratch, attacker, direction)?;
    (piece.color == color).then(|| PieceRef::new(piece.kind, square))
}

// ---------------------------------------------------------------------------
// Memoization
// ---------------------------------------------------------------------------

/// Ray casts keyed by `(color, FEN)`.
///
/// Pure optimization: pin and skewer detection look at the same casts,
/// so one evaluation can share them. Scope an instance to a single move
/// and clear it afterwards.
#[derive(Debug, Default)]
pub struct RayCastCache {
    entries: HashMap<(Color, String), Vec<RayCast>>,
}

impl RayCastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the casts against `color` on `board`, computing them on a
    /// private copy of the board on a miss.
    pub fn casts<B: BoardQuery + Clone>(&mut self, board: &B, color: Color) -> Vec<RayCast> {
        let key = (color, board.fen());
        if let Some(hit) = self.entries.get(&key) {
            return hit.clone();
        }
        let mut scratch_board = board.clone();
        let casts = two_hit_ray_casts(&mut scratch_board, color);
        self.entries.insert(key, casts.clone());
        casts
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
