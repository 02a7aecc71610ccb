//! Fork detection: one attacker hitting two or more enemy pieces.

use super::{ForkInfo, Motif, new_motifs};
use crate::oracle::BoardQuery;
use crate::types::{Color, Move, PieceRef, Square};
use std::collections::BTreeMap;

impl Motif for ForkInfo {
    /// The attacker plus the set of squares it hits, so a fork whose
    /// target set grew or shrank counts as new.
    type Key = (PieceRef, Vec<Square>);

    fn key(&self) -> Self::Key {
        let mut squares: Vec<Square> = self.forked_pieces.iter().map(|p| p.square).collect();
        squares.sort();
        (self.forking_piece, squares)
    }
}

/// Forks by the mover that exist after the move but not before it.
pub fn detect_forks<B: BoardQuery + ?Sized>(after: &B, before: &B, mv: &Move) -> Vec<ForkInfo> {
    let existing = forks_on(before, mv.color);
    new_motifs(forks_on(after, mv.color), &existing)
}

/// Every fork by pieces of `attacker_color` on `board`.
pub fn forks_on<B: BoardQuery + ?Sized>(board: &B, attacker_color: Color) -> Vec<ForkInfo> {
    let mut targets: BTreeMap<Square, Vec<PieceRef>> = BTreeMap::new();
    for victim in board.pieces_of_color(attacker_color.opponent()) {
        for attacker in board.attackers_of(victim.square, attacker_color) {
            targets.entry(attacker).or_default().push(victim);
        }
    }

    targets
        .into_iter()
        .filter(|(_, victims)| victims.len() >= 2)
        .filter_map(|(square, mut victims)| {
            let piece = board.piece_at(square)?;
            victims.sort_by_key(|p| p.square);
            Some(ForkInfo {
                color: attacker_color,
                forking_piece: PieceRef::new(piece.kind, square),
                forked_pieces: victims,
            })
        })
        .collect()
}
