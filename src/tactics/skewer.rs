//! Skewer detection: a valuable piece in front of a lesser one.
//!
//! Uses the same ray casts as pin detection; a cast is a skewer exactly
//! when it is not a pin.

use super::{Motif, SkewerInfo, new_motifs};
use crate::oracle::BoardQuery;
use crate::raycast::RayCastCache;
use crate::types::{Color, Move, PieceRef, Square};

impl Motif for SkewerInfo {
    type Key = (PieceRef, Square, Square);

    fn key(&self) -> Self::Key {
        (
            self.skewering_piece,
            self.front_piece.square,
            self.back_piece.square,
        )
    }
}

/// Skewers against the opponent that exist after the move but not before it.
pub fn detect_skewers<B: BoardQuery + Clone>(
    after: &B,
    before: &B,
    mv: &Move,
    cache: &mut RayCastCache,
) -> Vec<SkewerInfo> {
    let victim = mv.color.opponent();
    let existing = skewers_on(before, victim, cache);
    new_motifs(skewers_on(after, victim, cache), &existing)
}

pub fn skewers_on<B: BoardQuery + Clone>(
    board: &B,
    victim: Color,
    cache: &mut RayCastCache,
) -> Vec<SkewerInfo> {
    cache
        .casts(board, victim)
        .into_iter()
        .filter(|cast| cast.is_skewer())
        .map(|cast| SkewerInfo {
            color: victim.opponent(),
            skewering_piece: cast.attacker,
            front_piece: cast.first_hit,
            back_piece: cast.second_hit,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::tactics::pin;
    use crate::types::PieceKind;

    #[test]
    fn test_rook_skewers_king_onto_rook() {
        let mv = play("r3k3/8/8/8/8/8/8/4K2R w - - 0 1", "h1", "h8");
        let (after, before) = boards(&mv);
        let mut cache = RayCastCache::new();
        let skewers = detect_skewers(&after, &before, &mv, &mut cache);
        assert_eq!(skewers.len(), 1);
        assert_eq!(skewers[0].skewering_piece, PieceRef::new(PieceKind::Rook, sq("h8")));
        assert_eq!(skewers[0].front_piece, PieceRef::new(PieceKind::King, sq("e8")));
        assert_eq!(skewers[0].back_piece, PieceRef::new(PieceKind::Rook, sq("a8")));
    }

    #[test]
    fn test_equal_values_count_as_skewer() {
        let mv = play("4k3/8/8/r2r4/8/8/8/4K2R w - - 0 1", "h1", "h5");
        let (after, before) = boards(&mv);
        let mut cache = RayCastCache::new();
        let skewers = detect_skewers(&after, &before, &mv, &mut cache);
        assert_eq!(skewers.len(), 1);
        assert_eq!(skewers[0].front_piece, PieceRef::new(PieceKind::Rook, sq("d5")));
        assert_eq!(skewers[0].back_piece, PieceRef::new(PieceKind::Rook, sq("a5")));
        assert!(pin::detect_pins(&after, &before, &mv, &mut cache).is_empty());
    }

    #[test]
    fn test_existing_skewer_is_not_reported_again() {
        // The h5 rook already skewers d5 onto a5; White only moves the king
        let mv = play("4k3/8/8/r2r3R/8/8/8/4K3 w - - 0 1", "e1", "e2");
        let (after, before) = boards(&mv);
        let mut cache = RayCastCache::new();
        assert_eq!(skewers_on(&before, Color::Black, &mut cache).len(), 1);
        assert!(detect_skewers(&after, &before, &mv, &mut cache).is_empty());
    }

    #[test]
    fn test_pins_and_skewers_partition_casts() {
        let fens = [
            "4k3/8/2n5/1B6/8/8/8/4K3 b - - 0 1",
            "4k3/8/8/r2q3R/8/8/8/4K3 b - - 0 1",
            "r3k2R/8/8/8/8/8/8/4K3 b - - 0 1",
            "4k3/3q4/2n5/8/B7/8/8/4K3 b - - 0 1",
        ];
        for fen in fens {
            let pos = crate::position::Position::from_fen(fen).unwrap();
            let mut cache = RayCastCache::new();
            let total = cache.casts(&pos, Color::Black).len();
            let pins = pin::pins_on(&pos, Color::Black, &mut cache).len();
            let skewers = skewers_on(&pos, Color::Black, &mut cache).len();
            assert_eq!(pins + skewers, total, "{}", fen);
            assert!(total > 0, "{}", fen);
        }
    }
}
