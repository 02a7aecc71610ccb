//! Pin detection: a lesser piece shielding a more valuable one.

use super::{Motif, PinInfo, new_motifs};
use crate::oracle::BoardQuery;
use crate::raycast::RayCastCache;
use crate::types::{Color, Move, PieceKind, PieceRef, Square};

impl Motif for PinInfo {
    type Key = (PieceRef, Square, Square);

    fn key(&self) -> Self::Key {
        (
            self.pinning_piece,
            self.pinned_piece.square,
            self.shielded_piece.square,
        )
    }
}

/// Pins against the opponent that exist after the move but not before it.
pub fn detect_pins<B: BoardQuery + Clone>(
    after: &B,
    before: &B,
    mv: &Move,
    cache: &mut RayCastCache,
) -> Vec<PinInfo> {
    let victim = mv.color.opponent();
    let existing = pins_on(before, victim, cache);
    new_motifs(pins_on(after, victim, cache), &existing)
}

/// Every pin against pieces of `victim` on `board`.
pub fn pins_on<B: BoardQuery + Clone>(
    board: &B,
    victim: Color,
    cache: &mut RayCastCache,
) -> Vec<PinInfo> {
    cache
        .casts(board, victim)
        .into_iter()
        .filter(|cast| cast.is_pin())
        .map(|cast| PinInfo {
            color: victim.opponent(),
            pinning_piece: cast.attacker,
            pinned_piece: cast.first_hit,
            shielded_piece: cast.second_hit,
        })
        .collect()
}

/// Whether a pin holds its piece against the king.
pub fn is_absolute(pin: &PinInfo) -> bool {
    pin.shielded_piece.kind == PieceKind::King
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_bishop_pins_knight_to_king() {
        let mv = play("4k3/8/2n5/8/8/8/8/4KB2 w - - 0 1", "f1", "b5");
        let (after, before) = boards(&mv);
        let mut cache = RayCastCache::new();
        let pins = detect_pins(&after, &before, &mv, &mut cache);
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].color, Color::White);
        assert_eq!(pins[0].pinning_piece, PieceRef::new(PieceKind::Bishop, sq("b5")));
        assert_eq!(pins[0].pinned_piece, PieceRef::new(PieceKind::Knight, sq("c6")));
        assert_eq!(pins[0].shielded_piece, PieceRef::new(PieceKind::King, sq("e8")));
        assert!(is_absolute(&pins[0]));
    }

    #[test]
    fn test_existing_pin_is_not_reported_again() {
        // The b5 bishop already pins c6; the king step changes nothing on that line
        let mv = play("4k3/8/2n5/1B6/8/8/8/4K3 w - - 0 1", "e1", "f2");
        let (after, before) = boards(&mv);
        let mut cache = RayCastCache::new();
        assert!(detect_pins(&after, &before, &mv, &mut cache).is_empty());
    }

    #[test]
    fn test_relative_pin_of_knight_to_queen() {
        let mv = play("4k3/3q4/2n5/8/8/8/8/3BK3 w - - 0 1", "d1", "a4");
        let (after, before) = boards(&mv);
        let mut cache = RayCastCache::new();
        let pins = detect_pins(&after, &before, &mv, &mut cache);
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].shielded_piece, PieceRef::new(PieceKind::Queen, sq("d7")));
        assert!(!is_absolute(&pins[0]));
    }
}
