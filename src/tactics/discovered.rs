//! Discovered attack detection.
//!
//! An attack is discovered when a slider of the mover now reaches an
//! enemy piece through a square the move emptied. That is a property of
//! the move itself, so no before/after differencing is needed.

use super::{DiscoveredAttackInfo, arrival_squares, en_passant_victim, moved_piece};
use crate::geometry;
use crate::oracle::BoardQuery;
use crate::types::{Move, PieceKind, PieceRef};

pub fn detect_discovered_attacks<B: BoardQuery + ?Sized>(
    after: &B,
    mv: &Move,
) -> Vec<DiscoveredAttackInfo> {
    if mv.is_return_to_origin() {
        return Vec::new();
    }

    let mut vacated = vec![mv.from];
    vacated.extend(en_passant_victim(mv));
    let arrived = arrival_squares(mv);
    let revealed_by = moved_piece(after, mv);

    let mut found = Vec::new();
    for target in after.pieces_of_color(mv.color.opponent()) {
        for attacker_sq in after.attackers_of(target.square, mv.color) {
            if arrived.contains(&attacker_sq) {
                continue;
            }
            let Some(attacker) = after.piece_at(attacker_sq) else {
                continue;
            };
            if !attacker.kind.is_slider() {
                continue;
            }
            let opened = vacated
                .iter()
                .any(|&sq| geometry::is_strictly_between(attacker_sq, target.square, sq));
            if opened {
                found.push(DiscoveredAttackInfo {
                    color: mv.color,
                    attacker: PieceRef::new(attacker.kind, attacker_sq),
                    target,
                    revealed_by,
                    is_check: target.kind == PieceKind::King,
                });
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_knight_uncovers_bishop_on_rook() {
        let mv = play("4k2r/8/8/8/3N4/8/1B6/4K3 w - - 0 1", "d4", "f5");
        let (after, _) = boards(&mv);
        let found = detect_discovered_attacks(&after, &mv);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attacker, PieceRef::new(PieceKind::Bishop, sq("b2")));
        assert_eq!(found[0].target, PieceRef::new(PieceKind::Rook, sq("h8")));
        assert_eq!(found[0].revealed_by, PieceRef::new(PieceKind::Knight, sq("f5")));
        assert!(!found[0].is_check);
    }

    #[test]
    fn test_discovered_check_is_flagged() {
        let mv = play("4k3/8/8/8/4N3/8/8/K3R3 w - - 0 1", "e4", "c5");
        let (after, _) = boards(&mv);
        let found = detect_discovered_attacks(&after, &mv);
        assert_eq!(found.len(), 1);
        assert!(found[0].is_check);
        assert_eq!(found[0].attacker, PieceRef::new(PieceKind::Rook, sq("e1")));
    }

    #[test]
    fn test_moving_slider_itself_discovers_nothing() {
        // The rook moves along its own line; its attack is direct, not discovered
        let mv = play("4k3/8/8/8/8/8/8/K3R3 w - - 0 1", "e1", "e2");
        let (after, _) = boards(&mv);
        assert!(detect_discovered_attacks(&after, &mv).is_empty());
    }

    #[test]
    fn test_en_passant_victim_square_opens_diagonal() {
        // The captured c5 pawn was the only blocker between a3 and e7
        let mv = play("8/4k3/8/2pP4/8/B7/8/4K3 w - c6 0 1", "d5", "c6");
        assert!(mv.flags.en_passant);
        let (after, _) = boards(&mv);
        let found = detect_discovered_attacks(&after, &mv);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attacker, PieceRef::new(PieceKind::Bishop, sq("a3")));
        assert!(found[0].is_check);
        assert_eq!(found[0].revealed_by, PieceRef::new(PieceKind::Pawn, sq("c6")));
    }

    #[test]
    fn test_castling_opens_no_line() {
        // The queen on a1 looks along the rank the king and rook cross
        let mv = play("4k3/8/8/8/8/8/8/Q3K2R w K - 0 1", "e1", "g1");
        assert!(mv.flags.castle_kingside);
        let (after, _) = boards(&mv);
        assert!(detect_discovered_attacks(&after, &mv).is_empty());
        assert_eq!(crate::tactics::en_passant_victim(&mv), None);
    }

    #[test]
    fn test_pawn_move_that_keeps_blocking_discovers_nothing() {
        let mv = play("4k3/8/8/8/8/4P3/8/4R1K1 w - - 0 1", "e3", "e4");
        let (after, _) = boards(&mv);
        assert!(detect_discovered_attacks(&after, &mv).is_empty());
    }
}
