//! Direct defence: the moving piece now guards a friendly piece that the
//! opponent attacks.

use super::{DefenceInfo, Motif, moved_piece, new_motifs};
use crate::oracle::BoardQuery;
use crate::types::{Move, PieceKind, PieceRef, Square};

impl Motif for DefenceInfo {
    type Key = PieceRef;

    fn key(&self) -> PieceRef {
        self.defended
    }
}

/// Attacked friendly pieces the moved piece guards after the move and
/// did not already guard from its origin.
pub fn detect_defences<B: BoardQuery + ?Sized>(
    after: &B,
    before: &B,
    mv: &Move,
) -> Vec<DefenceInfo> {
    if mv.is_return_to_origin() {
        return Vec::new();
    }
    let defender = moved_piece(after, mv);
    let existing = defences_by(before, mv, PieceRef::new(mv.piece, mv.from));
    new_motifs(defences_by(after, mv, defender), &existing)
}

fn defences_by<B: BoardQuery + ?Sized>(
    board: &B,
    mv: &Move,
    defender: PieceRef,
) -> Vec<DefenceInfo> {
    board
        .pieces_of_color(mv.color)
        .into_iter()
        .filter(|p| p.kind != PieceKind::King && p.square != defender.square)
        .filter(|p| is_attacked(board, mv, p.square))
        .filter(|p| board.attackers_of(p.square, mv.color).contains(&defender.square))
        .map(|defended| DefenceInfo {
            color: mv.color,
            defender,
            defended,
        })
        .collect()
}

fn is_attacked<B: BoardQuery + ?Sized>(board: &B, mv: &Move, square: Square) -> bool {
    !board.attackers_of(square, mv.color.opponent()).is_empty()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_rook_steps_over_to_guard_attacked_knight() {
        let mv = play("k3r3/8/8/8/4N3/8/8/R6K w - - 0 1", "a1", "a4");
        let (after, before) = boards(&mv);
        let found = detect_defences(&after, &before, &mv);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].defender, PieceRef::new(PieceKind::Rook, sq("a4")));
        assert_eq!(found[0].defended, PieceRef::new(PieceKind::Knight, sq("e4")));
    }

    #[test]
    fn test_existing_guard_is_not_new() {
        let mv = play("k3r3/8/8/8/R3N3/8/8/7K w - - 0 1", "a4", "b4");
        let (after, before) = boards(&mv);
        assert!(detect_defences(&after, &before, &mv).is_empty());
    }

    #[test]
    fn test_unattacked_piece_needs_no_defence() {
        let mv = play("k7/8/8/8/4N3/8/8/R6K w - - 0 1", "a1", "a4");
        let (after, before) = boards(&mv);
        assert!(detect_defences(&after, &before, &mv).is_empty());
    }
}
