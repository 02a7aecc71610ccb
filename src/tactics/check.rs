//! Check and double-check detection.
//!
//! The opponent cannot be in check before the mover's own move, so every
//! check found after the move is new and no differencing is needed.

use super::CheckInfo;
use crate::oracle::BoardQuery;
use crate::types::{Move, PieceKind, PieceRef};

/// Reports the check (single or double) the move gives, if any.
///
/// A king reported in check with no attackers, or with more than two, is
/// an upstream legality bug. The first case is logged and yields nothing;
/// the second is logged and reported as a double check by the first two
/// attackers found.
pub fn detect_checks<B: BoardQuery + ?Sized>(after: &B, mv: &Move) -> Vec<CheckInfo> {
    let defender = mv.color.opponent();
    if !after.is_in_check(defender) {
        return Vec::new();
    }

    let Some(king) = after
        .pieces_of_color(defender)
        .into_iter()
        .find(|p| p.kind == PieceKind::King)
    else {
        log::warn!("{} reported in check after {} but has no king", defender, mv);
        return Vec::new();
    };

    let checkers: Vec<PieceRef> = after
        .attackers_of(king.square, mv.color)
        .into_iter()
        .filter_map(|sq| after.piece_at(sq).map(|p| PieceRef::new(p.kind, sq)))
        .collect();

    match checkers.as_slice() {
        [] => {
            log::warn!(
                "{} king on {} reported in check after {} but no attacker found",
                defender,
                king.square,
                mv
            );
            Vec::new()
        }
        [single] => vec![CheckInfo {
            color: mv.color,
            king,
            checking_piece: *single,
            second_checking_piece: None,
            is_double_check: false,
        }],
        [first, second, rest @ ..] => {
            if !rest.is_empty() {
                log::warn!(
                    "{} king on {} attacked by {} pieces after {}; keeping the first two",
                    defender,
                    king.square,
                    checkers.len(),
                    mv
                );
            }
            vec![CheckInfo {
                color: mv.color,
                king,
                checking_piece: *first,
                second_checking_piece: Some(*second),
                is_double_check: true,
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::position::Position;
    use crate::types::{Color, Piece, Square};

    #[test]
    fn test_quiet_move_gives_no_check() {
        let mv = play(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "e2",
            "e4",
        );
        let (after, _) = boards(&mv);
        assert!(detect_checks(&after, &mv).is_empty());
    }

    #[test]
    fn test_knight_check() {
        let mv = play("4k3/8/8/8/8/3N4/8/4K3 w - - 0 1", "d3", "f6");
        let (after, _) = boards(&mv);
        let checks = detect_checks(&after, &mv);
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].color, Color::White);
        assert_eq!(checks[0].checking_piece, PieceRef::new(PieceKind::Knight, sq("f6")));
        assert_eq!(checks[0].king, PieceRef::new(PieceKind::King, sq("e8")));
        assert!(!checks[0].is_double_check);
        assert!(checks[0].second_checking_piece.is_none());
    }

    #[test]
    fn test_knight_and_rook_double_check() {
        // Nd6 uncovers the e1 rook and checks from d6
        let mv = play("4k3/8/8/8/4N3/8/8/K3R3 w - - 0 1", "e4", "d6");
        let (after, _) = boards(&mv);
        let checks = detect_checks(&after, &mv);
        assert_eq!(checks.len(), 1);
        assert!(checks[0].is_double_check);
        let mut pieces = checks[0].checking_pieces();
        pieces.sort();
        let mut expected = vec![
            PieceRef::new(PieceKind::Knight, sq("d6")),
            PieceRef::new(PieceKind::Rook, sq("e1")),
        ];
        expected.sort();
        assert_eq!(pieces, expected);
    }

    #[test]
    fn test_three_attackers_keep_first_two() {
        // Knight d6, bishop b5 and queen e1 all hit e8; only the king moves
        let mv = play("4k3/8/3N4/1B6/8/8/8/4QK2 w - - 0 1", "f1", "g2");
        let (after, _) = boards(&mv);
        assert_eq!(after.attackers_of(sq("e8"), Color::White).len(), 3);
        let checks = detect_checks(&after, &mv);
        assert_eq!(checks.len(), 1);
        assert!(checks[0].is_double_check);
        assert_eq!(checks[0].checking_piece, PieceRef::new(PieceKind::Knight, sq("d6")));
        assert_eq!(
            checks[0].second_checking_piece,
            Some(PieceRef::new(PieceKind::Bishop, sq("b5")))
        );
    }

    /// Reports every king as in check whatever the board says.
    #[derive(Clone)]
    struct AlwaysInCheck(Position);

    impl BoardQuery for AlwaysInCheck {
        fn piece_at(&self, square: Square) -> Option<Piece> {
            self.0.piece_at(square)
        }
        fn pieces_of_color(&self, color: Color) -> Vec<PieceRef> {
            self.0.pieces_of_color(color)
        }
        fn attackers_of(&self, square: Square, by: Color) -> Vec<Square> {
            self.0.attackers_of(square, by)
        }
        fn is_in_check(&self, _color: Color) -> bool {
            true
        }
        fn moves_from(&self, from: Square) -> Vec<Square> {
            self.0.moves_from(from)
        }
        fn remove(&mut self, square: Square) -> Option<Piece> {
            self.0.remove(square)
        }
        fn put(&mut self, piece: Piece, square: Square) {
            self.0.put(piece, square)
        }
        fn fen(&self) -> String {
            self.0.fen()
        }
    }

    #[test]
    fn test_check_without_attacker_reports_nothing() {
        let mv = play("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1", "b1");
        let (after, _) = boards(&mv);
        let inconsistent = AlwaysInCheck(after);
        assert!(detect_checks(&inconsistent, &mv).is_empty());

        let kingless = AlwaysInCheck(Position::from_fen("8/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap());
        assert!(detect_checks(&kingless, &mv).is_empty());
    }

    #[test]
    fn test_black_gives_check() {
        let mv = play("4k3/8/8/8/8/8/3q4/K7 b - - 0 1", "d2", "d1");
        let (after, _) = boards(&mv);
        let checks = detect_checks(&after, &mv);
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].color, Color::Black);
        assert_eq!(checks[0].checking_piece, PieceRef::new(PieceKind::Queen, sq("d1")));
    }
}
