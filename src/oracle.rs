//! The board query interface the tactics engine runs against.
//!
//! Move legality, check adjudication and FEN handling belong to the
//! surrounding game engine. Detectors only need the narrow set of
//! queries in [`BoardQuery`], so any engine can plug in by implementing
//! it. [`crate::position::Position`] is the built-in implementation.
//!
//! Ray validation has to try pieces on other squares. That mutation is
//! always done through a [`Scratch`] guard, which restores the board on
//! every exit path when it goes out of scope.

use crate::types::{Color, Piece, PieceRef, Square};
use std::ops::Deref;

/// Read queries plus reversible mutation over one board position.
pub trait BoardQuery {
    /// Returns the piece at the given square, if any.
    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// All pieces of one color, in square index order.
    fn pieces_of_color(&self, color: Color) -> Vec<PieceRef>;

    /// Squares of `by`-colored pieces that attack `square`, whatever
    /// stands on it. The order is deterministic.
    fn attackers_of(&self, square: Square, by: Color) -> Vec<Square>;

    /// Returns `true` if the king of the given color is attacked.
    fn is_in_check(&self, color: Color) -> bool;

    /// Destinations the piece on `from` can move to by its movement
    /// rules, ignoring whether its own king would be left in check.
    fn moves_from(&self, from: Square) -> Vec<Square>;

    /// Clears a square and returns what stood there.
    fn remove(&mut self, square: Square) -> Option<Piece>;

    /// Places a piece, replacing any occupant.
    fn put(&mut self, piece: Piece, square: Square);

    /// Textual serialization of the position, used as a cache key.
    fn fen(&self) -> String;
}

/// Exclusive, self-restoring access to a board for trial mutations.
///
/// Every `remove`/`put` is journaled and undone in reverse order when the
/// guard drops, so early returns cannot leak a half-edited board.
pub struct Scratch<'a, B: BoardQuery + ?Sized> {
    board: &'a mut B,
    undo: Vec<(Square, Option<Piece>)>,
}

impl<'a, B: BoardQuery + ?Sized> Scratch<'a, B> {
    pub fn new(board: &'a mut B) -> Self {
        Self {
            board,
            undo: Vec::new(),
        }
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let previous = self.board.remove(square);
        self.undo.push((square, previous));
        previous
    }

    pub fn put(&mut self, piece: Piece, square: Square) {
        let previous = self.board.piece_at(square);
        self.board.put(piece, square);
        self.undo.push((square, previous));
    }
}

impl<B: BoardQuery + ?Sized> Deref for Scratch<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.board
    }
}

impl<B: BoardQuery + ?Sized> Drop for Scratch<'_, B> {
    fn drop(&mut self) {
        while let Some((square, previous)) = self.undo.pop() {
            match previous {
                Some(piece) => self.board.put(piece, square),
                None => {
                    self.board.remove(square);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::types::PieceKind;

    #[test]
    fn test_scratch_restores_on_drop() {
        let mut pos = Position::from_fen("4k3/8/8/8/4R3/8/8/4K3 w - - 0 1").unwrap();
        let original = pos.fen();
        let e4 = Square::from_algebraic("e4").unwrap();
        let e8 = Square::from_algebraic("e8").unwrap();
        {
            let mut scratch = Scratch::new(&mut pos);
            let rook = scratch.remove(e4).unwrap();
            scratch.put(rook, e8);
            assert_eq!(scratch.piece_at(e8).map(|p| p.kind), Some(PieceKind::Rook));
            assert!(scratch.piece_at(e4).is_none());
        }
        assert_eq!(pos.fen(), original);
    }

    #[test]
    fn test_scratch_restores_on_early_return() {
        fn probe(pos: &mut Position) -> Option<Piece> {
            let mut scratch = Scratch::new(pos);
            scratch.remove(Square::from_algebraic("e1")?);
            scratch.piece_at(Square::from_algebraic("e1")?)?;
            Some(Piece::new(PieceKind::King, Color::White))
        }

        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let original = pos.fen();
        assert!(probe(&mut pos).is_none());
        assert_eq!(pos.fen(), original);
    }
}
