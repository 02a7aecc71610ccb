//! The built-in board and position.
//!
//! `Position` is the default [`BoardQuery`] implementation: a mailbox
//! board plus side to move, castling rights, en passant target and move
//! counters, with FEN round-tripping. It also knows how to provisionally
//! apply a move and record it as a [`Move`] with before/after FEN, which
//! is the input the tactics detectors consume.

use crate::error::PositionError;
use crate::movegen;
use crate::oracle::BoardQuery;
use crate::types::*;

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Represents the chess board as a flat 64-element array.
///
/// Each element is `Option<Piece>`; `None` means the square is empty.
/// Index mapping: `rank * 8 + file` (both 0-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub squares: [Option<Piece>; 64],
}

impl Default for Board {
    /// Returns an empty board.
    fn default() -> Self {
        Self {
            squares: [None; 64],
        }
    }
}

impl Board {
    /// Returns the piece at the given square, if any.
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Sets (or clears) the piece at the given square.
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index()] = piece;
    }

    /// Creates the standard starting position.
    pub fn starting_position() -> Self {
        let mut board = Board::default();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back_rank.into_iter().enumerate() {
            let file = file as u8;
            board.set(Square::new(file, 0), Some(Piece::new(kind, Color::White)));
            board.set(Square::new(file, 1), Some(Piece::new(PieceKind::Pawn, Color::White)));
            board.set(Square::new(file, 6), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            board.set(Square::new(file, 7), Some(Piece::new(kind, Color::Black)));
        }
        board
    }

    /// Finds the king square for the given color.
    /// Returns `None` if the king is not on the board.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| {
            self.get(sq) == Some(Piece::new(PieceKind::King, color))
        })
    }

    /// Iterates occupied squares in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Serializes the piece placement field of a FEN string.
    pub fn placement_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8u8 {
                match self.get(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen
    }

    /// Parses the piece placement field of a FEN string.
    pub fn from_placement_fen(field: &str) -> Result<Self, PositionError> {
        let rows: Vec<&str> = field.split('/').collect();
        if rows.len() != 8 {
            return Err(PositionError::RankCount(rows.len()));
        }

        let mut board = Board::default();
        for (row_index, row) in rows.iter().enumerate() {
            let rank = 7 - row_index as u8;
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 {
                        return Err(PositionError::RankWidth { rank: row_index });
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c).ok_or(PositionError::PieceSymbol(c))?;
                    if file >= 8 {
                        return Err(PositionError::RankWidth { rank: row_index });
                    }
                    board.set(Square::new(file, rank), Some(piece));
                    file += 1;
                }
                if file > 8 {
                    return Err(PositionError::RankWidth { rank: row_index });
                }
            }
            if file != 8 {
                return Err(PositionError::RankWidth { rank: row_index });
            }
        }
        Ok(board)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A full position: board, side to move and the FEN bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub turn: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl Position {
    /// The standard starting position, White to move.
    pub fn starting_position() -> Self {
        Self {
            board: Board::starting_position(),
            turn: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parses a FEN string. The two move counters are optional.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(PositionError::FieldCount(fields.len()));
        }

        let board = Board::from_placement_fen(fields[0])?;
        let turn = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(PositionError::SideToMove(other.to_string())),
        };
        let castling = CastlingRights::from_fen(fields[2])
            .ok_or_else(|| PositionError::Castling(fields[2].to_string()))?;
        let en_passant = match fields[3] {
            "-" => None,
            name => Some(
                Square::from_algebraic(name)
                    .ok_or_else(|| PositionError::Square(name.to_string()))?,
            ),
        };
        let halfmove_clock = parse_counter(fields.get(4).copied(), 0)?;
        let fullmove_number = parse_counter(fields.get(5).copied(), 1)?;

        Ok(Self {
            board,
            turn,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Serializes the position as a full six-field FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.board.placement_fen(),
            match self.turn {
                Color::White => 'w',
                Color::Black => 'b',
            },
            self.castling.to_fen(),
            self.en_passant
                .map(|sq| sq.to_algebraic())
                .unwrap_or_else(|| "-".to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Returns the position after playing `from`→`to` with the given flags.
    ///
    /// Legality is the caller's business; only the bookkeeping is done
    /// here (castling rights, en passant target, clocks, side to move).
    pub fn after_move(&self, from: Square, to: Square, flags: &MoveFlags) -> Position {
        let mut next = self.clone();
        let Some(moving) = self.board.get(from) else {
            return next;
        };
        let is_pawn_move = moving.kind == PieceKind::Pawn;

        movegen::apply_move_to_board(&mut next.board, from, to, flags);
        next.update_castling_rights(moving, from, to);

        next.en_passant = None;
        if is_pawn_move && (to.rank as i8 - from.rank as i8).abs() == 2 {
            next.en_passant = from.offset(0, moving.color.pawn_direction());
        }

        if is_pawn_move || flags.capture_attempt {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }

        next.turn = self.turn.opponent();
        if next.turn == Color::White {
            next.fullmove_number += 1;
        }
        next
    }

    /// Updates castling rights after a move.
    fn update_castling_rights(&mut self, moving: Piece, from: Square, to: Square) {
        // King move: lose all castling rights for that side
        if moving.kind == PieceKind::King {
            *self.castling.for_color_mut(moving.color) = SideCastlingRights::NONE;
        }

        // A rook moved from or was captured on its starting square
        for sq in [from, to] {
            match (sq.file, sq.rank) {
                (7, 0) => self.castling.white.kingside = false,
                (0, 0) => self.castling.white.queenside = false,
                (7, 7) => self.castling.black.kingside = false,
                (0, 7) => self.castling.black.queenside = false,
                _ => {}
            }
        }
    }
}

fn parse_counter(field: Option<&str>, default: u32) -> Result<u32, PositionError> {
    match field {
        None => Ok(default),
        Some(text) => text
            .parse()
            .map_err(|_| PositionError::Counter(text.to_string())),
    }
}

impl BoardQuery for Position {
    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get(square)
    }

    fn pieces_of_color(&self, color: Color) -> Vec<PieceRef> {
        self.board
            .occupied()
            .filter(|(_, piece)| piece.color == color)
            .map(|(sq, piece)| PieceRef::new(piece.kind, sq))
            .collect()
    }

    fn attackers_of(&self, square: Square, by: Color) -> Vec<Square> {
        movegen::attackers_of(&self.board, square, by)
    }

    fn is_in_check(&self, color: Color) -> bool {
        movegen::is_in_check(&self.board, color)
    }

    fn moves_from(&self, from: Square) -> Vec<Square> {
        movegen::destinations_from(&self.board, from, self.en_passant)
    }

    fn remove(&mut self, square: Square) -> Option<Piece> {
        let previous = self.board.get(square);
        self.board.set(square, None);
        previous
    }

    fn put(&mut self, piece: Piece, square: Square) {
        self.board.set(square, Some(piece));
    }

    fn fen(&self) -> String {
        self.to_fen()
    }
}

// ---------------------------------------------------------------------------
// Move recording
// ---------------------------------------------------------------------------

impl Move {
    /// Provisionally plays `from`→`to` on `before` and records the ply.
    ///
    /// Flags are derived from the position: a capture attempt when the
    /// destination holds an enemy piece, en passant when a pawn moves
    /// diagonally onto the en passant target, castling when the king
    /// moves two files. `from == to` records a return to origin.
    pub fn record(
        before: &Position,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, PositionError> {
        let piece = before.board.get(from).ok_or(PositionError::NoPiece(from))?;
        if piece.color != before.turn {
            return Err(PositionError::WrongSide {
                square: from,
                owner: piece.color,
                turn: before.turn,
            });
        }

        let target = before.board.get(to);
        let en_passant = piece.kind == PieceKind::Pawn
            && from.file != to.file
            && target.is_none()
            && before.en_passant == Some(to);
        let castle = piece.kind == PieceKind::King
            && from.rank == to.rank
            && (to.file as i8 - from.file as i8).abs() == 2;

        let flags = MoveFlags {
            capture_attempt: matches!(target, Some(t) if t.color != piece.color) || en_passant,
            promotion,
            en_passant,
            castle_kingside: castle && to.file > from.file,
            castle_queenside: castle && to.file < from.file,
        };

        let after = before.after_move(from, to, &flags);
        Ok(Move {
            from,
            to,
            piece: piece.kind,
            color: piece.color,
            flags,
            before: before.to_fen(),
            after: after.to_fen(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn test_starting_position_fen() {
        assert_eq!(Position::starting_position().to_fen(), START_FEN);
        assert_eq!(Position::from_fen(START_FEN).unwrap(), Position::starting_position());
    }

    #[test]
    fn test_fen_counters_are_optional() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(pos.turn, Color::Black);
        assert_eq!(pos.halfmove_clock, 0);
        assert_eq!(pos.fullmove_number, 1);
    }

    #[test]
    fn test_fen_rejects_malformed_input() {
        assert_eq!(
            Position::from_fen("8/8/8 w - -"),
            Err(PositionError::RankCount(3))
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K4 w - -"),
            Err(PositionError::RankWidth { rank: 7 })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4X3 w - -"),
            Err(PositionError::PieceSymbol('X'))
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - -"),
            Err(PositionError::SideToMove("x".to_string()))
        );
        assert_eq!(Position::from_fen("garbage"), Err(PositionError::FieldCount(1)));
    }

    #[test]
    fn test_record_double_pawn_push_sets_en_passant() {
        let start = Position::starting_position();
        let mv = Move::record(&start, sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(mv.piece, PieceKind::Pawn);
        assert_eq!(mv.color, Color::White);
        assert!(!mv.flags.capture_attempt);
        assert_eq!(
            mv.after,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn test_record_rejects_wrong_side() {
        let start = Position::starting_position();
        let err = Move::record(&start, sq("e7"), sq("e5"), None).unwrap_err();
        assert!(matches!(err, PositionError::WrongSide { owner: Color::Black, .. }));
        assert_eq!(
            Move::record(&start, sq("e4"), sq("e5"), None),
            Err(PositionError::NoPiece(sq("e4")))
        );
    }

    #[test]
    fn test_record_flags_en_passant_and_capture() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let mv = Move::record(&pos, sq("e5"), sq("d6"), None).unwrap();
        assert!(mv.flags.en_passant);
        assert!(mv.flags.capture_attempt);
        assert_eq!(mv.after, "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn test_record_castling_updates_rights() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").unwrap();
        let mv = Move::record(&pos, sq("e1"), sq("c1"), None).unwrap();
        assert!(mv.flags.castle_queenside);
        assert!(!mv.flags.castle_kingside);
        assert_eq!(mv.after, "r3k2r/8/8/8/8/8/8/2KR3R b kq - 4 10");
    }

    #[test]
    fn test_pieces_of_color_in_index_order() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let white = pos.pieces_of_color(Color::White);
        assert_eq!(
            white,
            vec![
                PieceRef::new(PieceKind::Rook, sq("a1")),
                PieceRef::new(PieceKind::King, sq("e1")),
            ]
        );
    }
}
