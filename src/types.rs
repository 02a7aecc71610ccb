//! Core types for the duel-capture chess engine.
//!
//! This module defines the value types shared by every detector and by
//! the battle-point economy: colors, piece kinds, squares, piece
//! references and the recorded `Move`. All of them are immutable values
//! that serialize with `serde` so the game-session layer can ship them
//! as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Piece & Color
// ---------------------------------------------------------------------------

/// Represents the color (side) of a chess piece or player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// The White side (starts on ranks 1–2).
    White,
    /// The Black side (starts on ranks 7–8).
    Black,
}

impl Color {
    /// Returns the opposite color.
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the home rank index (0-based) for pawns of this color.
    pub fn pawn_start_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Returns the direction pawns move: +1 for White, -1 for Black.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Index into two-element per-side arrays.
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Represents a chess piece type (without color information).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Relative worth used to tell pins from skewers.
    ///
    /// The king outranks everything so that a piece in front of it is
    /// always pinned, never skewered.
    pub fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 100,
        }
    }

    /// Bishops, rooks and queens.
    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Returns the uppercase FEN letter for this kind.
    pub fn to_fen_char(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        f.write_str(name)
    }
}

/// A chess piece with both kind and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// Creates a new piece.
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Converts the piece to its FEN character representation.
    /// Uppercase for White, lowercase for Black.
    pub fn to_fen_char(self) -> char {
        let c = self.kind.to_fen_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parses a FEN character into a `Piece`.
    /// Returns `None` if the character is not a valid piece symbol.
    pub fn from_fen_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_uppercase() {
            'K' => PieceKind::King,
            'Q' => PieceKind::Queen,
            'R' => PieceKind::Rook,
            'B' => PieceKind::Bishop,
            'N' => PieceKind::Knight,
            'P' => PieceKind::Pawn,
            _ => return None,
        };
        Some(Piece { kind, color })
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// Represents a square on the chessboard using 0-based file and rank indices.
///
/// - `file`: 0 (a) to 7 (h)
/// - `rank`: 0 (rank 1) to 7 (rank 8)
///
/// Serializes as its algebraic name (e.g. `"e4"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    /// Creates a new square from 0-based file and rank.
    pub fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8, "Square out of bounds");
        Self { file, rank }
    }

    /// Creates a square from signed (x, y) coordinates, or `None` if off the board.
    pub fn from_xy(x: i8, y: i8) -> Option<Self> {
        if (0..8).contains(&x) && (0..8).contains(&y) {
            Some(Square::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Returns the zero-based (x, y) coordinates as signed integers.
    pub fn xy(self) -> (i8, i8) {
        (self.file as i8, self.rank as i8)
    }

    /// Parses an algebraic notation string (e.g. "e4") into a `Square`.
    /// Returns `None` for invalid input.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    /// Converts the square to its algebraic notation string (e.g. "e4").
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.file) as char, self.rank + 1)
    }

    /// Returns a new square offset by `(df, dr)`, or `None` if out of bounds.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        Square::from_xy(self.file as i8 + df, self.rank as i8 + dr)
    }

    /// Returns a flat index (0..63) for the square.
    pub fn index(self) -> usize {
        (self.rank as usize) * 8 + self.file as usize
    }

    /// Inverse of [`Square::index`].
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < 64);
        Square::new((index % 8) as u8, (index / 8) as u8)
    }

    /// Iterates all 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl TryFrom<String> for Square {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Square::from_algebraic(&value).ok_or_else(|| format!("Invalid square: {}", value))
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_algebraic()
    }
}

// ---------------------------------------------------------------------------
// Piece references
// ---------------------------------------------------------------------------

/// What stands where. Carries no ownership of board state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceRef {
    pub kind: PieceKind,
    pub square: Square,
}

impl PieceRef {
    pub fn new(kind: PieceKind, square: Square) -> Self {
        Self { kind, square }
    }
}

impl fmt::Display for PieceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.square)
    }
}

// ---------------------------------------------------------------------------
// Castling Rights
// ---------------------------------------------------------------------------

/// Castling rights for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideCastlingRights {
    /// Whether kingside castling (short castling) is still available.
    pub kingside: bool,
    /// Whether queenside castling (long castling) is still available.
    pub queenside: bool,
}

impl SideCastlingRights {
    pub const NONE: SideCastlingRights = SideCastlingRights {
        kingside: false,
        queenside: false,
    };
}

impl Default for SideCastlingRights {
    fn default() -> Self {
        Self {
            kingside: true,
            queenside: true,
        }
    }
}

/// Castling rights for both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white: SideCastlingRights,
    pub black: SideCastlingRights,
}

impl CastlingRights {
    /// No castling for either side.
    pub const NONE: CastlingRights = CastlingRights {
        white: SideCastlingRights::NONE,
        black: SideCastlingRights::NONE,
    };

    /// Returns a mutable reference to the castling rights for the given color.
    pub fn for_color_mut(&mut self, color: Color) -> &mut SideCastlingRights {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Generates the FEN castling string (e.g. "KQkq" or "-").
    pub fn to_fen(&self) -> String {
        let mut s = String::new();
        if self.white.kingside {
            s.push('K');
        }
        if self.white.queenside {
            s.push('Q');
        }
        if self.black.kingside {
            s.push('k');
        }
        if self.black.queenside {
            s.push('q');
        }
        if s.is_empty() {
            "-".to_string()
        } else {
            s
        }
    }

    /// Parses the FEN castling field. Unknown letters yield `None`.
    pub fn from_fen(field: &str) -> Option<Self> {
        let mut rights = CastlingRights::NONE;
        if field == "-" {
            return Some(rights);
        }
        for c in field.chars() {
            match c {
                'K' => rights.white.kingside = true,
                'Q' => rights.white.queenside = true,
                'k' => rights.black.kingside = true,
                'q' => rights.black.queenside = true,
                _ => return None,
            }
        }
        Some(rights)
    }
}

// ---------------------------------------------------------------------------
// Recorded move
// ---------------------------------------------------------------------------

/// Special-move flags of a recorded ply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags {
    /// The destination held an enemy piece (or the move is en passant),
    /// so a duel decides whether the capture happens.
    pub capture_attempt: bool,
    /// Promotion target, if any.
    pub promotion: Option<PieceKind>,
    pub en_passant: bool,
    pub castle_kingside: bool,
    pub castle_queenside: bool,
}

impl MoveFlags {
    pub fn is_castling(&self) -> bool {
        self.castle_kingside || self.castle_queenside
    }
}

/// One ply, together with the positions right before and right after it
/// was provisionally applied (as FEN strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub color: Color,
    pub flags: MoveFlags,
    pub before: String,
    pub after: String,
}

impl Move {
    /// A move that puts the piece back where it started (a retreat to origin).
    pub fn is_return_to_origin(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from.to_algebraic(), self.to.to_algebraic())?;
        if let Some(promo) = self.flags.promotion {
            write!(f, "={}", promo.to_fen_char())?;
        }
        Ok(())
    }
}
