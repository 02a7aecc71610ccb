//! Error types.
//!
//! Detectors and the retreat calculator never fail (they degrade to an
//! empty result); these errors cover position parsing, configuration
//! loading and contract violations against the battle-point economy.

use crate::types::{Color, PieceKind, Square};
use thiserror::Error;

/// Failure to parse a FEN string or to record a move on a position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("FEN must have at least 4 fields, got {0}")]
    FieldCount(usize),
    #[error("FEN placement must describe 8 ranks, got {0}")]
    RankCount(usize),
    #[error("FEN rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: usize },
    #[error("Invalid piece symbol '{0}'")]
    PieceSymbol(char),
    #[error("Invalid side to move '{0}'")]
    SideToMove(String),
    #[error("Invalid castling field '{0}'")]
    Castling(String),
    #[error("Invalid square: {0}")]
    Square(String),
    #[error("Invalid move counter '{0}'")]
    Counter(String),
    #[error("No piece on square {0}")]
    NoPiece(Square),
    #[error("Piece on {square} belongs to {owner}, but it is {turn}'s turn")]
    WrongSide {
        square: Square,
        owner: Color,
        turn: Color,
    },
}

/// A caller broke a precondition of the battle-point economy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EconomyError {
    #[error("Kings cannot take part in a duel")]
    KingInDuel,
    #[error("Piece kind {0} has no battle-point capacity")]
    NoCapacity(PieceKind),
    #[error("{color} allocated {requested} BP but only holds {available}")]
    InsufficientBp {
        color: Color,
        requested: u32,
        available: u32,
    },
    #[error("A duel is already open")]
    DuelAlreadyOpen,
    #[error("No duel is open")]
    NoOpenDuel,
}

/// Failure to load or validate a `GameConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
