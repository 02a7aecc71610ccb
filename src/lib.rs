//! # duelchess: Tactics and Battle-Point Engine
//!
//! Rules core for a chess variant where captures are contested. An
//! attempted capture opens a sealed-bid duel in which both players commit
//! battle points (BP); a lost duel leaves the attacker to retreat or go
//! back where it came from.
//!
//! ## Features
//!
//! - **Tactics Detection**: checks, double checks, pins, skewers, forks,
//!   discovered attacks and direct defences newly created by one move.
//!   Motifs that already stood before the move are never reported twice.
//!
//! - **Battle-Point Economy**: per-piece capacities, the half-rate cost
//!   curve above capacity, duel resolution and a ledger for both pools.
//!
//! - **Tactical Retreat**: destinations and BP costs for a piece whose
//!   capture failed, along its attack line or from the knight table.
//!
//! - **Regeneration**: base rate plus per-motif bonuses, driven entirely by
//!   the [`config::GameConfig`] rule table (beginner, standard and
//!   advanced profiles).
//!
//! ## Usage
//!
//! ```no_run
//! use duelchess::{Color, GameConfig, Move, Position, Square};
//!
//! let config = GameConfig::standard();
//! let pos = Position::from_fen("4k3/8/8/8/8/3N4/8/4K3 w - - 0 1")?;
//! let mv = Move::record(
//!     &pos,
//!     Square::from_algebraic("d3").unwrap(),
//!     Square::from_algebraic("f4").unwrap(),
//!     None,
//! )?;
//! let tactics = duelchess::detect_tactics(&mv);
//! let credit = duelchess::compute_regeneration(&tactics, Color::White, &config);
//! # Ok::<(), duelchess::PositionError>(())
//! ```
//!
//! Move legality belongs to the host engine. The detectors talk to it only
//! through [`oracle::BoardQuery`]; [`position::Position`] is the built-in
//! implementation.

pub mod config;
pub mod economy;
pub mod error;
pub mod geometry;
pub mod movegen;
pub mod oracle;
pub mod position;
pub mod raycast;
pub mod regen;
pub mod retreat;
pub mod tactics;
pub mod types;

pub use config::GameConfig;
pub use economy::{BattlePointLedger, Duel, DuelOutcome, DuelResolution, resolve_duel};
pub use error::{ConfigError, EconomyError, PositionError};
pub use oracle::BoardQuery;
pub use position::Position;
pub use regen::compute_regeneration;
pub use retreat::{RetreatOption, valid_retreats};
pub use tactics::{MotifKind, Tactic, detect_tactics};
pub use types::{Color, Move, MoveFlags, Piece, PieceKind, PieceRef, Square};
