//! Tactical motif detection.
//!
//! Each detector looks at the position right after a move (and, where
//! motifs can persist across moves, the position right before it) and
//! reports only the motifs that this move created. A pin that already
//! stood before the move is not reported again, so it cannot earn
//! battle points twice.
//!
//! Detectors share one before/after differencing helper, [`new_motifs`],
//! and differ only in how they enumerate motifs on a board and in the key
//! that decides when two motifs are "the same".
//!
//! [`detect_tactics`] is the entry point: it parses the FEN carried by a
//! [`Move`], runs every detector and concatenates the results.

pub mod check;
pub mod defence;
pub mod discovered;
pub mod fork;
pub mod pin;
pub mod skewer;

use crate::oracle::BoardQuery;
use crate::position::Position;
use crate::raycast::RayCastCache;
use crate::types::{Color, Move, PieceRef, Square};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// Motif DTOs
// ---------------------------------------------------------------------------

/// The opponent's king is attacked by one or two pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInfo {
    /// Side giving check.
    pub color: Color,
    pub king: PieceRef,
    pub checking_piece: PieceRef,
    pub second_checking_piece: Option<PieceRef>,
    pub is_double_check: bool,
}

impl CheckInfo {
    /// All pieces giving check (one or two).
    pub fn checking_pieces(&self) -> Vec<PieceRef> {
        std::iter::once(self.checking_piece)
            .chain(self.second_checking_piece)
            .collect()
    }
}

/// A lesser piece cannot leave a line without exposing a more valuable one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinInfo {
    pub color: Color,
    pub pinning_piece: PieceRef,
    pub pinned_piece: PieceRef,
    /// The more valuable piece behind the pinned one.
    pub shielded_piece: PieceRef,
}

/// A valuable piece in front of a lesser one on a slider's line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkewerInfo {
    pub color: Color,
    pub skewering_piece: PieceRef,
    pub front_piece: PieceRef,
    pub back_piece: PieceRef,
}

/// One piece attacking two or more enemy pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkInfo {
    pub color: Color,
    pub forking_piece: PieceRef,
    /// Sorted by square.
    pub forked_pieces: Vec<PieceRef>,
}

/// A slider's attack opened by the moving piece leaving the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredAttackInfo {
    pub color: Color,
    pub attacker: PieceRef,
    pub target: PieceRef,
    /// The piece that moved out of the way, on its new square.
    pub revealed_by: PieceRef,
    pub is_check: bool,
}

/// The moving piece now guards a friendly piece that is under attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenceInfo {
    pub color: Color,
    pub defender: PieceRef,
    pub defended: PieceRef,
}

/// Tag of a motif type; the key used by the regeneration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotifKind {
    Check,
    Pin,
    Skewer,
    Fork,
    DiscoveredAttack,
    DirectDefence,
}

impl MotifKind {
    pub const ALL: [MotifKind; 6] = [
        MotifKind::Check,
        MotifKind::Pin,
        MotifKind::Skewer,
        MotifKind::Fork,
        MotifKind::DiscoveredAttack,
        MotifKind::DirectDefence,
    ];
}

impl fmt::Display for MotifKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MotifKind::Check => "check",
            MotifKind::Pin => "pin",
            MotifKind::Skewer => "skewer",
            MotifKind::Fork => "fork",
            MotifKind::DiscoveredAttack => "discovered attack",
            MotifKind::DirectDefence => "direct defence",
        };
        f.write_str(name)
    }
}

/// Any motif produced by a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tactic {
    Check(CheckInfo),
    Pin(PinInfo),
    Skewer(SkewerInfo),
    Fork(ForkInfo),
    DiscoveredAttack(DiscoveredAttackInfo),
    DirectDefence(DefenceInfo),
}

impl Tactic {
    pub fn kind(&self) -> MotifKind {
        match self {
            Tactic::Check(_) => MotifKind::Check,
            Tactic::Pin(_) => MotifKind::Pin,
            Tactic::Skewer(_) => MotifKind::Skewer,
            Tactic::Fork(_) => MotifKind::Fork,
            Tactic::DiscoveredAttack(_) => MotifKind::DiscoveredAttack,
            Tactic::DirectDefence(_) => MotifKind::DirectDefence,
        }
    }

    /// The side that created the motif.
    pub fn color(&self) -> Color {
        match self {
            Tactic::Check(info) => info.color,
            Tactic::Pin(info) => info.color,
            Tactic::Skewer(info) => info.color,
            Tactic::Fork(info) => info.color,
            Tactic::DiscoveredAttack(info) => info.color,
            Tactic::DirectDefence(info) => info.color,
        }
    }

    /// How many pieces the motif hits: checkers for a check, forked
    /// pieces for a fork, one otherwise.
    pub fn target_count(&self) -> u32 {
        match self {
            Tactic::Check(info) => info.checking_pieces().len() as u32,
            Tactic::Fork(info) => info.forked_pieces.len() as u32,
            _ => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Before/after differencing
// ---------------------------------------------------------------------------

/// A motif with an identity that survives across positions.
pub trait Motif {
    type Key: Eq + Hash;

    fn key(&self) -> Self::Key;
}

/// Motifs present in `after` whose key does not occur in `before`.
///
/// Duplicates within `after` are reported once.
pub fn new_motifs<M: Motif>(after: Vec<M>, before: &[M]) -> Vec<M> {
    let existing: HashSet<M::Key> = before.iter().map(Motif::key).collect();
    let mut emitted = HashSet::new();
    after
        .into_iter()
        .filter(|motif| {
            let key = motif.key();
            !existing.contains(&key) && emitted.insert(key)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Detects every motif newly created by `mv`.
///
/// Returns an empty list when the move puts a piece back on its own
/// origin square, or when either FEN fails to parse.
pub fn detect_tactics(mv: &Move) -> Vec<Tactic> {
    if mv.is_return_to_origin() {
        return Vec::new();
    }

    let before = match Position::from_fen(&mv.before) {
        Ok(pos) => pos,
        Err(e) => {
            log::warn!("Skipping tactics for {}: bad position before move: {}", mv, e);
            return Vec::new();
        }
    };
    let after = match Position::from_fen(&mv.after) {
        Ok(pos) => pos,
        Err(e) => {
            log::warn!("Skipping tactics for {}: bad position after move: {}", mv, e);
            return Vec::new();
        }
    };

    detect_tactics_on(&after, &before, mv)
}

/// Runs all detectors against already-parsed boards.
pub fn detect_tactics_on<B: BoardQuery + Clone>(after: &B, before: &B, mv: &Move) -> Vec<Tactic> {
    if mv.is_return_to_origin() {
        return Vec::new();
    }

    let mut cache = RayCastCache::new();
    let mut tactics = Vec::new();

    tactics.extend(check::detect_checks(after, mv).into_iter().map(Tactic::Check));
    tactics.extend(
        pin::detect_pins(after, before, mv, &mut cache)
            .into_iter()
            .map(Tactic::Pin),
    );
    tactics.extend(
        skewer::detect_skewers(after, before, mv, &mut cache)
            .into_iter()
            .map(Tactic::Skewer),
    );
    tactics.extend(fork::detect_forks(after, before, mv).into_iter().map(Tactic::Fork));
    tactics.extend(
        discovered::detect_discovered_attacks(after, mv)
            .into_iter()
            .map(Tactic::DiscoveredAttack),
    );
    tactics.extend(
        defence::detect_defences(after, before, mv)
            .into_iter()
            .map(Tactic::DirectDefence),
    );

    cache.clear();

    log::debug!(
        "{} {}: {} new motif(s) [{}]",
        mv.color,
        mv,
        tactics.len(),
        tactics
            .iter()
            .map(|t| t.kind().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tactics
}

/// The square a motif detector treats as the mover's new location.
pub(crate) fn moved_piece<B: BoardQuery + ?Sized>(after: &B, mv: &Move) -> PieceRef {
    let kind = after.piece_at(mv.to).map(|p| p.kind).unwrap_or(mv.piece);
    PieceRef::new(kind, mv.to)
}

/// The square of the pawn taken en passant, which the move also empties.
///
/// Castling empties the rook's corner too, but a corner never lies
/// between two squares of a line, so it cannot open one.
pub(crate) fn en_passant_victim(mv: &Move) -> Option<Square> {
    if !mv.flags.en_passant {
        return None;
    }
    mv.to.offset(0, -mv.color.pawn_direction())
}

/// Squares pieces of the mover arrived on: the destination, plus the
/// castling rook's new square.
pub(crate) fn arrival_squares(mv: &Move) -> Vec<Square> {
    let mut squares = vec![mv.to];
    if mv.flags.castle_kingside {
        squares.push(Square::new(5, mv.from.rank));
    }
    if mv.flags.castle_queenside {
        squares.push(Square::new(3, mv.from.rank));
    }
    squares
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::position::Position;
    use crate::types::{Move, PieceKind, Square};

    pub fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    /// Records `from`→`to` on the position given by `fen`.
    pub fn play(fen: &str, from: &str, to: &str) -> Move {
        play_promoting(fen, from, to, None)
    }

    pub fn play_promoting(fen: &str, from: &str, to: &str, promotion: Option<PieceKind>) -> Move {
        let _ = env_logger::builder().is_test(true).try_init();
        let pos = Position::from_fen(fen).unwrap();
        Move::record(&pos, sq(from), sq(to), promotion).unwrap()
    }

    /// Parses both sides of a recorded move.
    pub fn boards(mv: &Move) -> (Position, Position) {
        (
            Position::from_fen(&mv.after).unwrap(),
            Position::from_fen(&mv.before).unwrap(),
        )
    }
}
