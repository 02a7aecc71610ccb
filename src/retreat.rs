//! Tactical retreat after a lost duel.
//!
//! Bishops, rooks and queens fall back along the line of the failed
//! capture. Toward the defended square they stop before it or before the
//! first piece in the way; away from it they run until the first occupied
//! square or the edge. Knights use a precomputed table keyed by
//! `(origin, failed capture)`: the squares along either leg ordering of
//! the L. Every result starts with the origin at cost 0.
//!
//! Pawns and kings are not eligible; their only option is the free return
//! to origin, which the caller handles without asking this module.

use crate::config::GameConfig;
use crate::geometry::{self, KNIGHT_OFFSETS};
use crate::oracle::BoardQuery;
use crate::types::{PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A candidate retreat square and what it costs to go there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetreatOption {
    pub destination: Square,
    pub bp_cost: u32,
}

impl RetreatOption {
    fn origin(square: Square) -> Self {
        Self {
            destination: square,
            bp_cost: 0,
        }
    }
}

pub fn is_retreat_eligible(kind: PieceKind) -> bool {
    matches!(
        kind,
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
    )
}

/// Retreat options for a piece of `kind` on `origin` whose capture on
/// `failed_capture` lost its duel.
///
/// `board` is the position the capture was attempted from. Ineligible
/// piece kinds and a capture square equal to the origin yield an empty
/// list. A capture square the piece could not have reached yields the
/// origin alone.
pub fn valid_retreats<B: BoardQuery + ?Sized>(
    board: &B,
    kind: PieceKind,
    origin: Square,
    failed_capture: Square,
    config: &GameConfig,
) -> Vec<RetreatOption> {
    if !is_retreat_eligible(kind) || origin == failed_capture {
        log::debug!(
            "No retreat for {} from {} after failing on {}",
            kind,
            origin,
            failed_capture
        );
        return Vec::new();
    }

    let multiplier = config.retreat_cost_multiplier;
    let mut options = vec![RetreatOption::origin(origin)];
    match kind {
        PieceKind::Knight => {
            options.extend(
                knight_retreat_squares(origin, failed_capture)
                    .iter()
                    .filter(|(sq, _)| board.piece_at(*sq).is_none())
                    .map(|&(destination, steps)| RetreatOption {
                        destination,
                        bp_cost: steps.saturating_mul(multiplier),
                    }),
            );
        }
        _ => options.extend(sliding_retreats(board, kind, origin, failed_capture, multiplier)),
    }

    options.sort_by_key(|o| (o.bp_cost, o.destination.index()));
    options
}

fn sliding_retreats<B: BoardQuery + ?Sized>(
    board: &B,
    kind: PieceKind,
    origin: Square,
    failed_capture: Square,
    multiplier: u32,
) -> Vec<RetreatOption> {
    let Some(toward) = geometry::direction_between(origin, failed_capture) else {
        return Vec::new();
    };
    if !geometry::slides_along(kind, toward) {
        return Vec::new();
    }
    let away = (-toward.0, -toward.1);

    let mut out = Vec::new();
    for dir in [toward, away] {
        let mut cur = origin;
        while let Some(next) = cur.offset(dir.0, dir.1) {
            if next == failed_capture || board.piece_at(next).is_some() {
                break;
            }
            out.push(RetreatOption {
                destination: next,
                bp_cost: geometry::chebyshev(origin, next).saturating_mul(multiplier),
            });
            cur = next;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Knight table
// ---------------------------------------------------------------------------

type KnightTable = HashMap<(Square, Square), Vec<(Square, u32)>>;

static KNIGHT_RETREATS: OnceLock<KnightTable> = OnceLock::new();

/// Unblocked-board knight retreats with their step counts, or an empty
/// slice when `failed_capture` is not a knight jump from `origin`.
pub fn knight_retreat_squares(origin: Square, failed_capture: Square) -> &'static [(Square, u32)] {
    KNIGHT_RETREATS
        .get_or_init(build_knight_table)
        .get(&(origin, failed_capture))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn build_knight_table() -> KnightTable {
    let mut table = HashMap::with_capacity(336);
    for origin in Square::all() {
        for &(dx, dy) in &KNIGHT_OFFSETS {
            let Some(target) = origin.offset(dx, dy) else {
                continue;
            };
            let (sx, sy) = (dx.signum(), dy.signum());
            // Long leg first, then short leg first
            let legs: [[(i8, i8); 2]; 2] = if dx.abs() == 2 {
                [[(sx, 0), (2 * sx, 0)], [(0, sy), (sx, sy)]]
            } else {
                [[(0, sy), (0, 2 * sy)], [(sx, 0), (sx, sy)]]
            };
            let mut squares: Vec<(Square, u32)> = legs
                .iter()
                .flat_map(|path| {
                    path.iter()
                        .zip(1u32..)
                        .filter_map(move |(&(px, py), steps)| {
                            origin.offset(px, py).map(|s| (s, steps))
                        })
                })
                .filter(|&(s, _)| s != target)
                .collect();
            squares.sort_by_key(|&(s, steps)| (steps, s.index()));
            table.insert((origin, target), squares);
        }
    }
    table
}
