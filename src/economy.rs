//! Battle-point economy: capacities, the cost curve and duels.
//!
//! Allocating BP to a piece buys effective combat power 1:1 up to the
//! piece's capacity and at half rate beyond it, capped by the configured
//! maximum. A duel compares the two effective powers; whatever the
//! outcome, both allocations are spent.
//!
//! The pure functions here hold no state. [`BattlePointLedger`] is the
//! per-game bookkeeping on top of them: both players' pools and the one
//! duel that may be open at a time. Contract violations (a king in a
//! duel, spending BP a player does not have, opening a second duel) are
//! returned as [`EconomyError`] and mean the caller is broken.

use crate::config::{GameConfig, TieBreak};
use crate::error::EconomyError;
use crate::retreat::RetreatOption;
use crate::types::{Color, PieceKind, PieceRef};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cost curve
// ---------------------------------------------------------------------------

/// BP capacity of a piece kind. Kings cannot hold battle points.
pub fn capacity(kind: PieceKind, config: &GameConfig) -> Result<u32, EconomyError> {
    if kind == PieceKind::King {
        return Err(EconomyError::KingInDuel);
    }
    config
        .capacities
        .of(kind)
        .ok_or(EconomyError::NoCapacity(kind))
}

/// Effective combat power bought by spending `spent` BP on a piece of
/// the given capacity.
pub fn effective_power(spent: u32, capacity: u32, max_effective: u32) -> f64 {
    let raw = if spent <= capacity {
        spent as f64
    } else {
        capacity as f64 + (spent - capacity) as f64 / 2.0
    };
    raw.min(max_effective as f64)
}

/// Smallest allocation that reaches `target` effective power, or `None`
/// when the target lies above the cap.
pub fn bp_for_effective(target: f64, capacity: u32, max_effective: u32) -> Option<u32> {
    if target > max_effective as f64 {
        return None;
    }
    if target <= 0.0 {
        return Some(0);
    }
    let capacity_f = capacity as f64;
    let needed = if target <= capacity_f {
        target.ceil()
    } else {
        capacity_f + ((target - capacity_f) * 2.0).ceil()
    };
    Some(needed as u32)
}

// ---------------------------------------------------------------------------
// Duels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuelOutcome {
    /// The capture goes through.
    Success,
    /// The capture is refused; the attacker retreats or returns to origin.
    Failed,
}

/// The sealed-bid contest over one capture attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duel {
    pub attacker_color: Color,
    pub attacker: PieceRef,
    pub defender: PieceRef,
    pub attacker_allocation: u32,
    pub defender_allocation: u32,
    pub outcome: Option<DuelOutcome>,
}

impl Duel {
    pub fn new(attacker_color: Color, attacker: PieceRef, defender: PieceRef) -> Self {
        Self {
            attacker_color,
            attacker,
            defender,
            attacker_allocation: 0,
            defender_allocation: 0,
            outcome: None,
        }
    }

    pub fn with_allocations(mut self, attacker_allocation: u32, defender_allocation: u32) -> Self {
        self.attacker_allocation = attacker_allocation;
        self.defender_allocation = defender_allocation;
        self
    }

    pub fn defender_color(&self) -> Color {
        self.attacker_color.opponent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuelResolution {
    pub outcome: DuelOutcome,
    pub effective_attacker: f64,
    pub effective_defender: f64,
}

/// Decides a duel from its allocations.
pub fn resolve_duel(duel: &Duel, config: &GameConfig) -> Result<DuelResolution, EconomyError> {
    let attacker_capacity = capacity(duel.attacker.kind, config)?;
    let defender_capacity = capacity(duel.defender.kind, config)?;

    let effective_attacker =
        effective_power(duel.attacker_allocation, attacker_capacity, config.max_effective_bp);
    let effective_defender =
        effective_power(duel.defender_allocation, defender_capacity, config.max_effective_bp);

    let attacker_wins = match config.tie_break {
        TieBreak::Defender => effective_attacker > effective_defender,
        TieBreak::Attacker => effective_attacker >= effective_defender,
    };

    Ok(DuelResolution {
        outcome: if attacker_wins {
            DuelOutcome::Success
        } else {
            DuelOutcome::Failed
        },
        effective_attacker,
        effective_defender,
    })
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Both players' BP pools and the currently open duel, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlePointLedger {
    pools: [u32; 2],
    open_duel: Option<Duel>,
    max_bp: Option<u32>,
}

impl BattlePointLedger {
    /// Both players start with `initial_bp`.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pools: [config.initial_bp; 2],
            open_duel: None,
            max_bp: config.max_bp,
        }
    }

    pub fn pool(&self, color: Color) -> u32 {
        self.pools[color.index()]
    }

    pub fn open_duel(&self) -> Option<&Duel> {
        self.open_duel.as_ref()
    }

    /// Opens a duel for a capture attempt.
    pub fn start_duel(
        &mut self,
        attacker_color: Color,
        attacker: PieceRef,
        defender: PieceRef,
    ) -> Result<&Duel, EconomyError> {
        if self.open_duel.is_some() {
            return Err(EconomyError::DuelAlreadyOpen);
        }
        if attacker.kind == PieceKind::King || defender.kind == PieceKind::King {
            return Err(EconomyError::KingInDuel);
        }
        log::debug!(
            "{} opens a duel: {} attacks {}",
            attacker_color,
            attacker,
            defender
        );
        Ok(&*self
            .open_duel
            .insert(Duel::new(attacker_color, attacker, defender)))
    }

    /// Resolves the open duel with both sealed bids and charges both
    /// players. The duel is closed afterwards.
    pub fn resolve(
        &mut self,
        attacker_allocation: u32,
        defender_allocation: u32,
        config: &GameConfig,
    ) -> Result<(Duel, DuelResolution), EconomyError> {
        let duel = self.open_duel.as_ref().ok_or(EconomyError::NoOpenDuel)?;
        let attacker_color = duel.attacker_color;
        let defender_color = duel.defender_color();

        self.ensure_funds(attacker_color, attacker_allocation)?;
        self.ensure_funds(defender_color, defender_allocation)?;

        let mut duel = duel
            .clone()
            .with_allocations(attacker_allocation, defender_allocation);
        let resolution = resolve_duel(&duel, config)?;
        duel.outcome = Some(resolution.outcome);

        self.pools[attacker_color.index()] -= attacker_allocation;
        self.pools[defender_color.index()] -= defender_allocation;
        self.open_duel = None;

        log::debug!(
            "Duel {} vs {}: {:?} ({} vs {} effective)",
            duel.attacker,
            duel.defender,
            resolution.outcome,
            resolution.effective_attacker,
            resolution.effective_defender
        );
        Ok((duel, resolution))
    }

    /// Adds regenerated BP to a pool, clamped by the configured maximum.
    /// Returns the new balance.
    pub fn credit(&mut self, color: Color, amount: u32) -> u32 {
        let pool = &mut self.pools[color.index()];
        *pool = pool.saturating_add(amount);
        if let Some(max_bp) = self.max_bp {
            *pool = (*pool).min(max_bp);
        }
        *pool
    }

    /// Charges the cost of a chosen tactical retreat. Returns the new balance.
    pub fn pay_retreat(
        &mut self,
        color: Color,
        option: &RetreatOption,
    ) -> Result<u32, EconomyError> {
        self.ensure_funds(color, option.bp_cost)?;
        self.pools[color.index()] -= option.bp_cost;
        Ok(self.pools[color.index()])
    }

    fn ensure_funds(&self, color: Color, requested: u32) -> Result<(), EconomyError> {
        let available = self.pool(color);
        if requested > available {
            return Err(EconomyError::InsufficientBp {
                color,
                requested,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    fn piece(kind: PieceKind, name: &str) -> PieceRef {
        PieceRef::new(kind, Square::from_algebraic(name).unwrap())
    }

    #[test]
    fn test_effective_power_curve() {
        // Rook: capacity 5, cap 10
        assert_eq!(effective_power(0, 5, 10), 0.0);
        assert_eq!(effective_power(5, 5, 10), 5.0);
        assert_eq!(effective_power(6, 5, 10), 5.5);
        assert_eq!(effective_power(9, 5, 10), 7.0);
        assert_eq!(effective_power(15, 5, 10), 10.0);
        assert_eq!(effective_power(40, 5, 10), 10.0);
    }

    #[test]
    fn test_effective_power_is_monotone_and_bounded() {
        let config = GameConfig::standard();
        for kind in [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            let cap = capacity(kind, &config).unwrap();
            assert_eq!(effective_power(cap, cap, config.max_effective_bp), cap as f64);
            let mut last = 0.0;
            for spent in 0..60 {
                let power = effective_power(spent, cap, config.max_effective_bp);
                assert!(power >= last, "{} at {}", kind, spent);
                assert!(power <= config.max_effective_bp as f64);
                last = power;
            }
        }
    }

    #[test]
    fn test_inverse_curve() {
        assert_eq!(bp_for_effective(3.0, 5, 10), Some(3));
        assert_eq!(bp_for_effective(5.0, 5, 10), Some(5));
        assert_eq!(bp_for_effective(7.0, 5, 10), Some(9));
        assert_eq!(bp_for_effective(5.5, 5, 10), Some(6));
        assert_eq!(bp_for_effective(11.0, 5, 10), None);
        for target in 0..=10 {
            let spend = bp_for_effective(target as f64, 3, 10).unwrap();
            assert!(effective_power(spend, 3, 10) >= target as f64);
        }
    }

    #[test]
    fn test_king_has_no_capacity() {
        let config = GameConfig::standard();
        assert_eq!(capacity(PieceKind::King, &config), Err(EconomyError::KingInDuel));
    }

    #[test]
    fn test_rook_beats_bishop() {
        let config = GameConfig::standard();
        let duel = Duel::new(
            Color::White,
            piece(PieceKind::Rook, "a1"),
            piece(PieceKind::Bishop, "a5"),
        )
        .with_allocations(5, 3);
        let resolution = resolve_duel(&duel, &config).unwrap();
        assert_eq!(resolution.outcome, DuelOutcome::Success);
        assert_eq!(resolution.effective_attacker, 5.0);
        assert_eq!(resolution.effective_defender, 3.0);
    }

    #[test]
    fn test_tie_goes_to_defender_by_default() {
        let duel = Duel::new(
            Color::White,
            piece(PieceKind::Knight, "c3"),
            piece(PieceKind::Bishop, "d5"),
        )
        .with_allocations(2, 2);
        let standard = GameConfig::standard();
        assert_eq!(resolve_duel(&duel, &standard).unwrap().outcome, DuelOutcome::Failed);

        let attacker_favoured = GameConfig {
            tie_break: TieBreak::Attacker,
            ..GameConfig::standard()
        };
        assert_eq!(
            resolve_duel(&duel, &attacker_favoured).unwrap().outcome,
            DuelOutcome::Success
        );
    }

    #[test]
    fn test_overspending_past_capacity_is_penalised() {
        // Pawn pays 5 BP for 3 effective; the knight's 3 BP hold the tie
        let config = GameConfig::standard();
        let duel = Duel::new(
            Color::Black,
            piece(PieceKind::Pawn, "e5"),
            piece(PieceKind::Knight, "d4"),
        )
        .with_allocations(5, 3);
        let resolution = resolve_duel(&duel, &config).unwrap();
        assert_eq!(resolution.effective_attacker, 3.0);
        assert_eq!(resolution.outcome, DuelOutcome::Failed);
    }

    #[test]
    fn test_ledger_charges_both_sides() {
        let config = GameConfig::standard();
        let mut ledger = BattlePointLedger::new(&config);
        ledger
            .start_duel(Color::White, piece(PieceKind::Rook, "a1"), piece(PieceKind::Bishop, "a5"))
            .unwrap();
        let (duel, resolution) = ledger.resolve(5, 3, &config).unwrap();
        assert_eq!(resolution.outcome, DuelOutcome::Success);
        assert_eq!(duel.outcome, Some(DuelOutcome::Success));
        assert_eq!(ledger.pool(Color::White), 34);
        assert_eq!(ledger.pool(Color::Black), 36);
        assert!(ledger.open_duel().is_none());
    }

    #[test]
    fn test_ledger_allows_one_duel_at_a_time() {
        let config = GameConfig::standard();
        let mut ledger = BattlePointLedger::new(&config);
        ledger
            .start_duel(Color::White, piece(PieceKind::Rook, "a1"), piece(PieceKind::Bishop, "a5"))
            .unwrap();
        let second = ledger.start_duel(
            Color::White,
            piece(PieceKind::Queen, "d1"),
            piece(PieceKind::Pawn, "d7"),
        );
        assert_eq!(second.unwrap_err(), EconomyError::DuelAlreadyOpen);
    }

    #[test]
    fn test_ledger_rejects_contract_violations() {
        let config = GameConfig::standard();
        let mut ledger = BattlePointLedger::new(&config);
        assert_eq!(ledger.resolve(1, 1, &config).unwrap_err(), EconomyError::NoOpenDuel);
        assert_eq!(
            ledger
                .start_duel(
                    Color::White,
                    piece(PieceKind::King, "e1"),
                    piece(PieceKind::Pawn, "e2")
                )
                .unwrap_err(),
            EconomyError::KingInDuel
        );
        ledger
            .start_duel(Color::White, piece(PieceKind::Rook, "a1"), piece(PieceKind::Bishop, "a5"))
            .unwrap();
        let err = ledger.resolve(40, 0, &config).unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientBp {
                color: Color::White,
                requested: 40,
                available: 39
            }
        );
        // The duel stays open and the pools untouched
        assert!(ledger.open_duel().is_some());
        assert_eq!(ledger.pool(Color::White), 39);
    }

    #[test]
    fn test_credit_respects_max_bp() {
        let config = GameConfig {
            max_bp: Some(40),
            ..GameConfig::standard()
        };
        let mut ledger = BattlePointLedger::new(&config);
        assert_eq!(ledger.credit(Color::Black, 3), 40);
        assert_eq!(ledger.credit(Color::White, 0), 39);
    }

    #[test]
    fn test_pay_retreat() {
        let config = GameConfig {
            initial_bp: 2,
            ..GameConfig::standard()
        };
        let mut ledger = BattlePointLedger::new(&config);
        let near = RetreatOption {
            destination: Square::from_algebraic("a2").unwrap(),
            bp_cost: 1,
        };
        let far = RetreatOption {
            destination: Square::from_algebraic("a4").unwrap(),
            bp_cost: 3,
        };
        assert!(ledger.pay_retreat(Color::White, &far).is_err());
        assert_eq!(ledger.pay_retreat(Color::White, &near), Ok(1));
    }
}
