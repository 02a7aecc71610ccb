//! Battle-point regeneration credited to the mover after each move.

use crate::config::GameConfig;
use crate::tactics::Tactic;
use crate::types::Color;

/// BP earned by `mover` for one move: the base turn rate plus the
/// configured bonus of every enabled motif the mover created, clamped by
/// the per-turn cap. Motifs attributed to the other side earn nothing.
pub fn compute_regeneration(tactics: &[Tactic], mover: Color, config: &GameConfig) -> u32 {
    let bonus: u32 = tactics
        .iter()
        .filter(|tactic| tactic.color() == mover)
        .filter_map(|tactic| {
            config
                .motif_rule(tactic.kind())
                .map(|rule| rule.formula.evaluate(tactic.target_count()))
        })
        .fold(0u32, u32::saturating_add);

    let total = config.base_turn_regeneration.saturating_add(bonus);
    let credited = match config.regeneration_cap {
        Some(cap) => total.min(cap),
        None => total,
    };

    if credited != total {
        log::debug!("{} regeneration {} capped at {}", mover, total, credited);
    }
    credited
}
