//! Game configuration for the battle-point economy.
//!
//! A `GameConfig` is supplied by the game-session layer and treated as
//! read-only input. It can be built from one of the difficulty profiles
//! or loaded from JSON; missing fields fall back to the standard profile.
//!
//! Regeneration is table-driven: each motif kind maps to a [`MotifRule`]
//! (enable flag plus a declarative [`RegenFormula`]), so profiles differ
//! only in data.

use crate::error::ConfigError;
use crate::tactics::MotifKind;
use crate::types::PieceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Battle-point capacity per piece kind. Kings have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceCapacities {
    pub pawn: u32,
    pub knight: u32,
    pub bishop: u32,
    pub rook: u32,
    pub queen: u32,
}

impl Default for PieceCapacities {
    fn default() -> Self {
        Self {
            pawn: 1,
            knight: 3,
            bishop: 3,
            rook: 5,
            queen: 9,
        }
    }
}

impl PieceCapacities {
    pub fn of(&self, kind: PieceKind) -> Option<u32> {
        match kind {
            PieceKind::Pawn => Some(self.pawn),
            PieceKind::Knight => Some(self.knight),
            PieceKind::Bishop => Some(self.bishop),
            PieceKind::Rook => Some(self.rook),
            PieceKind::Queen => Some(self.queen),
            PieceKind::King => None,
        }
    }

    fn all(&self) -> [(PieceKind, u32); 5] {
        [
            (PieceKind::Pawn, self.pawn),
            (PieceKind::Knight, self.knight),
            (PieceKind::Bishop, self.bishop),
            (PieceKind::Rook, self.rook),
            (PieceKind::Queen, self.queen),
        ]
    }
}

/// How many battle points a detected motif is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegenFormula {
    /// A flat bonus per motif.
    Fixed { amount: u32 },
    /// A bonus per piece the motif hits (forked pieces, checking pieces).
    PerTarget { amount: u32 },
}

impl RegenFormula {
    pub fn evaluate(&self, target_count: u32) -> u32 {
        match *self {
            RegenFormula::Fixed { amount } => amount,
            RegenFormula::PerTarget { amount } => amount.saturating_mul(target_count),
        }
    }
}

/// Whether a motif kind regenerates battle points, and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifRule {
    pub enabled: bool,
    pub formula: RegenFormula,
}

impl MotifRule {
    pub fn fixed(amount: u32) -> Self {
        Self {
            enabled: true,
            formula: RegenFormula::Fixed { amount },
        }
    }

    pub fn per_target(amount: u32) -> Self {
        Self {
            enabled: true,
            formula: RegenFormula::PerTarget { amount },
        }
    }

    pub fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }
}

/// Who wins a duel when effective powers are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    Defender,
    Attacker,
}

/// Economy and regeneration settings for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub capacities: PieceCapacities,
    /// Ceiling on the effective power any allocation can reach.
    pub max_effective_bp: u32,
    /// Each player's starting pool.
    pub initial_bp: u32,
    /// Ceiling on a pool after regeneration, if any.
    pub max_bp: Option<u32>,
    pub base_turn_regeneration: u32,
    /// Clamp on the total credited in one turn, if any.
    pub regeneration_cap: Option<u32>,
    pub motifs: BTreeMap<MotifKind, MotifRule>,
    pub tie_break: TieBreak,
    /// BP charged per square of tactical retreat.
    pub retreat_cost_multiplier: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GameConfig {
    /// Every motif regenerates a flat bonus.
    pub fn standard() -> Self {
        let motifs = BTreeMap::from([
            (MotifKind::Check, MotifRule::fixed(1)),
            (MotifKind::Pin, MotifRule::fixed(1)),
            (MotifKind::Skewer, MotifRule::fixed(1)),
            (MotifKind::Fork, MotifRule::fixed(1)),
            (MotifKind::DiscoveredAttack, MotifRule::fixed(1)),
            (MotifKind::DirectDefence, MotifRule::fixed(1)),
        ]);
        Self {
            capacities: PieceCapacities::default(),
            max_effective_bp: 10,
            initial_bp: 39,
            max_bp: None,
            base_turn_regeneration: 1,
            regeneration_cap: None,
            motifs,
            tie_break: TieBreak::Defender,
            retreat_cost_multiplier: 1,
        }
    }

    /// Only checks and direct defences regenerate.
    pub fn beginner() -> Self {
        let mut config = Self::standard();
        for kind in [
            MotifKind::Pin,
            MotifKind::Skewer,
            MotifKind::Fork,
            MotifKind::DiscoveredAttack,
        ] {
            if let Some(rule) = config.motifs.get_mut(&kind) {
                *rule = rule.disabled();
            }
        }
        config
    }

    /// Bonuses scale with the number of pieces hit; turns are capped.
    pub fn advanced() -> Self {
        let mut config = Self::standard();
        config.motifs.insert(MotifKind::Check, MotifRule::per_target(1));
        config.motifs.insert(MotifKind::Pin, MotifRule::fixed(2));
        config.motifs.insert(MotifKind::Skewer, MotifRule::fixed(2));
        config.motifs.insert(MotifKind::Fork, MotifRule::per_target(1));
        config.motifs.insert(MotifKind::DiscoveredAttack, MotifRule::fixed(2));
        config.regeneration_cap = Some(6);
        config
    }

    /// Looks up one of the named profiles.
    pub fn profile(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "beginner" => Some(Self::beginner()),
            "standard" => Some(Self::standard()),
            "advanced" => Some(Self::advanced()),
            _ => None,
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded game config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects settings the economy cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, capacity) in self.capacities.all() {
            if capacity == 0 {
                return Err(ConfigError::Invalid(format!("{} capacity must be positive", kind)));
            }
            if capacity > self.max_effective_bp {
                return Err(ConfigError::Invalid(format!(
                    "{} capacity {} exceeds max effective BP {}",
                    kind, capacity, self.max_effective_bp
                )));
            }
        }
        if self.retreat_cost_multiplier == 0 {
            return Err(ConfigError::Invalid(
                "retreat cost multiplier must be positive".to_string(),
            ));
        }
        if let Some(max_bp) = self.max_bp
            && max_bp < self.initial_bp
        {
            return Err(ConfigError::Invalid(format!(
                "max BP {} is below initial BP {}",
                max_bp, self.initial_bp
            )));
        }
        Ok(())
    }

    /// The rule for a motif kind; missing entries regenerate nothing.
    pub fn motif_rule(&self, kind: MotifKind) -> Option<&MotifRule> {
        self.motifs.get(&kind).filter(|rule| rule.enabled)
    }
}
