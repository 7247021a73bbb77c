//! Configuration types for encounter-core.
//!
//! [`EncounterConfig`] holds every tunable number of an encounter: the turn
//! order, per-player action strengths, adversary stats, gauge maxima, the
//! adversary defeat rule and the adversary turn pacing. It can be built in
//! code via [`EncounterConfig::builder()`] or read from a YAML file with
//! [`load_encounter_config`]. Missing keys fall back to the defaults.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::actor::{Actor, Strengths};
use crate::error::CoreError;

// ── Encounter Configuration ──────────────────────────────────

/// Encounter parameters, supplied at start and on every reset.
///
/// # Examples
///
/// ```
/// use encounter_core::{Actor, EncounterConfig};
///
/// let config = EncounterConfig::builder()
///     .turn_order(vec![Actor::PlayerTwo, Actor::PlayerOne, Actor::Adversary])
///     .player_one_attack(0.5)
///     .build();
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct EncounterConfig {
    /// Cyclic order in which actors take turns.
    #[serde(default = "default_turn_order")]
    #[builder(default = default_turn_order())]
    pub turn_order: Vec<Actor>,

    /// Fraction of adversary max health Player One removes per attack.
    #[serde(default = "default_attack")]
    #[builder(default = default_attack())]
    pub player_one_attack: f32,

    /// Aura Player One removes per empathy action.
    #[serde(default = "default_empathy")]
    #[builder(default = default_empathy())]
    pub player_one_empathy: f32,

    #[serde(default = "default_attack")]
    #[builder(default = default_attack())]
    pub player_two_attack: f32,

    #[serde(default = "default_empathy")]
    #[builder(default = default_empathy())]
    pub player_two_empathy: f32,

    /// Fraction of player max health the adversary removes per turn.
    #[serde(default = "default_attack")]
    #[builder(default = default_attack())]
    pub adversary_attack: f32,

    #[serde(default = "default_max")]
    #[builder(default = default_max())]
    pub adversary_max_health: f32,

    #[serde(default = "default_max")]
    #[builder(default = default_max())]
    pub player_max_health: f32,

    #[serde(default = "default_max")]
    #[builder(default = default_max())]
    pub aura_max: f32,

    /// How adversary-health depletion is detected.
    #[serde(default)]
    #[builder(default)]
    pub defeat_rule: DefeatRule,

    /// Real-time delays of the adversary turn.
    #[serde(default)]
    #[builder(default)]
    pub pacing: PacingConfig,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EncounterConfig {
    /// Action strengths for a player actor, `None` for the adversary.
    pub fn strengths(&self, actor: Actor) -> Option<Strengths> {
        match actor {
            Actor::PlayerOne => Some(Strengths {
                attack: self.player_one_attack,
                empathy: self.player_one_empathy,
            }),
            Actor::PlayerTwo => Some(Strengths {
                attack: self.player_two_attack,
                empathy: self.player_two_empathy,
            }),
            Actor::Adversary => None,
        }
    }

    /// Check the configuration before an encounter is built from it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` unless the turn order lists every
    /// actor exactly once, if any strength is outside `[0, 1]`, or if any gauge
    /// maximum is not a positive finite number.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.turn_order.is_empty() {
            return Err(CoreError::InvalidConfig("turn order is empty".into()));
        }

        let mut seen = HashSet::with_capacity(self.turn_order.len());
        for actor in &self.turn_order {
            if !seen.insert(*actor) {
                return Err(CoreError::InvalidConfig(format!(
                    "{actor} appears more than once in the turn order"
                )));
            }
        }
        if let Some(missing) = Actor::ALL.iter().find(|actor| !seen.contains(*actor)) {
            return Err(CoreError::InvalidConfig(format!(
                "{missing} is missing from the turn order"
            )));
        }

        let strengths = [
            ("playerOneAttack", self.player_one_attack),
            ("playerOneEmpathy", self.player_one_empathy),
            ("playerTwoAttack", self.player_two_attack),
            ("playerTwoEmpathy", self.player_two_empathy),
            ("adversaryAttack", self.adversary_attack),
        ];
        for (name, value) in strengths {
            // NaN fails the range check as well
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} ({value}) must be within [0, 1]"
                )));
            }
        }

        let maxima = [
            ("adversaryMaxHealth", self.adversary_max_health),
            ("playerMaxHealth", self.player_max_health),
            ("auraMax", self.aura_max),
        ];
        for (name, value) in maxima {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} ({value}) must be a positive number"
                )));
            }
        }

        Ok(())
    }
}

// ── Sub-configuration types ──────────────────────────────────

/// Rule used to decide that an attack has defeated the adversary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DefeatRule {
    /// Health is drained without a floor and the adversary is defeated only
    /// when it lands on exactly zero. An overshooting attack leaves health
    /// negative and the encounter running.
    #[default]
    ExactZero,
    /// Health is floored at zero and the adversary is defeated at or below
    /// zero.
    Depleted,
}

/// Delays around the adversary's attack, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PacingConfig {
    /// Delay before the adversary's attack lands.
    #[serde(default = "default_delay_ms")]
    pub windup_ms: u64,

    /// Delay after the attack before the next actor's turn.
    #[serde(default = "default_delay_ms")]
    pub recovery_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            windup_ms: default_delay_ms(),
            recovery_ms: default_delay_ms(),
        }
    }
}

impl PacingConfig {
    pub fn windup(&self) -> Duration {
        Duration::from_millis(self.windup_ms)
    }

    pub fn recovery(&self) -> Duration {
        Duration::from_millis(self.recovery_ms)
    }
}

// ── Default value functions for serde ────────────────────────

fn default_turn_order() -> Vec<Actor> {
    Actor::ALL.to_vec()
}

fn default_attack() -> f32 {
    0.25
}

fn default_empathy() -> f32 {
    0.5
}

fn default_max() -> f32 {
    1.0
}

fn default_delay_ms() -> u64 {
    1000
}

// ── Config loading ───────────────────────────────────────────

/// Load an [`EncounterConfig`] from a YAML file.
///
/// If the file does not exist, returns the default configuration. The loaded
/// configuration is validated before it is returned.
///
/// # Errors
///
/// Returns `CoreError::Io` if the file exists but cannot be read.
/// Returns `CoreError::Yaml` if the file contains invalid YAML.
/// Returns `CoreError::InvalidConfig` if the values fail validation.
pub fn load_encounter_config(config_path: &Path) -> Result<EncounterConfig, CoreError> {
    if !config_path.exists() {
        return Ok(EncounterConfig::default());
    }
    let content = std::fs::read_to_string(config_path)?;
    let config: EncounterConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
