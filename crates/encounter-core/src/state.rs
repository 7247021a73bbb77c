//! Encounter state: turn position, phase, outcome and gauges.
//!
//! [`EncounterState`] is owned by the [`TurnEngine`](crate::TurnEngine) and
//! rebuilt from scratch on every reset. Presentation code reads it through
//! [`EncounterSnapshot`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::config::EncounterConfig;
use crate::gauge::{Gauge, GaugeKind};

// ── Outcome ──────────────────────────────────────────────────

/// Terminal classification of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    InProgress,
    /// Adversary health reached zero.
    AdversaryDefeated,
    /// Adversary aura reached zero.
    AdversaryConverted,
    /// Player health dropped to zero or below.
    PlayerDefeated,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::InProgress => "in_progress",
            Outcome::AdversaryDefeated => "adversary_defeated",
            Outcome::AdversaryConverted => "adversary_converted",
            Outcome::PlayerDefeated => "player_defeated",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Phase ────────────────────────────────────────────────────

/// The two halves of the adversary's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdversaryStep {
    /// The attack has not landed yet.
    Windup,
    /// The attack landed; control has not passed on yet.
    Recovery,
}

impl fmt::Display for AdversaryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdversaryStep::Windup => f.write_str("windup"),
            AdversaryStep::Recovery => f.write_str("recovery"),
        }
    }
}

/// Where the encounter's state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "phase", content = "detail")]
pub enum Phase {
    /// Waiting for the given player to submit an action.
    AwaitingPlayer(Actor),
    /// The adversary's automated turn is running.
    AdversaryActing(AdversaryStep),
    /// No further transitions are possible.
    Terminal(Outcome),
}

impl Phase {
    /// The phase a turn starts in for `actor`.
    pub(crate) fn entering(actor: Actor) -> Self {
        if actor.is_player() {
            Phase::AwaitingPlayer(actor)
        } else {
            Phase::AdversaryActing(AdversaryStep::Windup)
        }
    }
}

// ── Encounter State ──────────────────────────────────────────

/// Mutable state of a single encounter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EncounterState {
    pub(crate) turn_order: Vec<Actor>,
    /// Index into `turn_order`; wraps modulo its length.
    pub(crate) turn_index: usize,
    /// Turns started so far, counting the first as 0.
    pub(crate) turn: u64,
    /// Completed passes through the turn order, starting at 1.
    pub(crate) round: u32,
    pub(crate) phase: Phase,
    pub(crate) adversary_health: Gauge,
    pub(crate) aura: Gauge,
    pub(crate) player_health: Gauge,
}

impl EncounterState {
    /// Fresh state at turn index 0 with every gauge full.
    ///
    /// `config` must already be validated; the turn order is non-empty.
    pub(crate) fn new(config: &EncounterConfig) -> Self {
        let turn_order = config.turn_order.clone();
        let phase = Phase::entering(turn_order[0]);
        Self {
            turn_order,
            turn_index: 0,
            turn: 0,
            round: 1,
            phase,
            adversary_health: Gauge::full(config.adversary_max_health),
            aura: Gauge::full(config.aura_max),
            player_health: Gauge::full(config.player_max_health),
        }
    }

    pub(crate) fn active_actor(&self) -> Actor {
        self.turn_order[self.turn_index]
    }

    pub(crate) fn outcome(&self) -> Outcome {
        match self.phase {
            Phase::Terminal(outcome) => outcome,
            _ => Outcome::InProgress,
        }
    }

    pub(crate) fn gauge(&self, kind: GaugeKind) -> Gauge {
        match kind {
            GaugeKind::AdversaryHealth => self.adversary_health,
            GaugeKind::Aura => self.aura,
            GaugeKind::PlayerHealth => self.player_health,
        }
    }

    /// Move to the next actor in the order and enter its phase.
    pub(crate) fn advance(&mut self) -> Actor {
        self.turn_index = (self.turn_index + 1) % self.turn_order.len();
        if self.turn_index == 0 {
            self.round += 1;
        }
        self.turn += 1;
        let actor = self.active_actor();
        self.phase = Phase::entering(actor);
        actor
    }

    pub(crate) fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            active_actor: self.active_actor(),
            phase: self.phase,
            outcome: self.outcome(),
            turn: self.turn,
            round: self.round,
            adversary_health: self.adversary_health,
            aura: self.aura,
            player_health: self.player_health,
        }
    }
}

/// Read-only copy of the encounter, for presentation and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterSnapshot {
    pub active_actor: Actor,
    pub phase: Phase,
    pub outcome: Outcome,
    pub turn: u64,
    pub round: u32,
    pub adversary_health: Gauge,
    pub aura: Gauge,
    pub player_health: Gauge,
}
