//! Encounter participants and the actions players can take.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three participants in an encounter.
///
/// Actors are compared by value; the turn order is a list of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Actor {
    PlayerOne,
    PlayerTwo,
    Adversary,
}

impl Actor {
    /// All actors, in the default turn order.
    pub const ALL: [Actor; 3] = [Actor::PlayerOne, Actor::PlayerTwo, Actor::Adversary];

    /// Returns true for the two player-controlled actors.
    pub fn is_player(self) -> bool {
        !matches!(self, Actor::Adversary)
    }

    /// Stable snake_case name, used in logs and narration contexts.
    pub fn as_str(self) -> &'static str {
        match self {
            Actor::PlayerOne => "player_one",
            Actor::PlayerTwo => "player_two",
            Actor::Adversary => "adversary",
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Actor::PlayerOne => "Player One",
            Actor::PlayerTwo => "Player Two",
            Actor::Adversary => "Adversary",
        };
        f.write_str(label)
    }
}

/// A player action. Only one may be submitted per player turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Removes a fraction of the adversary's maximum health.
    Attack,
    /// Drains the adversary's aura toward conversion.
    Empathy,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Attack => f.write_str("attack"),
            Action::Empathy => f.write_str("empathy"),
        }
    }
}

/// Per-player action strengths, each a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strengths {
    pub attack: f32,
    pub empathy: f32,
}

impl Strengths {
    pub fn for_action(&self, action: Action) -> f32 {
        match action {
            Action::Attack => self.attack,
            Action::Empathy => self.empathy,
        }
    }
}
