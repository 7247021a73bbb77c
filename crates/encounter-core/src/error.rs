use thiserror::Error;

use crate::actor::Actor;
use crate::state::{AdversaryStep, Outcome};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why the engine refused an action. The engine state is untouched whenever
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("it is {active}'s turn, not {actor}'s")]
    NotYourTurn { actor: Actor, active: Actor },

    #[error("{0} cannot submit player actions")]
    NotAPlayer(Actor),

    #[error("the adversary is not acting ({active} is active)")]
    AdversaryNotActing { active: Actor },

    #[error("adversary turn is at {current}, expected {expected}")]
    AdversaryStepOutOfOrder {
        current: AdversaryStep,
        expected: AdversaryStep,
    },

    #[error("encounter is over: {0}")]
    EncounterOver(Outcome),
}
