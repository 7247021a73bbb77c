//! Turn engine for a cooperative two-player encounter against a scripted
//! adversary.
//!
//! Players wear the adversary down with attacks (health) or empathy (aura);
//! the adversary answers on its own turn. See [`TurnEngine`] for the rules
//! and [`pacing`] for driving the adversary's turn in real time.

mod actor;
mod config;
mod engine;
mod error;
mod events;
mod gauge;
pub mod pacing;
mod state;

pub use actor::{Action, Actor, Strengths};
pub use config::{DefeatRule, EncounterConfig, PacingConfig, load_encounter_config};
pub use engine::TurnEngine;
pub use error::{CoreError, InvalidAction};
pub use events::{
    ChannelObserver, EncounterEvent, EncounterObserver, EventLog, EventStream, event_channel,
};
pub use gauge::{Gauge, GaugeKind};
pub use pacing::{AdversaryPacing, AdversaryTimer, play_adversary_turn};
pub use state::{AdversaryStep, EncounterSnapshot, Outcome, Phase};
