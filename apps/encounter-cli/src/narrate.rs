//! Turns engine events into narration lines.

use encounter_core::{Action, Actor, EncounterEvent, GaugeKind, TurnEngine};
use encounter_narration::{NarrationError, NarrationManager};
use serde_json::json;

/// Human-facing name for a gauge.
pub fn gauge_label(gauge: GaugeKind) -> &'static str {
    match gauge {
        GaugeKind::AdversaryHealth => "Adversary health",
        GaugeKind::Aura => "Adversary aura",
        GaugeKind::PlayerHealth => "Party health",
    }
}

/// Narration line for one event.
///
/// Turn and round numbers are read from `engine`, so call this before the
/// engine moves on.
pub fn narrate_event(
    narration: &NarrationManager,
    event: &EncounterEvent,
    engine: &TurnEngine,
) -> Result<String, NarrationError> {
    match *event {
        EncounterEvent::TurnChanged { actor } => narration.render(
            "turn",
            &json!({ "actor": actor.to_string(), "round": engine.round() }),
        ),
        EncounterEvent::GaugeChanged { gauge, value, max } => narration.render(
            "gauge",
            &json!({ "label": gauge_label(gauge), "value": value, "max": max }),
        ),
        EncounterEvent::Outcome { outcome } => narration.render(
            &format!("outcome/{}", outcome.as_str()),
            // turns taken, counting the one that ended the encounter
            &json!({ "turn": engine.turn() + 1, "round": engine.round() }),
        ),
    }
}

/// Line announcing a player's action.
pub fn narrate_action(
    narration: &NarrationManager,
    actor: Actor,
    action: Action,
) -> Result<String, NarrationError> {
    narration.render(
        "action",
        &json!({ "actor": actor.to_string(), "action": action.to_string() }),
    )
}
