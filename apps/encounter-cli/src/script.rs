//! Headless scripted runs.
//!
//! Player actions are taken from a list in turn order, whichever player is
//! up. Adversary turns run through [`play_adversary_turn`]. The run stops at
//! a terminal outcome or when a player is up and the list is exhausted.

use anyhow::{Context, Result};
use clap::ValueEnum;
use encounter_core::{
    AdversaryPacing, EncounterConfig, EncounterSnapshot, EventStream, Phase, TurnEngine,
    event_channel, play_adversary_turn,
};
use encounter_narration::NarrationManager;
use tracing::{debug, info};

use crate::narrate::{narrate_action, narrate_event};

/// A scripted player action, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScriptAction {
    #[value(alias = "a")]
    Attack,
    #[value(alias = "e")]
    Empathy,
}

impl From<ScriptAction> for encounter_core::Action {
    fn from(action: ScriptAction) -> Self {
        match action {
            ScriptAction::Attack => encounter_core::Action::Attack,
            ScriptAction::Empathy => encounter_core::Action::Empathy,
        }
    }
}

/// Result of a scripted run.
#[derive(Debug)]
pub struct ScriptReport {
    /// Narration lines in the order they happened.
    pub lines: Vec<String>,
    /// Final state of the encounter.
    pub snapshot: EncounterSnapshot,
    /// Scripted actions left unused.
    pub unused_actions: usize,
}

/// Run `actions` against a fresh encounter built from `config`.
///
/// # Errors
///
/// Returns an error if the config is invalid, the engine rejects a step, or
/// narration fails to render.
pub async fn run_script(
    config: EncounterConfig,
    actions: &[ScriptAction],
    pacing: AdversaryPacing,
    narration: &NarrationManager,
) -> Result<ScriptReport> {
    let mut engine = TurnEngine::new(config).context("failed to start encounter")?;
    let (observer, mut events) = event_channel();
    engine.subscribe(observer);

    let mut lines = Vec::new();
    let mut remaining = actions.iter().copied();

    loop {
        match engine.phase() {
            Phase::AwaitingPlayer(actor) => {
                let Some(action) = remaining.next() else {
                    debug!(%actor, "script exhausted");
                    break;
                };
                let action = action.into();
                lines.push(narrate_action(narration, actor, action)?);
                engine
                    .submit(actor, action)
                    .with_context(|| format!("{actor} could not {action}"))?;
            }
            Phase::AdversaryActing(_) => {
                play_adversary_turn(&mut engine, pacing)
                    .await
                    .context("adversary turn failed")?;
            }
            Phase::Terminal(_) => break,
        }
        narrate_pending(&mut events, &engine, narration, &mut lines)?;
    }

    let unused_actions = remaining.count();
    info!(outcome = %engine.outcome(), turn = engine.turn(), unused_actions, "script finished");

    Ok(ScriptReport {
        lines,
        snapshot: engine.snapshot(),
        unused_actions,
    })
}

fn narrate_pending(
    events: &mut EventStream,
    engine: &TurnEngine,
    narration: &NarrationManager,
    lines: &mut Vec<String>,
) -> Result<()> {
    while let Some(event) = events.try_next() {
        lines.push(narrate_event(narration, &event, engine)?);
    }
    Ok(())
}
