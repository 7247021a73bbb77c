//! Real-time pacing of the adversary's turn.
//!
//! The adversary's turn has two suspension points: a windup before its
//! attack lands and a recovery before the next actor's turn begins. The
//! engine models them as [`AdversaryStep`]s and leaves the clock to the
//! caller. Two drivers are provided:
//!
//! - [`play_adversary_turn`] sleeps on the tokio timer between the steps.
//! - [`AdversaryTimer`] performs whichever step is due when polled with the
//!   current [`Instant`], for loops that already wait on something else
//!   (terminal input, frame ticks).
//!
//! [`AdversaryPacing::instant()`] collapses both delays while keeping the
//! two steps distinct.

use std::time::{Duration, Instant};

use tracing::{debug, instrument};
use typed_builder::TypedBuilder;

use crate::config::PacingConfig;
use crate::engine::TurnEngine;
use crate::error::CoreError;
use crate::state::{AdversaryStep, Outcome, Phase};

/// Delays around the adversary's attack.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use encounter_core::AdversaryPacing;
///
/// let pacing = AdversaryPacing::builder()
///     .windup(Duration::from_millis(500))
///     .build();
///
/// assert_eq!(pacing.recovery(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct AdversaryPacing {
    /// Wait before the attack lands.
    #[builder(default = Duration::from_secs(1))]
    windup: Duration,

    /// Wait after the attack before the next actor's turn.
    #[builder(default = Duration::from_secs(1))]
    recovery: Duration,
}

impl Default for AdversaryPacing {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<PacingConfig> for AdversaryPacing {
    fn from(config: PacingConfig) -> Self {
        Self {
            windup: config.windup(),
            recovery: config.recovery(),
        }
    }
}

impl AdversaryPacing {
    /// No delays. Both steps still happen in order.
    pub fn instant() -> Self {
        Self {
            windup: Duration::ZERO,
            recovery: Duration::ZERO,
        }
    }

    pub fn windup(&self) -> Duration {
        self.windup
    }

    pub fn recovery(&self) -> Duration {
        self.recovery
    }

    /// Delay that precedes `step`.
    pub fn delay_before(&self, step: AdversaryStep) -> Duration {
        match step {
            AdversaryStep::Windup => self.windup,
            AdversaryStep::Recovery => self.recovery,
        }
    }
}

// ── Async driver ─────────────────────────────────────────────

/// Play the adversary's turn with real delays.
///
/// Waits out the windup, lands the attack, and, unless the players were
/// defeated, waits out the recovery and passes the turn on. The turn cannot
/// be cancelled halfway: the engine is borrowed for the whole call.
///
/// # Errors
///
/// Returns `CoreError::InvalidAction` without waiting if the adversary is
/// not at the start of its turn.
#[instrument(skip_all, fields(turn = engine.turn()))]
pub async fn play_adversary_turn(
    engine: &mut TurnEngine,
    pacing: AdversaryPacing,
) -> Result<Outcome, CoreError> {
    engine.ensure_adversary_step(AdversaryStep::Windup)?;

    sleep_unless_zero(pacing.windup).await;
    let outcome = engine.resolve_adversary_strike()?;
    if outcome.is_terminal() {
        return Ok(outcome);
    }

    sleep_unless_zero(pacing.recovery).await;
    let next = engine.finish_adversary_turn()?;
    debug!(%next, "adversary turn complete");
    Ok(engine.outcome())
}

async fn sleep_unless_zero(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

// ── Poll driver ──────────────────────────────────────────────

/// Poll-based adversary clock.
///
/// Call [`poll()`](AdversaryTimer::poll) regularly with the current time.
/// The first poll during an adversary step arms a deadline; once it passes,
/// the step is performed. The recovery deadline counts from the windup
/// deadline, not from the poll that noticed it.
#[derive(Debug, Clone)]
pub struct AdversaryTimer {
    pacing: AdversaryPacing,
    /// Step the deadline was armed for, keyed by the engine's turn counter.
    armed: Option<Armed>,
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    turn: u64,
    step: AdversaryStep,
    deadline: Instant,
}

impl AdversaryTimer {
    pub fn new(pacing: AdversaryPacing) -> Self {
        Self {
            pacing,
            armed: None,
        }
    }

    pub fn pacing(&self) -> AdversaryPacing {
        self.pacing
    }

    /// Forget any armed deadline. Call after resetting the engine.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Time left until the armed step is due, if one is armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.armed
            .map(|armed| armed.deadline.saturating_duration_since(now))
    }

    /// Perform the adversary step that is due at `now`, if any.
    ///
    /// Returns `true` when a step was performed.
    ///
    /// # Errors
    ///
    /// Propagates `CoreError::InvalidAction` from the engine, which only
    /// happens if the engine was driven by someone else in between.
    pub fn poll(&mut self, now: Instant, engine: &mut TurnEngine) -> Result<bool, CoreError> {
        let Phase::AdversaryActing(step) = engine.phase() else {
            self.armed = None;
            return Ok(false);
        };

        let armed = match self.armed {
            Some(armed) if armed.turn == engine.turn() && armed.step == step => armed,
            _ => {
                let armed = Armed {
                    turn: engine.turn(),
                    step,
                    deadline: now + self.pacing.delay_before(step),
                };
                self.armed = Some(armed);
                armed
            }
        };

        if now < armed.deadline {
            return Ok(false);
        }

        match step {
            AdversaryStep::Windup => {
                engine.resolve_adversary_strike()?;
                self.armed = match engine.phase() {
                    Phase::AdversaryActing(AdversaryStep::Recovery) => Some(Armed {
                        turn: armed.turn,
                        step: AdversaryStep::Recovery,
                        deadline: armed.deadline + self.pacing.recovery,
                    }),
                    _ => None,
                };
            }
            AdversaryStep::Recovery => {
                engine.finish_adversary_turn()?;
                self.armed = None;
            }
        }
        Ok(true)
    }
}
