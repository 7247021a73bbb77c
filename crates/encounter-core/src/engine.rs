//! Turn engine.
//!
//! The [`TurnEngine`] owns one encounter: the turn order, the three gauges,
//! the action rules and outcome detection. Players act through
//! [`submit_attack()`](TurnEngine::submit_attack) and
//! [`submit_empathy()`](TurnEngine::submit_empathy). The adversary's turn is
//! driven by the caller, either atomically with
//! [`advance_adversary_turn()`](TurnEngine::advance_adversary_turn) or in its
//! two observable steps, usually through a pacing driver from
//! [`crate::pacing`].

use std::fmt;

use tracing::{debug, info, instrument};

use crate::actor::{Action, Actor, Strengths};
use crate::config::{DefeatRule, EncounterConfig};
use crate::error::{CoreError, InvalidAction};
use crate::events::{EncounterEvent, EncounterObserver};
use crate::gauge::{Gauge, GaugeKind};
use crate::state::{AdversaryStep, EncounterSnapshot, EncounterState, Outcome, Phase};

/// State machine for a single encounter.
///
/// Every operation either applies fully or fails with no effect. Once an
/// outcome is reached the engine rejects everything except
/// [`reset_encounter()`](TurnEngine::reset_encounter).
///
/// # Examples
///
/// ```
/// use encounter_core::{Actor, EncounterConfig, Outcome, TurnEngine};
///
/// # fn example() -> Result<(), encounter_core::CoreError> {
/// let mut engine = TurnEngine::new(EncounterConfig::default())?;
///
/// engine.submit_attack(Actor::PlayerOne)?;
/// engine.submit_empathy(Actor::PlayerTwo)?;
/// let outcome = engine.advance_adversary_turn()?;
///
/// assert_eq!(outcome, Outcome::InProgress);
/// assert_eq!(engine.active_actor(), Actor::PlayerOne);
/// # Ok(())
/// # }
/// # example().expect("example should run");
/// ```
pub struct TurnEngine {
    /// Configuration the current encounter was built from.
    config: EncounterConfig,
    /// Encounter state, replaced wholesale on reset.
    state: EncounterState,
    /// Presentation collaborators notified of every change.
    observers: Vec<Box<dyn EncounterObserver>>,
}

impl fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TurnEngine {
    /// Start an encounter from `config`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the configuration fails
    /// validation.
    #[instrument(skip_all)]
    pub fn new(config: EncounterConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let state = EncounterState::new(&config);
        info!(turn_order = ?config.turn_order, "encounter started");

        Ok(Self {
            config,
            state,
            observers: Vec::new(),
        })
    }

    /// Register an observer for all subsequent notifications.
    pub fn subscribe(&mut self, observer: impl EncounterObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Queries ──────────────────────────────────────────────

    /// Returns the configuration of the running encounter.
    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    /// Actor whose turn it is. After an outcome, the actor whose action
    /// ended the encounter.
    pub fn active_actor(&self) -> Actor {
        self.state.active_actor()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_terminal()
    }

    pub fn gauge(&self, kind: GaugeKind) -> Gauge {
        self.state.gauge(kind)
    }

    /// Number of turns started before the current one.
    pub fn turn(&self) -> u64 {
        self.state.turn
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        self.state.snapshot()
    }

    // ── Player actions ───────────────────────────────────────

    /// Attack with `actor`: removes `attack strength * max health` from the
    /// adversary.
    ///
    /// Under [`DefeatRule::ExactZero`] health is not floored and only an
    /// exact zero defeats the adversary.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidAction` if it is not `actor`'s turn,
    /// `actor` is the adversary, or the encounter is over.
    pub fn submit_attack(&mut self, actor: Actor) -> Result<Outcome, CoreError> {
        self.submit(actor, Action::Attack)
    }

    /// Show empathy with `actor`: removes the actor's empathy strength from
    /// the adversary's aura, flooring at zero.
    ///
    /// # Errors
    ///
    /// Same conditions as [`submit_attack()`](TurnEngine::submit_attack).
    pub fn submit_empathy(&mut self, actor: Actor) -> Result<Outcome, CoreError> {
        self.submit(actor, Action::Empathy)
    }

    /// Apply `action` for `actor` and end their turn.
    ///
    /// Returns the outcome after the action: [`Outcome::InProgress`] if the
    /// turn passed on to the next actor.
    ///
    /// # Errors
    ///
    /// Same conditions as [`submit_attack()`](TurnEngine::submit_attack).
    #[instrument(skip(self), fields(turn = self.state.turn))]
    pub fn submit(&mut self, actor: Actor, action: Action) -> Result<Outcome, CoreError> {
        let strength = self.check_player_turn(actor)?.for_action(action);

        let ended = match action {
            Action::Attack => self.apply_attack(strength),
            Action::Empathy => self.apply_empathy(strength),
        };

        match ended {
            Some(outcome) => self.conclude(outcome),
            None => self.next_turn(),
        }
        Ok(self.outcome())
    }

    fn check_player_turn(&self, actor: Actor) -> Result<Strengths, InvalidAction> {
        if let Phase::Terminal(outcome) = self.state.phase {
            return Err(InvalidAction::EncounterOver(outcome));
        }
        let strengths = self
            .config
            .strengths(actor)
            .ok_or(InvalidAction::NotAPlayer(actor))?;

        match self.state.phase {
            Phase::AwaitingPlayer(active) if active == actor => Ok(strengths),
            _ => Err(InvalidAction::NotYourTurn {
                actor,
                active: self.state.active_actor(),
            }),
        }
    }

    /// Returns the outcome if the attack defeated the adversary.
    fn apply_attack(&mut self, strength: f32) -> Option<Outcome> {
        let health = &mut self.state.adversary_health;
        let amount = health.max() * strength;

        let defeated = match self.config.defeat_rule {
            DefeatRule::ExactZero => {
                health.drain(amount);
                health.current() == 0.0
            }
            DefeatRule::Depleted => {
                health.drain_clamped(amount);
                health.current() <= 0.0
            }
        };

        debug!(amount, health = health.current(), "adversary hit");
        self.notify_gauge(GaugeKind::AdversaryHealth);
        defeated.then_some(Outcome::AdversaryDefeated)
    }

    /// Returns the outcome if empathy converted the adversary.
    fn apply_empathy(&mut self, strength: f32) -> Option<Outcome> {
        let aura = &mut self.state.aura;
        aura.drain_clamped(strength);

        debug!(strength, aura = aura.current(), "aura weakened");
        let converted = aura.current() == 0.0;
        self.notify_gauge(GaugeKind::Aura);
        converted.then_some(Outcome::AdversaryConverted)
    }

    // ── Adversary turn ───────────────────────────────────────

    /// Run the whole adversary turn at once: strike, then hand over to the
    /// next actor unless the players were defeated.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidAction` if the adversary is not at the
    /// start of its turn or the encounter is over.
    pub fn advance_adversary_turn(&mut self) -> Result<Outcome, CoreError> {
        let outcome = self.resolve_adversary_strike()?;
        if outcome.is_terminal() {
            return Ok(outcome);
        }
        self.finish_adversary_turn()?;
        Ok(self.outcome())
    }

    /// First adversary step: the attack lands on the player side.
    ///
    /// Removes `adversary attack * player max health`. Player health is not
    /// floored; at or below zero the players are defeated. Otherwise the
    /// adversary moves to its recovery step.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidAction` unless the adversary is in its
    /// windup step.
    #[instrument(skip(self), fields(turn = self.state.turn))]
    pub fn resolve_adversary_strike(&mut self) -> Result<Outcome, CoreError> {
        self.ensure_adversary_step(AdversaryStep::Windup)?;

        let health = &mut self.state.player_health;
        let amount = health.max() * self.config.adversary_attack;
        health.drain(amount);
        let defeated = health.current() <= 0.0;

        debug!(amount, health = health.current(), "players hit");
        self.notify_gauge(GaugeKind::PlayerHealth);

        if defeated {
            self.conclude(Outcome::PlayerDefeated);
        } else {
            self.state.phase = Phase::AdversaryActing(AdversaryStep::Recovery);
        }
        Ok(self.outcome())
    }

    /// Second adversary step: control passes to the next actor.
    ///
    /// Returns the actor whose turn begins.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidAction` unless the adversary is in its
    /// recovery step.
    pub fn finish_adversary_turn(&mut self) -> Result<Actor, CoreError> {
        self.ensure_adversary_step(AdversaryStep::Recovery)?;
        self.next_turn();
        Ok(self.state.active_actor())
    }

    pub(crate) fn ensure_adversary_step(
        &self,
        expected: AdversaryStep,
    ) -> Result<(), InvalidAction> {
        match self.state.phase {
            Phase::AdversaryActing(current) if current == expected => Ok(()),
            Phase::AdversaryActing(current) => {
                Err(InvalidAction::AdversaryStepOutOfOrder { current, expected })
            }
            Phase::Terminal(outcome) => Err(InvalidAction::EncounterOver(outcome)),
            Phase::AwaitingPlayer(active) => Err(InvalidAction::AdversaryNotActing { active }),
        }
    }

    // ── Reset ────────────────────────────────────────────────

    /// Throw away the running encounter and start a new one from `config`.
    ///
    /// Gauges return to their maxima, the turn index to 0 and the outcome to
    /// in-progress. Observers stay subscribed and receive the fresh gauge
    /// values followed by the first turn.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if `config` fails validation. The
    /// running encounter is left untouched in that case.
    #[instrument(skip_all)]
    pub fn reset_encounter(&mut self, config: EncounterConfig) -> Result<(), CoreError> {
        config.validate()?;
        self.state = EncounterState::new(&config);
        self.config = config;
        info!(turn_order = ?self.config.turn_order, "encounter reset");

        for kind in [
            GaugeKind::AdversaryHealth,
            GaugeKind::Aura,
            GaugeKind::PlayerHealth,
        ] {
            self.notify_gauge(kind);
        }
        self.notify(EncounterEvent::TurnChanged {
            actor: self.state.active_actor(),
        });
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────

    fn next_turn(&mut self) {
        let actor = self.state.advance();
        debug!(%actor, turn = self.state.turn, round = self.state.round, "turn changed");
        self.notify(EncounterEvent::TurnChanged { actor });
    }

    fn conclude(&mut self, outcome: Outcome) {
        self.state.phase = Phase::Terminal(outcome);
        info!(
            %outcome,
            turn = self.state.turn,
            round = self.state.round,
            "encounter over"
        );
        self.notify(EncounterEvent::Outcome { outcome });
    }

    fn notify_gauge(&mut self, kind: GaugeKind) {
        let gauge = self.state.gauge(kind);
        self.notify(EncounterEvent::GaugeChanged {
            gauge: kind,
            value: gauge.current(),
            max: gauge.max(),
        });
    }

    fn notify(&mut self, event: EncounterEvent) {
        for observer in &mut self.observers {
            event.dispatch(observer.as_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;

    fn engine_with(config: EncounterConfig) -> (TurnEngine, EventLog) {
        let mut engine = TurnEngine::new(config).expect("config should be valid");
        let log = EventLog::new();
        engine.subscribe(log.clone());
        (engine, log)
    }

    /// Play one full round with the given action for both players.
    fn play_round(engine: &mut TurnEngine, action: Action) -> Outcome {
        for actor in [Actor::PlayerOne, Actor::PlayerTwo] {
            let outcome = engine.submit(actor, action).expect("player turn");
            if outcome.is_terminal() {
                return outcome;
            }
        }
        engine.advance_adversary_turn().expect("adversary turn")
    }

    fn health(engine: &TurnEngine) -> f32 {
        engine.gauge(GaugeKind::AdversaryHealth).current()
    }

    #[test]
    fn test_should_create_engine_with_defaults() {
        let engine = TurnEngine::new(EncounterConfig::default()).expect("should create");

        assert_eq!(engine.active_actor(), Actor::PlayerOne);
        assert_eq!(engine.phase(), Phase::AwaitingPlayer(Actor::PlayerOne));
        assert_eq!(engine.outcome(), Outcome::InProgress);
        assert_eq!(engine.turn(), 0);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.gauge(GaugeKind::PlayerHealth).current(), 1.0);
    }

    #[test]
    fn test_should_reject_invalid_config_on_create() {
        let config = EncounterConfig::builder().turn_order(Vec::new()).build();
        let result = TurnEngine::new(config);
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_should_defeat_adversary_after_four_exact_attacks() {
        let config = EncounterConfig::builder()
            .player_one_attack(0.25)
            .player_two_attack(0.0)
            .adversary_attack(0.0)
            .build();
        let (mut engine, _log) = engine_with(config);

        let mut seen = Vec::new();
        for _ in 0..3 {
            assert_eq!(play_round(&mut engine, Action::Attack), Outcome::InProgress);
            seen.push(health(&engine));
        }
        let outcome = engine
            .submit_attack(Actor::PlayerOne)
            .expect("fourth attack");
        seen.push(health(&engine));

        assert_eq!(seen, vec![0.75, 0.5, 0.25, 0.0]);
        assert_eq!(outcome, Outcome::AdversaryDefeated);
        assert_eq!(engine.phase(), Phase::Terminal(Outcome::AdversaryDefeated));
    }

    #[test]
    fn test_should_convert_adversary_after_two_empathy_actions() {
        let config = EncounterConfig::builder()
            .player_one_empathy(0.5)
            .player_two_empathy(0.0)
            .adversary_attack(0.0)
            .build();
        let (mut engine, _log) = engine_with(config);

        assert_eq!(
            engine.submit_empathy(Actor::PlayerOne).expect("empathy"),
            Outcome::InProgress
        );
        assert_eq!(engine.gauge(GaugeKind::Aura).current(), 0.5);

        engine.submit_empathy(Actor::PlayerTwo).expect("no-op empathy");
        engine.advance_adversary_turn().expect("adversary turn");

        let outcome = engine.submit_empathy(Actor::PlayerOne).expect("empathy");
        assert_eq!(engine.gauge(GaugeKind::Aura).current(), 0.0);
        assert_eq!(outcome, Outcome::AdversaryConverted);
    }

    #[test]
    fn test_should_defeat_players_after_four_adversary_turns() {
        let config = EncounterConfig::builder()
            .player_one_attack(0.0)
            .player_two_attack(0.0)
            .player_max_health(1.0)
            .adversary_attack(0.25)
            .build();
        let (mut engine, _log) = engine_with(config);

        for expected in [0.75, 0.5, 0.25] {
            assert_eq!(play_round(&mut engine, Action::Attack), Outcome::InProgress);
            assert_eq!(engine.gauge(GaugeKind::PlayerHealth).current(), expected);
        }

        assert_eq!(
            play_round(&mut engine, Action::Attack),
            Outcome::PlayerDefeated
        );
        assert_eq!(engine.gauge(GaugeKind::PlayerHealth).current(), 0.0);
        assert_eq!(engine.active_actor(), Actor::Adversary);
    }

    #[test]
    fn test_should_defeat_players_on_overshoot() {
        let config = EncounterConfig::builder()
            .player_one_attack(0.0)
            .player_two_attack(0.0)
            .adversary_attack(0.75)
            .build();
        let (mut engine, _log) = engine_with(config);

        play_round(&mut engine, Action::Attack);
        let outcome = play_round(&mut engine, Action::Attack);

        assert_eq!(engine.gauge(GaugeKind::PlayerHealth).current(), -0.5);
        assert_eq!(outcome, Outcome::PlayerDefeated);
    }

    #[test]
    fn test_should_not_defeat_adversary_on_overshoot_with_exact_zero_rule() {
        let config = EncounterConfig::builder()
            .player_one_attack(0.75)
            .player_two_attack(0.0)
            .adversary_attack(0.0)
            .build();
        let (mut engine, _log) = engine_with(config);

        play_round(&mut engine, Action::Attack);
        let outcome = engine.submit_attack(Actor::PlayerOne).expect("attack");

        assert_eq!(health(&engine), -0.5);
        assert_eq!(outcome, Outcome::InProgress);
        assert_eq!(engine.active_actor(), Actor::PlayerTwo);

        // Further attacks keep digging below zero without ending anything
        engine.submit_attack(Actor::PlayerTwo).expect("attack");
        engine.advance_adversary_turn().expect("adversary turn");
        engine.submit_attack(Actor::PlayerOne).expect("attack");
        assert_eq!(health(&engine), -1.25);
        assert!(!engine.is_over());
    }

    #[test]
    fn test_should_defeat_adversary_on_overshoot_with_depleted_rule() {
        let config = EncounterConfig::builder()
            .player_one_attack(0.75)
            .player_two_attack(0.0)
            .adversary_attack(0.0)
            .defeat_rule(DefeatRule::Depleted)
            .build();
        let (mut engine, _log) = engine_with(config);

        play_round(&mut engine, Action::Attack);
        let outcome = engine.submit_attack(Actor::PlayerOne).expect("attack");

        assert_eq!(health(&engine), 0.0);
        assert_eq!(outcome, Outcome::AdversaryDefeated);
    }

    #[test]
    fn test_should_scale_attack_by_max_health_but_not_empathy_by_max_aura() {
        let config = EncounterConfig::builder()
            .adversary_max_health(4.0)
            .aura_max(2.0)
            .player_one_attack(0.25)
            .player_two_empathy(0.5)
            .build();
        let (mut engine, _log) = engine_with(config);

        engine.submit_attack(Actor::PlayerOne).expect("attack");
        engine.submit_empathy(Actor::PlayerTwo).expect("empathy");

        assert_eq!(health(&engine), 3.0);
        assert_eq!(engine.gauge(GaugeKind::Aura).current(), 1.5);
    }

    #[test]
    fn test_should_keep_aura_within_bounds() {
        let strengths = [0.0, 0.1, 0.3, 0.7, 1.0];
        for &one in &strengths {
            for &two in &strengths {
                let config = EncounterConfig::builder()
                    .player_one_empathy(one)
                    .player_two_empathy(two)
                    .adversary_attack(0.1)
                    .build();
                let (mut engine, _log) = engine_with(config);

                while !engine.is_over() {
                    let outcome = match engine.phase() {
                        Phase::AwaitingPlayer(actor) => engine.submit_empathy(actor),
                        _ => engine.advance_adversary_turn(),
                    }
                    .expect("legal action");

                    let aura = engine.gauge(GaugeKind::Aura);
                    assert!(aura.current() >= 0.0, "aura below zero");
                    assert!(aura.current() <= aura.max(), "aura above max");
                    if outcome.is_terminal() {
                        break;
                    }
                }
            }
        }
    }

    #[test]
    fn test_should_cycle_turn_order_strictly() {
        let order = vec![Actor::PlayerTwo, Actor::Adversary, Actor::PlayerOne];
        let config = EncounterConfig::builder()
            .turn_order(order.clone())
            .player_one_attack(0.0)
            .player_two_attack(0.0)
            .adversary_attack(0.0)
            .build();
        let (mut engine, _log) = engine_with(config);

        for k in 0..30_u64 {
            assert_eq!(engine.turn(), k);
            assert_eq!(engine.active_actor(), order[(k as usize) % order.len()]);
            match engine.phase() {
                Phase::AwaitingPlayer(actor) => {
                    engine.submit_attack(actor).expect("player turn");
                }
                Phase::AdversaryActing(_) => {
                    engine.advance_adversary_turn().expect("adversary turn");
                }
                Phase::Terminal(outcome) => panic!("unexpected outcome {outcome}"),
            }
        }
        assert_eq!(engine.round(), 11);
    }

    #[test]
    fn test_should_reject_out_of_turn_actions_without_change() {
        let (mut engine, log) = engine_with(EncounterConfig::default());
        let before = engine.snapshot();

        let err = engine
            .submit_attack(Actor::PlayerTwo)
            .expect_err("not player two's turn");
        assert!(matches!(
            err,
            CoreError::InvalidAction(InvalidAction::NotYourTurn {
                actor: Actor::PlayerTwo,
                active: Actor::PlayerOne,
            })
        ));

        let err = engine
            .submit_empathy(Actor::Adversary)
            .expect_err("adversary is not a player");
        assert!(matches!(
            err,
            CoreError::InvalidAction(InvalidAction::NotAPlayer(Actor::Adversary))
        ));

        let err = engine
            .advance_adversary_turn()
            .expect_err("adversary is not acting");
        assert!(matches!(
            err,
            CoreError::InvalidAction(InvalidAction::AdversaryNotActing {
                active: Actor::PlayerOne
            })
        ));

        assert_eq!(engine.snapshot(), before);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_should_reject_player_actions_while_adversary_acts() {
        let (mut engine, _log) = engine_with(EncounterConfig::default());
        engine.submit_attack(Actor::PlayerOne).expect("attack");
        engine.submit_attack(Actor::PlayerTwo).expect("attack");

        assert_eq!(
            engine.phase(),
            Phase::AdversaryActing(AdversaryStep::Windup)
        );
        assert!(engine.submit_attack(Actor::PlayerOne).is_err());

        engine.resolve_adversary_strike().expect("strike");
        assert_eq!(
            engine.phase(),
            Phase::AdversaryActing(AdversaryStep::Recovery)
        );
        assert!(engine.submit_empathy(Actor::PlayerOne).is_err());

        assert_eq!(
            engine.finish_adversary_turn().expect("finish"),
            Actor::PlayerOne
        );
    }

    #[test]
    fn test_should_enforce_adversary_step_order() {
        let config = EncounterConfig::builder()
            .turn_order(vec![Actor::Adversary, Actor::PlayerOne, Actor::PlayerTwo])
            .build();
        let (mut engine, _log) = engine_with(config);

        let err = engine
            .finish_adversary_turn()
            .expect_err("cannot finish before striking");
        assert!(matches!(
            err,
            CoreError::InvalidAction(InvalidAction::AdversaryStepOutOfOrder {
                current: AdversaryStep::Windup,
                expected: AdversaryStep::Recovery,
            })
        ));

        engine.resolve_adversary_strike().expect("strike");
        assert!(engine.resolve_adversary_strike().is_err());
        assert_eq!(engine.gauge(GaugeKind::PlayerHealth).current(), 0.75);
    }

    #[test]
    fn test_should_freeze_after_outcome() {
        let config = EncounterConfig::builder().player_one_attack(1.0).build();
        let (mut engine, log) = engine_with(config);

        engine.submit_attack(Actor::PlayerOne).expect("attack");
        assert_eq!(engine.outcome(), Outcome::AdversaryDefeated);
        let frozen = engine.snapshot();
        let events = log.events().len();

        for result in [
            engine.submit_attack(Actor::PlayerOne),
            engine.submit_attack(Actor::PlayerTwo),
            engine.submit_empathy(Actor::PlayerOne),
            engine.advance_adversary_turn(),
            engine.resolve_adversary_strike(),
        ] {
            assert!(matches!(
                result,
                Err(CoreError::InvalidAction(InvalidAction::EncounterOver(
                    Outcome::AdversaryDefeated
                )))
            ));
        }
        assert!(engine.finish_adversary_turn().is_err());

        assert_eq!(engine.snapshot(), frozen);
        assert_eq!(log.events().len(), events);
    }

    #[test]
    fn test_should_emit_notifications_in_order() {
        let (mut engine, log) = engine_with(EncounterConfig::default());

        engine.submit_attack(Actor::PlayerOne).expect("attack");
        engine.submit_empathy(Actor::PlayerTwo).expect("empathy");
        engine.advance_adversary_turn().expect("adversary");

        assert_eq!(
            log.events(),
            vec![
                EncounterEvent::GaugeChanged {
                    gauge: GaugeKind::AdversaryHealth,
                    value: 0.75,
                    max: 1.0,
                },
                EncounterEvent::TurnChanged {
                    actor: Actor::PlayerTwo
                },
                EncounterEvent::GaugeChanged {
                    gauge: GaugeKind::Aura,
                    value: 0.5,
                    max: 1.0,
                },
                EncounterEvent::TurnChanged {
                    actor: Actor::Adversary
                },
                EncounterEvent::GaugeChanged {
                    gauge: GaugeKind::PlayerHealth,
                    value: 0.75,
                    max: 1.0,
                },
                EncounterEvent::TurnChanged {
                    actor: Actor::PlayerOne
                },
            ]
        );
    }

    #[test]
    fn test_should_emit_outcome_once_and_last() {
        let config = EncounterConfig::builder().player_one_empathy(1.0).build();
        let (mut engine, log) = engine_with(config);

        engine.submit_empathy(Actor::PlayerOne).expect("empathy");
        let _ = engine.submit_empathy(Actor::PlayerTwo);

        let events = log.events();
        assert_eq!(
            events.last(),
            Some(&EncounterEvent::Outcome {
                outcome: Outcome::AdversaryConverted
            })
        );
        let outcomes = events
            .iter()
            .filter(|e| matches!(e, EncounterEvent::Outcome { .. }))
            .count();
        assert_eq!(outcomes, 1);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, EncounterEvent::TurnChanged { .. }))
        );
    }

    #[test]
    fn test_should_restore_everything_on_reset() {
        let (mut engine, log) = engine_with(EncounterConfig::default());
        engine.submit_attack(Actor::PlayerOne).expect("attack");
        engine.submit_empathy(Actor::PlayerTwo).expect("empathy");
        engine.advance_adversary_turn().expect("adversary");
        engine.submit_attack(Actor::PlayerOne).expect("attack");
        log.drain();

        engine
            .reset_encounter(EncounterConfig::default())
            .expect("reset");

        assert_eq!(health(&engine), 1.0);
        assert_eq!(engine.gauge(GaugeKind::Aura).current(), 1.0);
        assert_eq!(engine.gauge(GaugeKind::PlayerHealth).current(), 1.0);
        assert_eq!(engine.active_actor(), Actor::PlayerOne);
        assert_eq!(engine.turn(), 0);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.outcome(), Outcome::InProgress);

        let events = log.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[3],
            EncounterEvent::TurnChanged {
                actor: Actor::PlayerOne
            }
        );
    }

    #[test]
    fn test_should_reset_after_outcome_with_new_config() {
        let config = EncounterConfig::builder().player_one_attack(1.0).build();
        let (mut engine, _log) = engine_with(config);
        engine.submit_attack(Actor::PlayerOne).expect("attack");
        assert!(engine.is_over());

        let next = EncounterConfig::builder()
            .turn_order(vec![Actor::PlayerTwo, Actor::Adversary, Actor::PlayerOne])
            .adversary_max_health(2.0)
            .build();
        engine.reset_encounter(next).expect("reset");

        assert!(!engine.is_over());
        assert_eq!(engine.active_actor(), Actor::PlayerTwo);
        assert_eq!(engine.gauge(GaugeKind::AdversaryHealth).max(), 2.0);
        assert!(engine.submit_attack(Actor::PlayerOne).is_err());
    }

    #[test]
    fn test_should_keep_encounter_when_reset_config_is_invalid() {
        let (mut engine, log) = engine_with(EncounterConfig::default());
        engine.submit_attack(Actor::PlayerOne).expect("attack");
        let before = engine.snapshot();
        log.drain();

        let bad = EncounterConfig::builder().aura_max(-1.0).build();
        let result = engine.reset_encounter(bad);

        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.config(), &EncounterConfig::default());
        assert!(log.events().is_empty());
    }
}
