//! Outbound notifications for presentation layers.
//!
//! The engine reports every change through [`EncounterObserver`]. Two
//! observers ship with the crate: [`EventLog`] records [`EncounterEvent`]
//! values in memory, and [`ChannelObserver`] forwards them onto a tokio
//! channel read through [`EventStream`].

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::actor::Actor;
use crate::gauge::GaugeKind;
use crate::state::Outcome;

// ── Observer ─────────────────────────────────────────────────

/// Receiver of engine notifications.
///
/// Calls are fire-and-forget: the engine ignores anything the observer does
/// and never waits on it. All methods default to doing nothing.
pub trait EncounterObserver: Send {
    /// A new turn started for `actor`.
    fn on_turn_changed(&mut self, actor: Actor) {
        let _ = actor;
    }

    /// A gauge now holds `value` out of `max`.
    fn on_gauge_changed(&mut self, gauge: GaugeKind, value: f32, max: f32) {
        let _ = (gauge, value, max);
    }

    /// The encounter ended. Sent once; nothing follows it.
    fn on_outcome(&mut self, outcome: Outcome) {
        let _ = outcome;
    }
}

// ── Events ───────────────────────────────────────────────────

/// A notification as a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum EncounterEvent {
    TurnChanged {
        actor: Actor,
    },
    GaugeChanged {
        gauge: GaugeKind,
        value: f32,
        max: f32,
    },
    Outcome {
        outcome: Outcome,
    },
}

impl EncounterEvent {
    /// Deliver this event to `observer` through the matching callback.
    pub fn dispatch(&self, observer: &mut dyn EncounterObserver) {
        match *self {
            EncounterEvent::TurnChanged { actor } => observer.on_turn_changed(actor),
            EncounterEvent::GaugeChanged { gauge, value, max } => {
                observer.on_gauge_changed(gauge, value, max)
            }
            EncounterEvent::Outcome { outcome } => observer.on_outcome(outcome),
        }
    }
}

// ── Event Log ────────────────────────────────────────────────

/// In-memory record of events.
///
/// Clones share the same buffer, so one clone can be handed to the engine
/// while another is kept for reading.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<EncounterEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<EncounterEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return every event recorded so far.
    pub fn drain(&self) -> Vec<EncounterEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn record(&self, event: EncounterEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl EncounterObserver for EventLog {
    fn on_turn_changed(&mut self, actor: Actor) {
        self.record(EncounterEvent::TurnChanged { actor });
    }

    fn on_gauge_changed(&mut self, gauge: GaugeKind, value: f32, max: f32) {
        self.record(EncounterEvent::GaugeChanged { gauge, value, max });
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        self.record(EncounterEvent::Outcome { outcome });
    }
}

// ── Channel ──────────────────────────────────────────────────

/// Observer that forwards events onto an unbounded tokio channel.
///
/// Sending never blocks. Events sent after the [`EventStream`] is dropped
/// are discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    event_tx: mpsc::UnboundedSender<EncounterEvent>,
}

impl EncounterObserver for ChannelObserver {
    fn on_turn_changed(&mut self, actor: Actor) {
        let _ = self.event_tx.send(EncounterEvent::TurnChanged { actor });
    }

    fn on_gauge_changed(&mut self, gauge: GaugeKind, value: f32, max: f32) {
        let _ = self
            .event_tx
            .send(EncounterEvent::GaugeChanged { gauge, value, max });
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        let _ = self.event_tx.send(EncounterEvent::Outcome { outcome });
    }
}

/// Handle for consuming engine events asynchronously.
#[derive(Debug)]
pub struct EventStream {
    event_rx: mpsc::UnboundedReceiver<EncounterEvent>,
}

impl EventStream {
    /// Wait for the next event.
    ///
    /// Returns `None` once every [`ChannelObserver`] feeding this stream has
    /// been dropped and the buffer is empty.
    pub async fn next(&mut self) -> Option<EncounterEvent> {
        self.event_rx.recv().await
    }

    /// Take the next buffered event without waiting.
    pub fn try_next(&mut self) -> Option<EncounterEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// Create a connected observer/stream pair.
pub fn event_channel() -> (ChannelObserver, EventStream) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (ChannelObserver { event_tx }, EventStream { event_rx })
}
