//! Bounded numeric resources.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which gauge a change notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GaugeKind {
    /// The adversary's combat resource, reduced by attacks.
    AdversaryHealth,
    /// The adversary's resistance to conversion, reduced by empathy.
    Aura,
    /// The player side's shared health, reduced by the adversary.
    PlayerHealth,
}

impl GaugeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GaugeKind::AdversaryHealth => "adversary_health",
            GaugeKind::Aura => "aura",
            GaugeKind::PlayerHealth => "player_health",
        }
    }
}

impl fmt::Display for GaugeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A current value with a fixed maximum.
///
/// The maximum never changes for the lifetime of a gauge. The current value
/// starts at the maximum and only moves down. Whether it may drop below zero
/// depends on which drain method the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    current: f32,
    max: f32,
}

impl Gauge {
    /// A gauge filled to `max`.
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Current value as a fraction of the maximum, clamped to `[0, 1]` for
    /// display.
    pub fn ratio(&self) -> f64 {
        (f64::from(self.current) / f64::from(self.max)).clamp(0.0, 1.0)
    }

    /// Subtract `amount` with no floor. The result may be negative.
    pub(crate) fn drain(&mut self, amount: f32) {
        self.current -= amount;
    }

    /// Subtract `amount`, flooring the result at zero.
    pub(crate) fn drain_clamped(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_start_full() {
        let gauge = Gauge::full(2.0);
        assert_eq!(gauge.current(), 2.0);
        assert_eq!(gauge.max(), 2.0);
        assert_eq!(gauge.ratio(), 1.0);
    }

    #[test]
    fn test_should_allow_negative_on_unclamped_drain() {
        let mut gauge = Gauge::full(1.0);
        gauge.drain(0.75);
        gauge.drain(0.75);
        assert_eq!(gauge.current(), -0.5);
        assert_eq!(gauge.ratio(), 0.0);
    }

    #[test]
    fn test_should_floor_at_zero_on_clamped_drain() {
        let mut gauge = Gauge::full(1.0);
        gauge.drain_clamped(0.75);
        gauge.drain_clamped(0.75);
        assert_eq!(gauge.current(), 0.0);
    }
}
