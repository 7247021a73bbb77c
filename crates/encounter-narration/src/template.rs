//! Narration template sources.
//!
//! Defines [`NarrationTemplate`] and the built-in set every
//! [`NarrationManager`](crate::NarrationManager) starts with. Template names
//! double as lookup keys: `turn`, `action`, `gauge`, and one
//! `outcome/<outcome>` entry per terminal outcome.

use serde::{Deserialize, Serialize};

/// A named Jinja2 template source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationTemplate {
    /// Lookup name (e.g., `outcome/player_defeated`).
    pub name: String,

    /// Raw Jinja2 template source.
    pub source: String,
}

impl NarrationTemplate {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Built-in templates as `(name, source)` pairs.
///
/// Context variables: `turn` gets `actor`, `round`; `action` gets `actor`,
/// `action`; `gauge` gets `label`, `value`, `max`; outcome templates get
/// `turn`, `round`.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("turn", "Round {{ round }}: {{ actor }}'s turn."),
    ("action", "{{ actor }} uses {{ action }}."),
    (
        "gauge",
        "{{ label }} is now {{ value|round(2) }} / {{ max|round(2) }}.",
    ),
    (
        "outcome/adversary_defeated",
        "The adversary falls after {{ turn }} turns. Victory by force.",
    ),
    (
        "outcome/adversary_converted",
        "The adversary's aura fades in round {{ round }}. It lowers its guard and joins you.",
    ),
    (
        "outcome/player_defeated",
        "The adversary stands over you in round {{ round }}. Defeat.",
    ),
];
