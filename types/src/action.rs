//! Action bindings: what to do to the strength hub when a trigger fires.

use serde::{Deserialize, Serialize};

/// Fire window length when a binding omits `time`.
pub const DEFAULT_FIRE_SECS: f32 = 5.0;

fn default_fire_secs() -> f32 {
    DEFAULT_FIRE_SECS
}

/// Parameters for a timed "fire" overlay: a temporary strength boost that
/// is reversed automatically once the window expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireAction {
    /// Requested boost on the base strength channel.
    pub strength: i32,

    /// Window length in seconds. Re-firing before expiry extends the
    /// window by this amount rather than resetting it.
    #[serde(default = "default_fire_secs")]
    pub time: f32,
}

/// One configured response to a trigger.
///
/// At most one field is meant to be populated. When several are, the first
/// populated field in declaration order wins and the rest are ignored —
/// one action per trigger, by policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Add to the base strength channel.
    pub add_base: Option<i32>,
    /// Subtract from the base strength channel.
    pub sub_base: Option<i32>,
    /// Add to the random strength channel.
    pub add_random: Option<i32>,
    /// Subtract from the random strength channel.
    pub sub_random: Option<i32>,
    /// Start or extend a timed fire overlay.
    pub fire: Option<FireAction>,
}

/// The single effect an [`ActionConfig`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionEffect<'a> {
    AddBase(i32),
    SubBase(i32),
    AddRandom(i32),
    SubRandom(i32),
    Fire(&'a FireAction),
}

impl ActionConfig {
    /// Resolve the field-priority order: add_base → sub_base → add_random
    /// → sub_random → fire. Returns `None` when nothing is configured.
    pub fn effect(&self) -> Option<ActionEffect<'_>> {
        if let Some(v) = self.add_base {
            return Some(ActionEffect::AddBase(v));
        }
        if let Some(v) = self.sub_base {
            return Some(ActionEffect::SubBase(v));
        }
        if let Some(v) = self.add_random {
            return Some(ActionEffect::AddRandom(v));
        }
        if let Some(v) = self.sub_random {
            return Some(ActionEffect::SubRandom(v));
        }
        self.fire.as_ref().map(ActionEffect::Fire)
    }

    /// True when no field is populated (the trigger is a no-op).
    pub fn is_empty(&self) -> bool {
        self.effect().is_none()
    }
}
