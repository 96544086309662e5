//! Per-player binding records: the full set of trigger → action mappings
//! governing one participant for one match.

use serde::{Deserialize, Serialize};

use crate::action::ActionConfig;

/// All configured responses for one participant, keyed by trigger.
///
/// A record matches a participant when its `id` equals the participant's
/// account id OR its `name` equals the participant's display name; either
/// alone is sufficient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBindings {
    /// Numeric account id, if known.
    pub id: Option<u64>,
    /// Display name, if known.
    pub name: Option<String>,

    /// A different seat called (chi/pon/kan) off this participant's tile.
    pub call_received: Option<ActionConfig>,
    /// This participant dealt into another seat's win.
    pub point_into: Option<ActionConfig>,
    /// Another seat won by self-draw.
    pub others_tsumo: Option<ActionConfig>,
    /// Another seat declared riichi.
    pub others_riichi: Option<ActionConfig>,
    /// Exhaustive draw with this participant not ready.
    pub draw_not_ready: Option<ActionConfig>,
    /// Exhaustive draw with this participant ready (tenpai).
    pub draw_ready: Option<ActionConfig>,
    /// Points fell below the shot-down threshold at match end.
    pub shot_down: Option<ActionConfig>,

    /// Placement actions for 3-player matches, indexed by rank - 1.
    pub rank_three: Vec<ActionConfig>,
    /// Placement actions for 4-player matches, indexed by rank - 1.
    pub rank_four: Vec<ActionConfig>,
}

impl PlayerBindings {
    /// Whether this record governs the given participant.
    pub fn matches(&self, account_id: u64, nickname: &str) -> bool {
        self.id == Some(account_id) || self.name.as_deref() == Some(nickname)
    }
}
