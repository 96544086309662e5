//! Wire types for the hub's `strength_config` endpoint.

use serde::{Deserialize, Serialize};

/// One mutation on a numeric channel, externally tagged:
/// `{"add": 5}`, `{"sub": 3}` or `{"set": 20}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOp {
    Add(i32),
    Sub(i32),
    Set(i32),
}

/// Body of `POST /api/game/{clientId}/strength_config`. Channels left
/// `None` are omitted and untouched on the hub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrengthPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<ChannelOp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_strength: Option<ChannelOp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_interval: Option<ChannelOp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_interval: Option<ChannelOp>,
}

impl StrengthPatch {
    pub fn strength_add(v: i32) -> Self {
        Self {
            strength: Some(ChannelOp::Add(v)),
            ..Default::default()
        }
    }

    pub fn strength_sub(v: i32) -> Self {
        Self {
            strength: Some(ChannelOp::Sub(v)),
            ..Default::default()
        }
    }

    pub fn random_add(v: i32) -> Self {
        Self {
            random_strength: Some(ChannelOp::Add(v)),
            ..Default::default()
        }
    }

    pub fn random_sub(v: i32) -> Self {
        Self {
            random_strength: Some(ChannelOp::Sub(v)),
            ..Default::default()
        }
    }
}

/// The hub's current strength configuration for one client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrengthConfig {
    pub strength: i32,
    pub random_strength: i32,
    pub min_interval: i32,
    pub max_interval: i32,
    pub pulse_id: Option<String>,
}

/// Envelope shared by GET and POST responses. `status != 1` is a logical
/// failure even though the HTTP call itself succeeded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: i32,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub success_client_ids: Vec<String>,
    pub strength_config: Option<StrengthConfig>,
}
