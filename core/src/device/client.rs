use std::time::Duration;

use super::wire::{ApiResponse, StrengthConfig, StrengthPatch};
use super::{DeviceError, StrengthPort};

/// Hub responses with any other status are logical failures.
const STATUS_OK: i32 = 1;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for one (hub, client id) pair.
#[derive(Debug, Clone)]
pub struct StrengthClient {
    http: reqwest::Client,
    endpoint: String,
}

impl StrengthClient {
    pub fn new(host: &str, client_id: &str) -> Self {
        let endpoint = format!(
            "{}/api/game/{}/strength_config",
            host.trim_end_matches('/'),
            client_id
        );
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    fn check(resp: ApiResponse) -> Result<ApiResponse, DeviceError> {
        if resp.status != STATUS_OK {
            return Err(DeviceError::Rejected {
                code: resp.code,
                message: resp.message,
            });
        }
        Ok(resp)
    }
}

impl StrengthPort for StrengthClient {
    async fn read_config(&self) -> Result<StrengthConfig, DeviceError> {
        let resp: ApiResponse = self
            .http
            .get(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        Self::check(resp)?
            .strength_config
            .ok_or(DeviceError::MissingConfig)
    }

    async fn apply(&self, patch: StrengthPatch) -> Result<(), DeviceError> {
        let resp: ApiResponse = self
            .http
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&patch)
            .send()
            .await?
            .json()
            .await?;

        let resp = Self::check(resp)?;
        tracing::debug!(clients = resp.success_client_ids.len(), "strength patch accepted");
        Ok(())
    }
}
