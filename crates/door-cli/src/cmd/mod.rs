pub mod doorwar;
pub mod flow;
pub mod hotlist;
pub mod serve;
pub mod warstack;

use anyhow::Context;
use door_bridge::TaskBridgeClient;
use door_core::config::DoorConfig;
use std::time::Duration;

/// Bridge client from config, or a readable error when unconfigured.
pub fn bridge_client(config: &DoorConfig) -> anyhow::Result<TaskBridgeClient> {
    let url = config
        .bridge_url
        .as_deref()
        .context("bridge not configured: set DOOR_BRIDGE_URL")?;
    Ok(TaskBridgeClient::new(
        url,
        config.bridge_token.clone(),
        Duration::from_millis(config.bridge_timeout_ms),
    )?)
}
