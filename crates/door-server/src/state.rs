use door_bridge::{BridgeError, TaskBridgeClient, TickTickClient};
use door_core::config::DoorConfig;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DoorConfig>,
}

impl AppState {
    pub fn new(config: DoorConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Taskwarrior bridge client, or NotConfigured when no base URL is set.
    pub fn bridge(&self) -> Result<TaskBridgeClient, BridgeError> {
        let url = self
            .config
            .bridge_url
            .as_deref()
            .ok_or(BridgeError::NotConfigured)?;
        TaskBridgeClient::new(
            url,
            self.config.bridge_token.clone(),
            Duration::from_millis(self.config.bridge_timeout_ms),
        )
    }

    /// TickTick client, or TokenMissing when no token is configured.
    pub fn ticktick(&self) -> Result<TickTickClient, BridgeError> {
        let token = self
            .config
            .ticktick_token
            .clone()
            .ok_or(BridgeError::TokenMissing)?;
        let project = self.config.ticktick_project_id.clone();
        match self.config.ticktick_base_url.as_deref() {
            Some(base) => TickTickClient::with_base_url(base, token, project),
            None => TickTickClient::new(token, project),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_requires_a_base_url() {
        let state = AppState::new(DoorConfig::default());
        assert!(matches!(state.bridge(), Err(BridgeError::NotConfigured)));

        let state = AppState::new(DoorConfig {
            bridge_url: Some("http://localhost:9000".into()),
            ..Default::default()
        });
        assert!(state.bridge().is_ok());
    }

    #[test]
    fn ticktick_requires_a_token() {
        let state = AppState::new(DoorConfig::default());
        assert!(matches!(state.ticktick(), Err(BridgeError::TokenMissing)));
    }
}
