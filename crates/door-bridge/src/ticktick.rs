//! Minimal TickTick open-API client: task creation only.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const TICKTICK_API_BASE: &str = "https://api.ticktick.com";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTicktickTask {
    /// TickTick is inconsistent about the id field name across responses.
    #[serde(alias = "taskId", alias = "task_id")]
    pub id: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TickTickClient {
    base_url: String,
    token: String,
    project_id: Option<String>,
    client: reqwest::Client,
}

impl TickTickClient {
    pub fn new(token: impl Into<String>, project_id: Option<String>) -> Result<Self> {
        Self::with_base_url(TICKTICK_API_BASE, token, project_id)
    }

    /// Base URL injection point for tests.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        project_id: Option<String>,
    ) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(BridgeError::TokenMissing);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            project_id,
            client,
        })
    }

    pub async fn create_task(&self, mut task: NewTask) -> Result<CreatedTicktickTask> {
        if task.project_id.is_none() {
            task.project_id = self.project_id.clone();
        }

        let url = format!("{}/open/v1/task", self.base_url);
        tracing::debug!(title = %task.title, "creating ticktick task");
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&task)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res.json().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
