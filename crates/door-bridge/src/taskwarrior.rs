//! Client for the Taskwarrior bridge service.
//!
//! The bridge wraps the local `task` binary behind HTTP; this client only
//! speaks `POST /bridge/task/execute`, which creates one or more tasks and
//! returns their uuids.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TOKEN_HEADER: &str = "X-Bridge-Token";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TaskSpec {
    pub description: String,
    pub project: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends: Option<String>,
    pub meta: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTask {
    pub task_uuid: String,
    #[serde(default)]
    pub task_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    results: Vec<CreatedTask>,
    #[serde(default)]
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TaskBridgeClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl TaskBridgeClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Create the given tasks in one call. Returns one created-task record
    /// per input, in order.
    pub async fn create_tasks(&self, tasks: &[TaskSpec]) -> Result<Vec<CreatedTask>> {
        let url = format!("{}/bridge/task/execute", self.base_url);
        tracing::debug!(count = tasks.len(), %url, "creating taskwarrior tasks");
        let mut req = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "tasks": tasks }));
        if let Some(token) = &self.token {
            req = req.header(TOKEN_HEADER, token);
        }

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ExecuteResponse = res.json().await?;
        if !parsed.ok {
            return Err(BridgeError::InvalidResponse(
                parsed.error.unwrap_or_else(|| "bridge reported failure".to_string()),
            ));
        }
        Ok(parsed.results)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(description: &str) -> TaskSpec {
        TaskSpec {
            description: description.to_string(),
            project: "HotList".to_string(),
            tags: vec!["potential".to_string(), "business".to_string()],
            depends: None,
            meta: serde_json::json!({ "source": "test" }),
        }
    }

    #[tokio::test]
    async fn create_tasks_parses_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bridge/task/execute")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ok": true, "results": [{"task_uuid": "u-1", "task_id": 42}]}"#,
            )
            .create_async()
            .await;

        let client = TaskBridgeClient::new(server.url(), None, Duration::from_millis(2500)).unwrap();
        let created = client.create_tasks(&[spec("Launch plan")]).await.unwrap();
        mock.assert_async().await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].task_uuid, "u-1");
        assert_eq!(created[0].task_id, Some(42));
    }

    #[tokio::test]
    async fn create_tasks_sends_token_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bridge/task/execute")
            .match_header("x-bridge-token", "s3cret")
            .with_status(200)
            .with_body(r#"{"ok": true, "results": []}"#)
            .create_async()
            .await;

        let client = TaskBridgeClient::new(
            server.url(),
            Some("s3cret".to_string()),
            Duration::from_millis(2500),
        )
        .unwrap();
        client.create_tasks(&[]).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bridge/task/execute")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = TaskBridgeClient::new(server.url(), None, Duration::from_millis(2500)).unwrap();
        let err = client.create_tasks(&[spec("x")]).await.unwrap_err();
        assert!(matches!(err, BridgeError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn ok_false_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bridge/task/execute")
            .with_status(200)
            .with_body(r#"{"ok": false, "error": "task binary missing"}"#)
            .create_async()
            .await;

        let client = TaskBridgeClient::new(server.url(), None, Duration::from_millis(2500)).unwrap();
        let err = client.create_tasks(&[spec("x")]).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidResponse(msg) if msg.contains("task binary")));
    }

    #[test]
    fn depends_omitted_when_absent() {
        let json = serde_json::to_value(spec("x")).unwrap();
        assert!(json.get("depends").is_none());
    }
}
