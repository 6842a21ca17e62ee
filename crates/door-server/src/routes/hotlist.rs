use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::error::AppError;
use crate::state::AppState;
use door_bridge::TaskSpec;
use door_core::flow::{FileFlowStore, FlowStore};
use door_core::hotlist::HotlistItem;
use door_core::types::Domain;
use door_core::{markdown, vault};

/// GET /api/door/hotlist — current hotlist items.
pub async fn list_hotlist(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let flow_path = app.config.flow_path()?;
    let result = tokio::task::spawn_blocking(move || {
        let store = FileFlowStore::new(flow_path);
        let (flow, _) = store.load();
        Ok::<_, door_core::DoorError>(serde_json::json!({ "ok": true, "items": flow.hotlist }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateHotlistBody {
    /// Array of titles (strings or objects with a `title` field), or a
    /// single string treated like `text`.
    #[serde(default)]
    pub items: Option<serde_json::Value>,
    /// Newline-separated titles.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_titles(body: &CreateHotlistBody) -> Vec<String> {
    if let Some(items) = &body.items {
        if let Some(arr) = items.as_array() {
            return arr
                .iter()
                .filter_map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .or_else(|| {
                            item.get("title")
                                .and_then(|t| t.as_str())
                                .map(str::to_string)
                        })
                })
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(raw) = items.as_str() {
            return split_lines(raw);
        }
    }
    body.text.as_deref().map(split_lines).unwrap_or_default()
}

/// POST /api/door/hotlist — create bridge-backed hotlist entries.
pub async fn create_hotlist(
    State(app): State<AppState>,
    Json(body): Json<CreateHotlistBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let titles = parse_titles(&body);
    if titles.is_empty() {
        return Err(AppError::bad_request("items"));
    }

    let source = body
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("manual")
        .to_string();
    let domain = body
        .domain
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Business")
        .to_string();
    let domain_tag = Domain::normalize(&domain).tag();

    let specs: Vec<TaskSpec> = titles
        .iter()
        .map(|title| TaskSpec {
            description: title.clone(),
            project: "HotList".to_string(),
            tags: vec!["potential".to_string(), domain_tag.to_string()],
            depends: None,
            meta: serde_json::json!({
                "source": source,
                "domain": domain,
                "created_via": "doorflow",
            }),
        })
        .collect();

    let created = app.bridge()?.create_tasks(&specs).await?;

    let now = Utc::now();
    let entries: Vec<HotlistItem> = titles
        .iter()
        .zip(created.iter())
        .map(|(title, task)| HotlistItem {
            task_uuid: task.task_uuid.clone(),
            task_id: task.task_id,
            title: title.clone(),
            source: source.clone(),
            domain: domain.clone(),
            created_at: now,
            tags: vec!["potential".to_string(), domain_tag.to_string()],
            priority: 0,
        })
        .collect();

    let flow_path = app.config.flow_path()?;
    let stored = entries.clone();
    tokio::task::spawn_blocking(move || {
        let mut store = FileFlowStore::new(flow_path);
        let (mut flow, _) = store.load();
        flow.hotlist.extend(stored);
        store.save(&mut flow)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "ok": true, "items": entries })))
}

#[derive(serde::Deserialize)]
pub struct QuickAddBody {
    pub idea: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// POST /api/door/quickadd — capture one idea as a markdown file, no bridge.
pub async fn quick_add(
    State(app): State<AppState>,
    Json(body): Json<QuickAddBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let idea = body.idea.trim().to_string();
    if idea.is_empty() {
        return Err(AppError::bad_request("idea"));
    }
    let source = body
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("web")
        .to_string();

    let vault_dir = app.config.vault_dir()?;
    let result = tokio::task::spawn_blocking(move || {
        let now = Utc::now();
        let md = markdown::render_quick_add(&idea, &source, now);
        let title = format!("HotList_{}", now.format("%Y-%m-%dT%H-%M-%S"));
        let path = vault::write_markdown(&vault_dir, vault::ExportKind::Hotlist, &title, &md)?;
        Ok::<_, door_core::DoorError>(serde_json::json!({ "ok": true, "path": path }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
