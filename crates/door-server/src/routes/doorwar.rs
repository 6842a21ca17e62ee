use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::error::AppError;
use crate::state::AppState;
use door_bridge::{BridgeError, TaskSpec};
use door_core::flow::{DoorWarEntry, FileFlowStore, FlowStore};
use door_core::hotlist::{self, Evaluation, HotlistItem};
use door_core::types::Domain;
use door_core::{markdown, vault};

#[derive(serde::Deserialize)]
pub struct CreateDoorwarBody {
    #[serde(default)]
    pub choice: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

fn evaluated_json(item: &HotlistItem, eval: &Evaluation) -> serde_json::Value {
    let mut value = serde_json::to_value(item).unwrap_or_default();
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "evaluation".to_string(),
            serde_json::to_value(eval).unwrap_or_default(),
        );
    }
    value
}

/// POST /api/door/doorwar — score the hotlist, pick a Domino Door, and
/// create the dependent door task.
pub async fn create_doorwar(
    State(app): State<AppState>,
    Json(body): Json<CreateDoorwarBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let flow_path = app.config.flow_path()?;
    let vault_dir = app.config.vault_dir()?;

    let load_path = flow_path.clone();
    let (mut flow, _) = tokio::task::spawn_blocking(move || FileFlowStore::new(load_path).load())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    let now = Utc::now();
    let evals = hotlist::evaluate_all(&flow.hotlist, now);
    let idx = hotlist::select_door(&flow.hotlist, &evals, body.choice.as_deref())?;
    let item = flow.hotlist[idx].clone();
    let eval = evals[idx].clone();

    let domain = body
        .domain
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Business")
        .to_string();

    let project = {
        let trimmed = item.title.trim();
        if trimmed.is_empty() { "Door" } else { trimmed }.to_string()
    };
    let spec = TaskSpec {
        description: format!("Door: {}", item.title),
        project,
        tags: vec![
            "door".to_string(),
            "plan".to_string(),
            Domain::normalize(&domain).tag().to_string(),
        ],
        depends: Some(item.task_uuid.clone()),
        meta: serde_json::json!({
            "hotlist_uuid": item.task_uuid,
            "hotlist_title": item.title,
            "eisenhower_quadrant": eval.quadrant,
            "created_via": "doorflow",
        }),
    };

    let created = app.bridge()?.create_tasks(&[spec]).await?;
    let door_task = created
        .first()
        .ok_or_else(|| BridgeError::InvalidResponse("bridge returned no results".to_string()))?;

    let reasoning = body
        .reasoning
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Q{} - {}", eval.quadrant, eval.reasoning));

    let entry = DoorWarEntry {
        door_task_uuid: door_task.task_uuid.clone(),
        door_task_id: door_task.task_id,
        hotlist_uuid: item.task_uuid.clone(),
        selected_title: item.title.clone(),
        domain,
        reasoning,
        created_at: now,
    };
    flow.doorwars.push(entry.clone());

    let evaluated: Vec<serde_json::Value> = flow
        .hotlist
        .iter()
        .zip(evals.iter())
        .map(|(item, eval)| evaluated_json(item, eval))
        .collect();

    let md = markdown::render_doorwar(&flow.hotlist, &entry);
    let title = format!("Door_War_{}", now.format("%Y-%m-%d"));
    let path = tokio::task::spawn_blocking(move || {
        let path = vault::write_markdown(&vault_dir, vault::ExportKind::Doorwar, &title, &md)?;
        let mut store = FileFlowStore::new(flow_path);
        store.save(&mut flow)?;
        Ok::<_, door_core::DoorError>(path)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "ok": true,
        "doorwar": entry,
        "evaluated": evaluated,
        "selected": evaluated_json(&item, &eval),
        "path": path,
    })))
}
