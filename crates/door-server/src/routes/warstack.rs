use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use door_bridge::NewTask;
use door_core::flow::{FileFlowStore, FlowStore};
use door_core::vault;
use door_core::warstack::{self, AnswerArgs, AnswerOutcome, HitLink, StartArgs, StartOutcome};
use door_core::DoorError;

#[derive(serde::Deserialize)]
pub struct StartBody {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub door: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// POST /api/door/warstack/start — start or resume a warstack.
pub async fn start_warstack(
    State(app): State<AppState>,
    Json(body): Json<StartBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let flow_path = app.config.flow_path()?;
    let result = tokio::task::spawn_blocking(move || {
        let mut store = FileFlowStore::new(flow_path);
        let (mut flow, _) = store.load();
        let outcome = warstack::start(
            &mut flow,
            StartArgs {
                id: body.id,
                title: body.title.unwrap_or_default(),
                door: body.door.unwrap_or_default(),
                source: body.source.unwrap_or_else(|| "telegram".to_string()),
                chat_id: body.chat_id,
            },
        )?;
        store.save(&mut flow)?;

        Ok::<_, DoorError>(match outcome {
            StartOutcome::Done { guid, short_id } => serde_json::json!({
                "ok": true,
                "done": true,
                "guid": guid,
                "short_id": short_id,
            }),
            StartOutcome::Next {
                guid,
                short_id,
                step,
            } => serde_json::json!({
                "ok": true,
                "guid": guid,
                "short_id": short_id,
                "step": step,
                "prompt": step.prompt(),
            }),
        })
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct AnswerBody {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub answer: String,
}

/// POST /api/door/warstack/answer — store one answer and advance a step.
///
/// The final answer completes the stack: hits are generated, the two
/// markdown artifacts are written, hits are optionally pushed to TickTick
/// (best-effort), and the flow is persisted.
pub async fn answer_warstack(
    State(app): State<AppState>,
    Json(body): Json<AnswerBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let flow_path = app.config.flow_path()?;
    let vault_dir = app.config.vault_dir()?;

    let load_path = flow_path.clone();
    let (mut flow, _) = tokio::task::spawn_blocking(move || FileFlowStore::new(load_path).load())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    let outcome = warstack::answer_step(
        &mut flow,
        AnswerArgs {
            id: body.id,
            chat_id: body.chat_id,
            answer: body.answer,
        },
    )?;

    match outcome {
        AnswerOutcome::AlreadyDone { guid, .. } => {
            // Nothing changed; skip the save.
            Ok(Json(serde_json::json!({
                "ok": true,
                "done": true,
                "guid": guid,
            })))
        }
        AnswerOutcome::Next { guid, step, .. } => {
            tokio::task::spawn_blocking(move || {
                let mut store = FileFlowStore::new(flow_path);
                store.save(&mut flow)
            })
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

            Ok(Json(serde_json::json!({
                "ok": true,
                "done": false,
                "guid": guid,
                "step": step,
                "prompt": step.prompt(),
            })))
        }
        AnswerOutcome::Completed { guid, short_id } => {
            let export_guid = guid.clone();
            let mut flow = tokio::task::spawn_blocking(move || {
                let idx = flow
                    .find_warstack_index(&export_guid)
                    .ok_or_else(|| DoorError::WarstackNotFound(export_guid.clone()))?;
                vault::export_warstack_files(&mut flow.warstacks[idx], &vault_dir)?;
                Ok::<_, DoorError>(flow)
            })
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

            if app.config.hits_ticktick {
                push_hits(&app, &mut flow, &guid).await;
            }

            let (hits, files) = {
                let idx = flow
                    .find_warstack_index(&guid)
                    .ok_or_else(|| DoorError::WarstackNotFound(guid.clone()))?;
                let entry = &flow.warstacks[idx];
                (
                    serde_json::to_value(&entry.hits)?,
                    serde_json::to_value(&entry.files)?,
                )
            };

            tokio::task::spawn_blocking(move || {
                let mut store = FileFlowStore::new(flow_path);
                store.save(&mut flow)
            })
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

            Ok(Json(serde_json::json!({
                "ok": true,
                "done": true,
                "guid": guid,
                "short_id": short_id,
                "hits": hits,
                "files": files,
            })))
        }
    }
}

/// Best-effort push of each generated hit to TickTick. At most once, no
/// retries; failures are logged and dropped without failing the completion.
async fn push_hits(app: &AppState, flow: &mut door_core::flow::Flow, guid: &str) {
    let client = match app.ticktick() {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(%err, "skipping ticktick hit push");
            return;
        }
    };
    let Some(idx) = flow.find_warstack_index(guid) else {
        return;
    };
    let title = flow.warstacks[idx].title.clone();
    let hits = flow.warstacks[idx].hits.clone();

    let mut links = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        let task = NewTask {
            title: format!("Hit {}: {}", i + 1, hit.fact),
            content: format!(
                "Obstacle: {}\nStrike: {}\nDoor: {}",
                hit.obstacle, hit.strike, title
            ),
            tags: app.config.hit_tags.clone(),
            project_id: None,
        };
        match client.create_task(task).await {
            Ok(created) => links.push(HitLink {
                hit_id: hit.id.clone(),
                ticktick_id: created.id,
            }),
            Err(err) => tracing::warn!(hit = %hit.id, %err, "ticktick hit push failed"),
        }
    }
    flow.warstacks[idx].ticktick.hits = links;
}

/// GET /api/door/warstack/:id — raw entry lookup by guid, short id, or
/// guid prefix.
pub async fn get_warstack(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let flow_path = app.config.flow_path()?;
    let result = tokio::task::spawn_blocking(move || {
        let store = FileFlowStore::new(flow_path);
        let (flow, _) = store.load();
        let entry = flow
            .find_warstack(&id)
            .ok_or_else(|| DoorError::WarstackNotFound(id.clone()))?;
        Ok::<_, DoorError>(serde_json::json!({ "ok": true, "warstack": entry }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
