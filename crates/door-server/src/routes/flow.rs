use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use door_core::flow::{FileFlowStore, FlowStore};

/// GET /api/door/flow — the full flow document.
pub async fn get_flow(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let flow_path = app.config.flow_path()?;
    let result = tokio::task::spawn_blocking(move || {
        let store = FileFlowStore::new(flow_path);
        let (flow, _) = store.load();
        Ok::<_, door_core::DoorError>(serde_json::json!({ "ok": true, "flow": flow }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
