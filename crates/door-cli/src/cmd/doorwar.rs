use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use door_bridge::TaskSpec;
use door_core::config::DoorConfig;
use door_core::flow::{DoorWarEntry, FileFlowStore, FlowStore};
use door_core::hotlist;
use door_core::types::Domain;
use door_core::{markdown, vault};

pub fn run(
    config: &DoorConfig,
    choice: Option<&str>,
    reasoning: Option<&str>,
    domain: &str,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = FileFlowStore::new(config.flow_path()?);
    let (mut flow, _) = store.load();

    let now = Utc::now();
    let evals = hotlist::evaluate_all(&flow.hotlist, now);
    let idx = hotlist::select_door(&flow.hotlist, &evals, choice)?;
    let item = flow.hotlist[idx].clone();
    let eval = evals[idx].clone();

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
            Domain::normalize(domain).tag().to_string(),
        ],
        depends: Some(item.task_uuid.clone()),
        meta: serde_json::json!({
            "hotlist_uuid": item.task_uuid,
            "hotlist_title": item.title,
            "eisenhower_quadrant": eval.quadrant,
            "created_via": "doorflow",
        }),
    };

    let bridge = super::bridge_client(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let created = rt
        .block_on(bridge.create_tasks(&[spec]))
        .context("door task creation failed")?;
    let door_task = created
        .first()
        .context("bridge returned no results")?;

    let reasoning = reasoning
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Q{} - {}", eval.quadrant, eval.reasoning));

    let entry = DoorWarEntry {
        door_task_uuid: door_task.task_uuid.clone(),
        door_task_id: door_task.task_id,
        hotlist_uuid: item.task_uuid.clone(),
        selected_title: item.title.clone(),
        domain: domain.to_string(),
        reasoning,
        created_at: now,
    };
    flow.doorwars.push(entry.clone());

    let md = markdown::render_doorwar(&flow.hotlist, &entry);
    let title = format!("Door_War_{}", now.format("%Y-%m-%d"));
    let path = vault::write_markdown(
        &config.vault_dir()?,
        vault::ExportKind::Doorwar,
        &title,
        &md,
    )
    .context("failed to write markdown")?;
    store.save(&mut flow).context("failed to save flow")?;

    if json {
        print_json(&serde_json::json!({ "doorwar": entry, "path": path }))?;
    } else {
        println!("Domino Door: {}", entry.selected_title);
        println!("Reason:      {}", entry.reasoning);
        println!("Exported:    {}", path.display());
    }
    Ok(())
}
