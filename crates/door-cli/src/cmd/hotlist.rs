use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use door_bridge::TaskSpec;
use door_core::config::DoorConfig;
use door_core::flow::{FileFlowStore, FlowStore};
use door_core::hotlist::{self, HotlistItem};
use door_core::types::Domain;
use door_core::{markdown, vault};

#[derive(Subcommand)]
pub enum HotlistSubcommand {
    /// List hotlist items with their Eisenhower evaluation
    List,
    /// Add items as bridge-backed Taskwarrior tasks
    Add {
        #[arg(required = true)]
        titles: Vec<String>,
        #[arg(long, default_value = "cli")]
        source: String,
        #[arg(long, default_value = "Business")]
        domain: String,
    },
    /// Capture one idea as a markdown note (no bridge)
    Quickadd {
        #[arg(required = true)]
        idea: Vec<String>,
        #[arg(long, default_value = "cli")]
        source: String,
    },
    /// Export the current hotlist as a markdown snapshot
    Export,
}

pub fn run(config: &DoorConfig, subcmd: HotlistSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        HotlistSubcommand::List => list(config, json),
        HotlistSubcommand::Add {
            titles,
            source,
            domain,
        } => add(config, titles, &source, &domain, json),
        HotlistSubcommand::Quickadd { idea, source } => {
            quick_add(config, &idea.join(" "), &source, json)
        }
        HotlistSubcommand::Export => export(config, json),
    }
}

fn list(config: &DoorConfig, json: bool) -> anyhow::Result<()> {
    let store = FileFlowStore::new(config.flow_path()?);
    let (flow, _) = store.load();

    if json {
        print_json(&flow.hotlist)?;
        return Ok(());
    }

    if flow.hotlist.is_empty() {
        println!("Hot list is empty.");
        return Ok(());
    }

    let now = Utc::now();
    let evals = hotlist::evaluate_all(&flow.hotlist, now);
    let rows: Vec<Vec<String>> = flow
        .hotlist
        .iter()
        .zip(evals.iter())
        .map(|(item, eval)| {
            vec![
                item.title.clone(),
                item.domain.clone(),
                format!("Q{}", eval.quadrant),
                eval.importance_score.to_string(),
                eval.urgency_score.to_string(),
            ]
        })
        .collect();
    print_table(&["TITLE", "DOMAIN", "QUADRANT", "IMPORTANCE", "URGENCY"], rows);
    Ok(())
}

fn add(
    config: &DoorConfig,
    titles: Vec<String>,
    source: &str,
    domain: &str,
    json: bool,
) -> anyhow::Result<()> {
    let titles: Vec<String> = titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if titles.is_empty() {
        anyhow::bail!("missing items");
    }

    let domain_tag = Domain::normalize(domain).tag();
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

    let bridge = super::bridge_client(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let created = rt
        .block_on(bridge.create_tasks(&specs))
        .context("taskwarrior creation failed")?;

    let now = Utc::now();
    let entries: Vec<HotlistItem> = titles
        .iter()
        .zip(created.iter())
        .map(|(title, task)| HotlistItem {
            task_uuid: task.task_uuid.clone(),
            task_id: task.task_id,
            title: title.clone(),
            source: source.to_string(),
            domain: domain.to_string(),
            created_at: now,
            tags: vec!["potential".to_string(), domain_tag.to_string()],
            priority: 0,
        })
        .collect();

    let mut store = FileFlowStore::new(config.flow_path()?);
    let (mut flow, _) = store.load();
    flow.hotlist.extend(entries.clone());
    store.save(&mut flow).context("failed to save flow")?;

    if json {
        print_json(&entries)?;
    } else {
        for entry in &entries {
            println!("Added [{}]: {}", entry.task_uuid, entry.title);
        }
    }
    Ok(())
}

fn export(config: &DoorConfig, json: bool) -> anyhow::Result<()> {
    let store = FileFlowStore::new(config.flow_path()?);
    let (flow, _) = store.load();
    if flow.hotlist.is_empty() {
        anyhow::bail!("hot list is empty - add items first");
    }

    let md = markdown::render_hotlist(&flow.hotlist);
    let title = format!("HotList_{}", Utc::now().format("%Y-%m-%d"));
    let path = vault::write_markdown(
        &config.vault_dir()?,
        vault::ExportKind::Hotlist,
        &title,
        &md,
    )
    .context("failed to write markdown")?;

    if json {
        print_json(&serde_json::json!({ "path": path, "count": flow.hotlist.len() }))?;
    } else {
        println!("Exported {} items: {}", flow.hotlist.len(), path.display());
    }
    Ok(())
}

fn quick_add(config: &DoorConfig, idea: &str, source: &str, json: bool) -> anyhow::Result<()> {
    let idea = idea.trim();
    if idea.is_empty() {
        anyhow::bail!("missing idea");
    }

    let now = Utc::now();
    let md = markdown::render_quick_add(idea, source, now);
    let title = format!("HotList_{}", now.format("%Y-%m-%dT%H-%M-%S"));
    let path = vault::write_markdown(
        &config.vault_dir()?,
        vault::ExportKind::Hotlist,
        &title,
        &md,
    )
    .context("failed to write markdown")?;

    if json {
        print_json(&serde_json::json!({ "path": path }))?;
    } else {
        println!("Captured: {}", path.display());
    }
    Ok(())
}
