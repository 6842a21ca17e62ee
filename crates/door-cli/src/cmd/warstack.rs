use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use door_bridge::NewTask;
use door_core::config::DoorConfig;
use door_core::flow::{FileFlowStore, FlowStore};
use door_core::vault;
use door_core::warstack::{self, AnswerArgs, AnswerOutcome, HitLink, StartArgs, StartOutcome};

#[derive(Subcommand)]
pub enum WarstackSubcommand {
    /// Start a new warstack, or resume one by id
    Start {
        /// Existing warstack (guid, short id, or prefix)
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value = "War Stack")]
        title: String,
        #[arg(long, default_value = "")]
        door: String,
        #[arg(long, default_value = "cli")]
        source: String,
        /// Bind the warstack to a chat session key
        #[arg(long)]
        chat: Option<String>,
    },
    /// Answer the current step
    Answer {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        chat: Option<String>,
        #[arg(required = true)]
        answer: Vec<String>,
    },
    /// Show a warstack entry
    Show {
        /// guid, short id, or prefix
        id: String,
    },
}

pub fn run(config: &DoorConfig, subcmd: WarstackSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        WarstackSubcommand::Start {
            id,
            title,
            door,
            source,
            chat,
        } => start(config, id, title, door, source, chat, json),
        WarstackSubcommand::Answer { id, chat, answer } => {
            answer_cmd(config, id, chat, answer.join(" "), json)
        }
        WarstackSubcommand::Show { id } => show(config, &id, json),
    }
}

fn start(
    config: &DoorConfig,
    id: Option<String>,
    title: String,
    door: String,
    source: String,
    chat: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = FileFlowStore::new(config.flow_path()?);
    let (mut flow, _) = store.load();
    let outcome = warstack::start(
        &mut flow,
        StartArgs {
            id,
            title,
            door,
            source,
            chat_id: chat,
        },
    )?;
    store.save(&mut flow).context("failed to save flow")?;

    match outcome {
        StartOutcome::Done { guid, short_id } => {
            if json {
                print_json(&serde_json::json!({ "done": true, "guid": guid, "short_id": short_id }))?;
            } else {
                println!("[{short_id}] already complete");
            }
        }
        StartOutcome::Next {
            guid,
            short_id,
            step,
        } => {
            if json {
                print_json(&serde_json::json!({
                    "guid": guid,
                    "short_id": short_id,
                    "step": step,
                    "prompt": step.prompt(),
                }))?;
            } else {
                println!("[{short_id}] {}", step.prompt());
            }
        }
    }
    Ok(())
}

fn answer_cmd(
    config: &DoorConfig,
    id: Option<String>,
    chat: Option<String>,
    answer: String,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = FileFlowStore::new(config.flow_path()?);
    let (mut flow, _) = store.load();
    let outcome = warstack::answer_step(
        &mut flow,
        AnswerArgs {
            id,
            chat_id: chat,
            answer,
        },
    )?;

    match outcome {
        AnswerOutcome::AlreadyDone { guid, short_id } => {
            if json {
                print_json(&serde_json::json!({ "done": true, "guid": guid, "short_id": short_id }))?;
            } else {
                println!("[{short_id}] already complete");
            }
        }
        AnswerOutcome::Next {
            short_id, step, ..
        } => {
            store.save(&mut flow).context("failed to save flow")?;
            if json {
                print_json(&serde_json::json!({
                    "done": false,
                    "short_id": short_id,
                    "step": step,
                    "prompt": step.prompt(),
                }))?;
            } else {
                println!("[{short_id}] {}", step.prompt());
            }
        }
        AnswerOutcome::Completed { guid, short_id } => {
            let idx = flow
                .find_warstack_index(&guid)
                .context("completed warstack missing from flow")?;
            vault::export_warstack_files(&mut flow.warstacks[idx], &config.vault_dir()?)?;

            if config.hits_ticktick {
                push_hits(config, &mut flow, idx)?;
            }

            store.save(&mut flow).context("failed to save flow")?;

            let entry = &flow.warstacks[idx];
            if json {
                print_json(&serde_json::json!({
                    "done": true,
                    "guid": guid,
                    "short_id": short_id,
                    "hits": entry.hits,
                    "files": entry.files,
                }))?;
            } else {
                println!("[{short_id}] complete - {} hits generated", entry.hits.len());
                for path in entry.files.values() {
                    println!("  {}", path.display());
                }
            }
        }
    }
    Ok(())
}

/// Best-effort TickTick push; failures are logged and dropped.
fn push_hits(
    config: &DoorConfig,
    flow: &mut door_core::flow::Flow,
    idx: usize,
) -> anyhow::Result<()> {
    let token = match &config.ticktick_token {
        Some(token) => token.clone(),
        None => {
            tracing::warn!("skipping ticktick hit push: no token configured");
            return Ok(());
        }
    };
    let client = match config.ticktick_base_url.as_deref() {
        Some(base) => door_bridge::TickTickClient::with_base_url(
            base,
            token,
            config.ticktick_project_id.clone(),
        )?,
        None => door_bridge::TickTickClient::new(token, config.ticktick_project_id.clone())?,
    };

    let title = flow.warstacks[idx].title.clone();
    let hits = flow.warstacks[idx].hits.clone();
    let rt = tokio::runtime::Runtime::new()?;
    let mut links = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        let task = NewTask {
            title: format!("Hit {}: {}", i + 1, hit.fact),
            content: format!(
                "Obstacle: {}\nStrike: {}\nDoor: {}",
                hit.obstacle, hit.strike, title
            ),
            tags: config.hit_tags.clone(),
            project_id: None,
        };
        match rt.block_on(client.create_task(task)) {
            Ok(created) => links.push(HitLink {
                hit_id: hit.id.clone(),
                ticktick_id: created.id,
            }),
            Err(err) => tracing::warn!(hit = %hit.id, %err, "ticktick hit push failed"),
        }
    }
    flow.warstacks[idx].ticktick.hits = links;
    Ok(())
}

fn show(config: &DoorConfig, id: &str, json: bool) -> anyhow::Result<()> {
    let store = FileFlowStore::new(config.flow_path()?);
    let (flow, _) = store.load();
    let entry = flow
        .find_warstack(id)
        .with_context(|| format!("warstack '{id}' not found"))?;

    if json {
        print_json(entry)?;
        return Ok(());
    }

    println!("Warstack: {} [{}]", entry.title, entry.short_id);
    println!("Status:   {}", entry.status);
    if let Some(step) = entry.current_step {
        println!("Step:     {}", step);
    }
    if let Some(domain) = entry.domain {
        println!("Domain:   {}", domain);
    }
    for (step, answer) in &entry.responses {
        println!("  {step}: {answer}");
    }
    if !entry.hits.is_empty() {
        println!("Hits:");
        for hit in &entry.hits {
            println!("  [{}] {} / {}", hit.id, hit.fact, hit.strike);
        }
    }
    Ok(())
}
