use crate::output::{print_json, print_table};
use anyhow::Context;
use door_core::config::DoorConfig;
use door_core::flow::{FileFlowStore, FlowStore, LoadOutcome};

pub fn run(config: &DoorConfig, json: bool) -> anyhow::Result<()> {
    let path = config.flow_path().context("failed to resolve flow path")?;
    let store = FileFlowStore::new(&path);
    let (flow, outcome) = store.load();

    if json {
        print_json(&flow)?;
        return Ok(());
    }

    if let LoadOutcome::Repaired { fields } = &outcome {
        eprintln!("warning: repaired malformed fields: {}", fields.join(", "));
    }

    println!("Flow: {}", path.display());
    println!("Updated: {}", flow.updated_at.format("%Y-%m-%d %H:%M"));
    println!();
    let rows = vec![
        vec!["hotlist".to_string(), flow.hotlist.len().to_string()],
        vec!["doorwars".to_string(), flow.doorwars.len().to_string()],
        vec!["warstacks".to_string(), flow.warstacks.len().to_string()],
        vec!["profits".to_string(), flow.profits.len().to_string()],
        vec![
            "active_chats".to_string(),
            flow.active_chats.len().to_string(),
        ],
    ];
    print_table(&["COLLECTION", "COUNT"], rows);
    Ok(())
}
