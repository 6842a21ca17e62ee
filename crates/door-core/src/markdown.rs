//! One-directional markdown rendering for door artifacts. Pure functions,
//! no parsing, no filesystem access.

use crate::flow::DoorWarEntry;
use crate::hotlist::HotlistItem;
use crate::types::StepKey;
use crate::warstack::WarstackEntry;
use chrono::{DateTime, Utc};

fn response<'a>(entry: &'a WarstackEntry, step: StepKey) -> &'a str {
    entry.responses.get(&step).map(String::as_str).unwrap_or("-")
}

/// The warstack narrative document written on completion.
pub fn render_warstack(entry: &WarstackEntry) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# War Stack - {}", entry.title));
    lines.push(String::new());
    lines.push(format!("**Domain:** {}", response(entry, StepKey::Domain)));
    lines.push(format!(
        "**Domino Door:** {}",
        response(entry, StepKey::DominoDoor)
    ));
    lines.push(format!("**Trigger:** {}", response(entry, StepKey::Trigger)));
    lines.push(String::new());
    for (label, step) in [
        ("Narrative", StepKey::Narrative),
        ("Validation", StepKey::Validation),
        ("Impact", StepKey::Impact),
        ("Consequences", StepKey::Consequences),
    ] {
        lines.push(format!("**{label}:**"));
        lines.push(response(entry, step).to_string());
        lines.push(String::new());
    }
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Insights".to_string());
    lines.push(response(entry, StepKey::Insights).to_string());
    lines.push(String::new());
    lines.push("## Lessons Learned".to_string());
    lines.push(response(entry, StepKey::Lessons).to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// The hit list document written on completion.
pub fn render_hits(entry: &WarstackEntry) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# Weekly Jar - Hits for {}", entry.title));
    lines.push(String::new());
    for (idx, hit) in entry.hits.iter().enumerate() {
        lines.push(format!("## Hit {}", idx + 1));
        lines.push(format!("- **Fact:** {}", hit.fact));
        lines.push(format!("- **Obstacle:** {}", hit.obstacle));
        lines.push(format!("- **Strike:** {}", hit.strike));
        lines.push(format!("- **Responsibility:** {}", hit.responsibility));
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Numbered hotlist snapshot.
pub fn render_hotlist(items: &[HotlistItem]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("# Hot List - Guardian of Ideas".to_string());
    lines.push(String::new());
    for (idx, item) in items.iter().enumerate() {
        lines.push(format!("{}. {}", idx + 1, item.title));
    }
    lines.push(String::new());
    lines.push("> Pick your Domino Door from this list in the Door War.".to_string());
    lines.join("\n")
}

/// Door-war decision record: all candidates as open checkboxes, plus the
/// chosen door and its reasoning.
pub fn render_doorwar(candidates: &[HotlistItem], entry: &DoorWarEntry) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("# Door War - Quadrant-2 Decision".to_string());
    lines.push(String::new());
    lines.push("## Candidates (from the Hot List)".to_string());
    lines.push(String::new());
    for item in candidates {
        lines.push(format!("- [ ] {}", item.title));
    }
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Chosen Domino Door".to_string());
    lines.push(String::new());
    lines.push(format!("**Door:** {}", entry.selected_title));
    lines.push(String::new());
    lines.push(format!("**Reason:** {}", entry.reasoning));
    lines.push(String::new());
    lines.push("> Next step: build the War Stack for this door.".to_string());
    lines.join("\n")
}

/// A single quick-added idea, captured without the bridge.
pub fn render_quick_add(idea: &str, source: &str, at: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("# Hot List - Quick Add".to_string());
    lines.push(String::new());
    lines.push(format!("- [ ] {idea}"));
    lines.push(String::new());
    lines.push(format!("**Source:** {source}"));
    lines.push(format!("**Date:** {}", at.format("%Y-%m-%d %H:%M")));
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hits;
    use crate::types::Domain;

    fn completed_entry() -> WarstackEntry {
        let mut entry = WarstackEntry::new("Launch", "Ship v1", "test");
        entry.responses.insert(StepKey::Domain, "Business".into());
        entry
            .responses
            .insert(StepKey::DominoDoor, "Ship v1".into());
        entry.responses.insert(StepKey::Trigger, "a call".into());
        entry
            .responses
            .insert(StepKey::Insights, "less is more".into());
        entry.hits = hits::generate(Domain::Business);
        entry
    }

    #[test]
    fn warstack_renders_headings_and_answers() {
        let md = render_warstack(&completed_entry());
        assert!(md.starts_with("# War Stack - Launch"));
        assert!(md.contains("**Domain:** Business"));
        assert!(md.contains("**Domino Door:** Ship v1"));
        assert!(md.contains("## Insights\nless is more"));
        // Unanswered steps fall back to a dash.
        assert!(md.contains("**Validation:**\n-"));
    }

    #[test]
    fn hits_renders_one_section_per_hit() {
        let md = render_hits(&completed_entry());
        assert_eq!(md.matches("## Hit ").count(), 4);
        assert!(md.contains("- **Fact:** Revenue milestone progress"));
        assert!(md.contains("- **Responsibility:** Self"));
    }

    #[test]
    fn hotlist_renders_numbered_items() {
        let now = Utc::now();
        let items = vec![
            HotlistItem {
                task_uuid: "u1".into(),
                task_id: None,
                title: "First".into(),
                source: "test".into(),
                domain: "Business".into(),
                created_at: now,
                tags: vec![],
                priority: 0,
            },
            HotlistItem {
                task_uuid: "u2".into(),
                task_id: None,
                title: "Second".into(),
                source: "test".into(),
                domain: "Body".into(),
                created_at: now,
                tags: vec![],
                priority: 0,
            },
        ];
        let md = render_hotlist(&items);
        assert!(md.contains("1. First"));
        assert!(md.contains("2. Second"));
    }

    #[test]
    fn doorwar_renders_checkboxes_and_choice() {
        let now = Utc::now();
        let items = vec![HotlistItem {
            task_uuid: "u1".into(),
            task_id: None,
            title: "Grow the list".into(),
            source: "test".into(),
            domain: "Business".into(),
            created_at: now,
            tags: vec![],
            priority: 0,
        }];
        let entry = DoorWarEntry {
            door_task_uuid: "d1".into(),
            door_task_id: Some(7),
            hotlist_uuid: "u1".into(),
            selected_title: "Grow the list".into(),
            domain: "Business".into(),
            reasoning: "Q2 - Importance: 5/10, Urgency: 0/10".into(),
            created_at: now,
        };
        let md = render_doorwar(&items, &entry);
        assert!(md.contains("- [ ] Grow the list"));
        assert!(md.contains("**Door:** Grow the list"));
        assert!(md.contains("**Reason:** Q2"));
    }

    #[test]
    fn quick_add_renders_checkbox_and_source() {
        let at = Utc::now();
        let md = render_quick_add("call the bank", "web", at);
        assert!(md.contains("- [ ] call the bank"));
        assert!(md.contains("**Source:** web"));
    }
}
