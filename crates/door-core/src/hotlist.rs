use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HotlistItem
// ---------------------------------------------------------------------------

/// A candidate initiative waiting for prioritization.
///
/// Created once per submitted idea, backed by a Taskwarrior task; referenced
/// (never mutated) by door-war selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotlistItem {
    pub task_uuid: String,
    #[serde(default)]
    pub task_id: Option<i64>,
    pub title: String,
    pub source: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: u32,
}

// ---------------------------------------------------------------------------
// Eisenhower evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub quadrant: u8,
    pub importance_score: u32,
    pub urgency_score: u32,
    pub is_important: bool,
    pub is_urgent: bool,
    pub reasoning: String,
}

fn has_tag(item: &HotlistItem, tag: &str) -> bool {
    item.tags.iter().any(|t| t == tag)
}

/// Score one hotlist item on the Eisenhower matrix.
///
/// Deterministic and pure: `now` is passed in so the same inputs always
/// yield the same quadrant. The age bonus is cumulative; an item older
/// than 14 days collects both the >7d and >14d increments.
pub fn evaluate(item: &HotlistItem, now: DateTime<Utc>) -> Evaluation {
    let title_lower = item.title.to_lowercase();
    let mut importance: u32 = 0;
    let mut urgency: u32 = 0;

    if has_tag(item, "business") || has_tag(item, "career") {
        importance += 3;
    }
    if has_tag(item, "health") || has_tag(item, "body") {
        importance += 3;
    }
    if has_tag(item, "relationship") || has_tag(item, "balance") {
        importance += 2;
    }
    if title_lower.contains("goal") || title_lower.contains("vision") {
        importance += 2;
    }
    if item.priority >= 3 {
        importance += 2;
    }

    if has_tag(item, "urgent") || item.title.contains('!') {
        urgency += 3;
    }
    if item.priority >= 4 {
        urgency += 2;
    }
    let age_days = (now - item.created_at).num_days();
    if age_days > 7 {
        urgency += 1;
    }
    if age_days > 14 {
        urgency += 2;
    }

    let is_important = importance >= 3;
    let is_urgent = urgency >= 3;
    let quadrant = match (is_important, is_urgent) {
        (true, true) => 1,
        (true, false) => 2,
        (false, true) => 3,
        (false, false) => 4,
    };

    Evaluation {
        quadrant,
        importance_score: importance,
        urgency_score: urgency,
        is_important,
        is_urgent,
        reasoning: format!("Importance: {importance}/10, Urgency: {urgency}/10"),
    }
}

/// Score every item against the same reference time.
pub fn evaluate_all(items: &[HotlistItem], now: DateTime<Utc>) -> Vec<Evaluation> {
    items.iter().map(|item| evaluate(item, now)).collect()
}

/// Auto-select the Domino Door: the Quadrant-2 item with the highest
/// importance score. Ties break by list order (first wins). Returns the
/// index into the evaluated list, or None when no Quadrant-2 item exists.
pub fn auto_select_q2(evals: &[Evaluation]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, eval) in evals.iter().enumerate() {
        if eval.quadrant != 2 {
            continue;
        }
        match best {
            Some(b) if evals[b].importance_score >= eval.importance_score => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Resolve the door-war selection: an explicit choice (matched by title or
/// task uuid) wins; otherwise auto-select. Empty hotlist is an error, as is
/// an unmatched choice or the absence of any Quadrant-2 candidate.
pub fn select_door(
    items: &[HotlistItem],
    evals: &[Evaluation],
    choice: Option<&str>,
) -> crate::error::Result<usize> {
    if items.is_empty() {
        return Err(crate::error::DoorError::HotlistEmpty);
    }
    match choice.map(str::trim).filter(|c| !c.is_empty()) {
        Some(choice) => items
            .iter()
            .position(|item| item.title == choice || item.task_uuid == choice)
            .ok_or(crate::error::DoorError::NoDoorCandidate),
        None => auto_select_q2(evals).ok_or(crate::error::DoorError::NoDoorCandidate),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
