use crate::error::{DoorError, Result};
use crate::flow::Flow;
use crate::hits::{self, Hit};
use crate::types::{Domain, StepKey, WarstackStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// WarstackEntry
// ---------------------------------------------------------------------------

/// Link between a generated hit and the external task created for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitLink {
    pub hit_id: String,
    pub ticktick_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickTickRefs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<HitLink>,
}

/// The central mutable entity: one 10-question reflection for a chosen door.
///
/// Invariant: `current_step` is `Some` exactly while `status` is draft, and
/// always names the first unanswered step in the fixed order. Once complete,
/// `current_step` is `None` and `hits` holds the four generated actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarstackEntry {
    pub guid: String,
    pub short_id: String,
    pub title: String,
    #[serde(default)]
    pub door: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub status: WarstackStatus,
    #[serde(default)]
    pub current_step: Option<StepKey>,
    #[serde(default)]
    pub responses: BTreeMap<StepKey, String>,
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default)]
    pub files: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub ticktick: TickTickRefs,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Opaque random token identifying a warstack. Human references use the
/// first 8 characters (`short_id`) or any unambiguous prefix.
pub fn make_guid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn short_id(guid: &str) -> String {
    guid.chars().take(8).collect()
}

impl WarstackEntry {
    pub fn new(title: impl Into<String>, door: impl Into<String>, source: impl Into<String>) -> Self {
        let guid = make_guid();
        let now = Utc::now();
        Self {
            short_id: short_id(&guid),
            guid,
            title: title.into(),
            door: door.into(),
            source: source.into(),
            domain: None,
            status: WarstackStatus::Draft,
            current_step: Some(StepKey::first()),
            responses: BTreeMap::new(),
            hits: Vec::new(),
            files: BTreeMap::new(),
            ticktick: TickTickRefs::default(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == WarstackStatus::Complete
    }
}

// ---------------------------------------------------------------------------
// State machine operations (operate on the containing Flow)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct StartArgs {
    pub id: Option<String>,
    pub title: String,
    pub door: String,
    pub source: String,
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Entry is already complete; nothing left to answer.
    Done { guid: String, short_id: String },
    /// Entry is in draft; `step` is the next question to ask.
    Next {
        guid: String,
        short_id: String,
        step: StepKey,
    },
}

/// Start a new warstack, or resume an existing one by id.
///
/// A `chat_id` binds the chat to the draft entry so later answers can omit
/// the id. Resuming a completed entry reports done without reprocessing.
pub fn start(flow: &mut Flow, args: StartArgs) -> Result<StartOutcome> {
    let idx = match args.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(id_ref) => flow
            .find_warstack_index(id_ref)
            .ok_or_else(|| DoorError::WarstackNotFound(id_ref.to_string()))?,
        None => {
            let title = if args.title.trim().is_empty() {
                "War Stack".to_string()
            } else {
                args.title.trim().to_string()
            };
            let entry = WarstackEntry::new(title, args.door.trim(), args.source.trim());
            flow.warstacks.push(entry);
            flow.warstacks.len() - 1
        }
    };

    let (guid, short, complete, step) = {
        let entry = &flow.warstacks[idx];
        (
            entry.guid.clone(),
            entry.short_id.clone(),
            entry.is_complete(),
            entry.current_step.unwrap_or(StepKey::first()),
        )
    };

    if complete {
        if let Some(chat) = &args.chat_id {
            flow.clear_active_session(chat);
        }
        return Ok(StartOutcome::Done {
            guid,
            short_id: short,
        });
    }

    if let Some(chat) = args.chat_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        flow.set_active_session(chat, &guid);
    }

    Ok(StartOutcome::Next {
        guid,
        short_id: short,
        step,
    })
}

#[derive(Debug, Clone, Default)]
pub struct AnswerArgs {
    pub id: Option<String>,
    pub chat_id: Option<String>,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The entry was already complete; the call is an idempotent no-op.
    AlreadyDone { guid: String, short_id: String },
    /// Answer stored; `step` is the next question.
    Next {
        guid: String,
        short_id: String,
        step: StepKey,
    },
    /// The final answer landed: hits are generated and the entry is
    /// complete. Markdown export and persistence are the caller's job.
    Completed { guid: String, short_id: String },
}

/// Store one answer and advance the warstack a single step.
///
/// The target entry resolves by explicit id first, then by the caller's
/// active chat session. The `domain` answer is normalized to one of the four
/// canonical domains before storing; the final step generates the hits.
pub fn answer_step(flow: &mut Flow, args: AnswerArgs) -> Result<AnswerOutcome> {
    let answer = args.answer.trim();
    if answer.is_empty() {
        return Err(DoorError::MissingField("answer".to_string()));
    }

    let id_ref = args.id.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let chat_id = args
        .chat_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut idx = id_ref.and_then(|r| flow.find_warstack_index(r));
    if idx.is_none() {
        if let Some(chat) = chat_id {
            if let Some(guid) = flow.active_session(chat).map(str::to_string) {
                idx = flow.find_warstack_index(&guid);
            }
        }
    }
    let idx = idx.ok_or_else(|| {
        DoorError::WarstackNotFound(id_ref.or(chat_id).unwrap_or_default().to_string())
    })?;

    if flow.warstacks[idx].is_complete() {
        let entry = &flow.warstacks[idx];
        return Ok(AnswerOutcome::AlreadyDone {
            guid: entry.guid.clone(),
            short_id: entry.short_id.clone(),
        });
    }

    let step = flow.warstacks[idx].current_step.unwrap_or(StepKey::first());
    {
        let entry = &mut flow.warstacks[idx];
        if step == StepKey::Domain {
            let domain = Domain::normalize(answer);
            entry.responses.insert(step, domain.as_str().to_string());
            entry.domain = Some(domain);
        } else {
            entry.responses.insert(step, answer.to_string());
        }
        entry.updated_at = Utc::now();
    }

    match step.next() {
        Some(next) => {
            let entry = &mut flow.warstacks[idx];
            entry.current_step = Some(next);
            Ok(AnswerOutcome::Next {
                guid: entry.guid.clone(),
                short_id: entry.short_id.clone(),
                step: next,
            })
        }
        None => {
            let guid = {
                let entry = &mut flow.warstacks[idx];
                let domain = entry.domain.unwrap_or(Domain::Business);
                entry.hits = hits::generate(domain);
                entry.status = WarstackStatus::Complete;
                entry.current_step = None;
                entry.completed_at = Some(Utc::now());
                entry.guid.clone()
            };
            if let Some(chat) = chat_id {
                flow.clear_active_session(chat);
            }
            let entry = &flow.warstacks[idx];
            Ok(AnswerOutcome::Completed {
                guid,
                short_id: entry.short_id.clone(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
