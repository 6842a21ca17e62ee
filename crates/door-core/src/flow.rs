use crate::error::Result;
use crate::hotlist::HotlistItem;
use crate::io::atomic_write;
use crate::warstack::WarstackEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// DoorWarEntry
// ---------------------------------------------------------------------------

/// One recorded door-war decision. Immutable once written; references the
/// chosen hotlist item by its task uuid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorWarEntry {
    pub door_task_uuid: String,
    #[serde(default)]
    pub door_task_id: Option<i64>,
    pub hotlist_uuid: String,
    pub selected_title: String,
    pub domain: String,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Flow — the single persisted document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    #[serde(default = "default_version")]
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub hotlist: Vec<HotlistItem>,
    pub doorwars: Vec<DoorWarEntry>,
    pub warstacks: Vec<WarstackEntry>,
    pub profits: Vec<serde_json::Value>,
    pub active_chats: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    1
}

impl Flow {
    /// Fresh document with every container empty.
    pub fn template() -> Self {
        Self {
            version: 1,
            updated_at: Utc::now(),
            hotlist: Vec::new(),
            doorwars: Vec::new(),
            warstacks: Vec::new(),
            profits: Vec::new(),
            active_chats: BTreeMap::new(),
        }
    }

    /// Resolve a warstack reference: full guid, exact short id, or a guid
    /// prefix. First match wins.
    pub fn find_warstack_index(&self, id_or_prefix: &str) -> Option<usize> {
        let reference = id_or_prefix.trim();
        if reference.is_empty() {
            return None;
        }
        self.warstacks.iter().position(|entry| {
            entry.guid == reference
                || entry.short_id == reference
                || entry.guid.starts_with(reference)
        })
    }

    pub fn find_warstack(&self, id_or_prefix: &str) -> Option<&WarstackEntry> {
        self.find_warstack_index(id_or_prefix)
            .map(|i| &self.warstacks[i])
    }

    // -----------------------------------------------------------------------
    // Chat sessions: at most one in-flight warstack per chat
    // -----------------------------------------------------------------------

    pub fn active_session(&self, chat_id: &str) -> Option<&str> {
        self.active_chats.get(chat_id).map(String::as_str)
    }

    pub fn set_active_session(&mut self, chat_id: &str, guid: &str) {
        self.active_chats
            .insert(chat_id.to_string(), guid.to_string());
    }

    pub fn clear_active_session(&mut self, chat_id: &str) {
        self.active_chats.remove(chat_id);
    }
}

// ---------------------------------------------------------------------------
// LoadOutcome
// ---------------------------------------------------------------------------

/// What happened while materializing the flow document.
///
/// The store never fails a load: damage degrades to empty containers, but the
/// outcome records that repair happened instead of hiding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Document parsed cleanly.
    Loaded,
    /// Document parsed, but the named fields had the wrong shape and were
    /// replaced with empty containers.
    Repaired { fields: Vec<String> },
    /// No usable document; a fresh template was returned.
    Fresh,
}

/// Field-wise defensive parse of a raw JSON value into a Flow.
fn normalize(value: serde_json::Value) -> (Flow, LoadOutcome) {
    let serde_json::Value::Object(mut map) = value else {
        return (Flow::template(), LoadOutcome::Fresh);
    };

    let mut repaired: Vec<String> = Vec::new();

    fn take_field<T: serde::de::DeserializeOwned + Default>(
        map: &mut serde_json::Map<String, serde_json::Value>,
        key: &str,
        repaired: &mut Vec<String>,
    ) -> T {
        match map.remove(key) {
            None => T::default(),
            Some(raw) => match serde_json::from_value(raw) {
                Ok(v) => v,
                Err(_) => {
                    repaired.push(key.to_string());
                    T::default()
                }
            },
        }
    }

    let version = match map.remove("version") {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(1) as u32,
        _ => 1,
    };
    let updated_at = map
        .remove("updated_at")
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_else(Utc::now);

    let flow = Flow {
        version,
        updated_at,
        hotlist: take_field(&mut map, "hotlist", &mut repaired),
        doorwars: take_field(&mut map, "doorwars", &mut repaired),
        warstacks: take_field(&mut map, "warstacks", &mut repaired),
        profits: take_field(&mut map, "profits", &mut repaired),
        active_chats: take_field(&mut map, "active_chats", &mut repaired),
    };

    if repaired.is_empty() {
        (flow, LoadOutcome::Loaded)
    } else {
        (flow, LoadOutcome::Repaired { fields: repaired })
    }
}

// ---------------------------------------------------------------------------
// FlowStore
// ---------------------------------------------------------------------------

/// Injected storage seam so operations stay testable without a real
/// filesystem. Load never fails; save stamps `updated_at` and persists the
/// whole document.
pub trait FlowStore {
    fn load(&self) -> (Flow, LoadOutcome);
    fn save(&mut self, flow: &mut Flow) -> Result<()>;
}

/// Production store: one pretty-printed JSON file, rewritten wholesale on
/// every save. Last write wins; acceptable under single-operator usage.
#[derive(Debug, Clone)]
pub struct FileFlowStore {
    path: PathBuf,
}

impl FileFlowStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlowStore for FileFlowStore {
    fn load(&self) -> (Flow, LoadOutcome) {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return (Flow::template(), LoadOutcome::Fresh),
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => normalize(value),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "flow document unreadable, starting fresh");
                (Flow::template(), LoadOutcome::Fresh)
            }
        }
    }

    fn save(&mut self, flow: &mut Flow) -> Result<()> {
        flow.updated_at = Utc::now();
        let data = serde_json::to_vec_pretty(flow)?;
        atomic_write(&self.path, &data)
    }
}

/// In-memory store for tests: round-trips through the same JSON
/// representation the file store writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryFlowStore {
    doc: Option<String>,
}

impl MemoryFlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(doc: impl Into<String>) -> Self {
        Self {
            doc: Some(doc.into()),
        }
    }
}

impl FlowStore for MemoryFlowStore {
    fn load(&self) -> (Flow, LoadOutcome) {
        let Some(raw) = &self.doc else {
            return (Flow::template(), LoadOutcome::Fresh);
        };
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => normalize(value),
            Err(_) => (Flow::template(), LoadOutcome::Fresh),
        }
    }

    fn save(&mut self, flow: &mut Flow) -> Result<()> {
        flow.updated_at = Utc::now();
        self.doc = Some(serde_json::to_string_pretty(flow)?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warstack::WarstackEntry;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_fresh_template() {
        let dir = TempDir::new().unwrap();
        let store = FileFlowStore::new(dir.path().join(".door-flow.json"));
        let (flow, outcome) = store.load();
        assert_eq!(outcome, LoadOutcome::Fresh);
        assert_eq!(flow.version, 1);
        assert!(flow.hotlist.is_empty());
        assert!(flow.active_chats.is_empty());
    }

    #[test]
    fn corrupt_file_loads_fresh_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".door-flow.json");
        std::fs::write(&path, "not json {").unwrap();
        let store = FileFlowStore::new(&path);
        let (_, outcome) = store.load();
        assert_eq!(outcome, LoadOutcome::Fresh);
    }

    #[test]
    fn wrong_shaped_fields_are_repaired_to_empty() {
        let store = MemoryFlowStore::with_raw(
            r#"{"version": 1, "hotlist": "oops", "warstacks": [], "active_chats": 7}"#,
        );
        let (flow, outcome) = store.load();
        assert!(flow.hotlist.is_empty());
        assert!(flow.active_chats.is_empty());
        match outcome {
            LoadOutcome::Repaired { fields } => {
                assert!(fields.contains(&"hotlist".to_string()));
                assert!(fields.contains(&"active_chats".to_string()));
                assert!(!fields.contains(&"warstacks".to_string()));
            }
            other => panic!("expected repair, got {other:?}"),
        }
    }

    #[test]
    fn save_load_roundtrip_preserves_contents() {
        let dir = TempDir::new().unwrap();
        let mut store = FileFlowStore::new(dir.path().join(".door-flow.json"));

        let mut flow = Flow::template();
        flow.warstacks.push(WarstackEntry::new("T", "D", "test"));
        let guid = flow.warstacks[0].guid.clone();
        flow.set_active_session("123", &guid);
        store.save(&mut flow).unwrap();

        let (loaded, outcome) = store.load();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(loaded.warstacks.len(), 1);
        assert_eq!(loaded.warstacks[0].guid, flow.warstacks[0].guid);
        assert_eq!(
            loaded.active_session("123"),
            Some(flow.warstacks[0].guid.as_str())
        );
    }

    #[test]
    fn save_only_touches_updated_at() {
        let dir = TempDir::new().unwrap();
        let mut store = FileFlowStore::new(dir.path().join(".door-flow.json"));

        let mut flow = Flow::template();
        flow.warstacks.push(WarstackEntry::new("T", "D", "test"));
        store.save(&mut flow).unwrap();

        let (mut first, _) = store.load();
        store.save(&mut first).unwrap();
        let (second, _) = store.load();

        let strip = |f: &Flow| {
            let mut v = serde_json::to_value(f).unwrap();
            v.as_object_mut().unwrap().remove("updated_at");
            v
        };
        assert_eq!(strip(&first), strip(&second));
    }

    #[test]
    fn find_warstack_by_guid_short_id_and_prefix() {
        let mut flow = Flow::template();
        let entry = WarstackEntry::new("T", "D", "test");
        let guid = entry.guid.clone();
        let short = entry.short_id.clone();
        flow.warstacks.push(entry);

        for reference in [guid.as_str(), short.as_str(), &guid[..4], &guid[..12]] {
            let found = flow.find_warstack(reference).unwrap();
            assert_eq!(found.guid, guid, "reference {reference:?}");
        }
        assert!(flow.find_warstack("zzzz").is_none());
        assert!(flow.find_warstack("").is_none());
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryFlowStore::new();
        let (mut flow, outcome) = store.load();
        assert_eq!(outcome, LoadOutcome::Fresh);
        flow.warstacks.push(WarstackEntry::new("T", "D", "test"));
        store.save(&mut flow).unwrap();
        let (loaded, outcome) = store.load();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(loaded.warstacks.len(), 1);
    }
}
