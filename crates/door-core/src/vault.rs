//! Vault layout and markdown export.
//!
//! Generated artifacts land in per-tool subdirectories of the Door vault
//! root: `1-Potential` (hotlist), `2-Plan` (door wars), `War-Stacks`,
//! `3-Production` (hit lists), `4-Profit`.

use crate::error::Result;
use crate::io::{atomic_write, ensure_dir};
use crate::markdown;
use crate::warstack::WarstackEntry;
use chrono::Utc;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ExportKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Hotlist,
    Doorwar,
    Warstack,
    Hits,
    Profit,
}

impl ExportKind {
    pub fn subdir(self) -> &'static str {
        match self {
            ExportKind::Hotlist => "1-Potential",
            ExportKind::Doorwar => "2-Plan",
            ExportKind::Warstack => "War-Stacks",
            ExportKind::Hits => "3-Production",
            ExportKind::Profit => "4-Profit",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportKind::Hotlist => "hotlist",
            ExportKind::Doorwar => "doorwar",
            ExportKind::Warstack => "warstack",
            ExportKind::Hits => "hits",
            ExportKind::Profit => "profit",
        }
    }
}

pub fn export_dir(vault_root: &Path, kind: ExportKind) -> PathBuf {
    vault_root.join(kind.subdir())
}

// ---------------------------------------------------------------------------
// Filenames
// ---------------------------------------------------------------------------

static FORBIDDEN_RE: OnceLock<Regex> = OnceLock::new();

fn forbidden_re() -> &'static Regex {
    FORBIDDEN_RE.get_or_init(|| Regex::new(r#"[\\/:*?"<>|]"#).unwrap())
}

/// Sanitize a title into a filesystem-safe basename: forbidden characters
/// become `-`, whitespace collapses to single spaces, capped at 120 chars.
pub fn safe_filename(name: &str) -> String {
    let replaced = forbidden_re().replace_all(name, "-");
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(120).collect()
}

fn timestamp_slug() -> String {
    Utc::now()
        .to_rfc3339()
        .replace([':', '.'], "-")
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write a markdown document into the vault subdirectory for `kind`.
/// Returns the path written. An empty/unsanitizable title falls back to
/// `<kind>_<timestamp>`.
pub fn write_markdown(
    vault_root: &Path,
    kind: ExportKind,
    title: &str,
    body: &str,
) -> Result<PathBuf> {
    let dir = export_dir(vault_root, kind);
    ensure_dir(&dir)?;
    let base = {
        let safe = safe_filename(title);
        if safe.is_empty() {
            format!("{}_{}", kind.as_str(), timestamp_slug())
        } else {
            safe
        }
    };
    let path = dir.join(format!("{base}.md"));
    atomic_write(&path, format!("{body}\n").as_bytes())?;
    Ok(path)
}

/// Render and write the two completion artifacts for a finished warstack,
/// recording both paths in the entry's `files` map.
pub fn export_warstack_files(entry: &mut WarstackEntry, vault_root: &Path) -> Result<()> {
    let safe_title = safe_filename(&entry.title);
    let warstack_path = write_markdown(
        vault_root,
        ExportKind::Warstack,
        &format!("WarStack_{}_{}", safe_title, entry.short_id),
        &markdown::render_warstack(entry),
    )?;
    let hits_path = write_markdown(
        vault_root,
        ExportKind::Hits,
        &format!("Hits_{}_{}", safe_title, entry.short_id),
        &markdown::render_hits(entry),
    )?;
    entry.files.insert("warstack".to_string(), warstack_path);
    entry.files.insert("hits".to_string(), hits_path);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn safe_filename_strips_forbidden_chars() {
        assert_eq!(safe_filename("a/b:c*d?e"), "a-b-c-d-e");
        assert_eq!(safe_filename("  spaced   out  "), "spaced out");
        assert_eq!(safe_filename(""), "");
        let long = "x".repeat(200);
        assert_eq!(safe_filename(&long).len(), 120);
    }

    #[test]
    fn write_markdown_lands_in_tool_subdir() {
        let dir = TempDir::new().unwrap();
        let path = write_markdown(dir.path(), ExportKind::Doorwar, "Door_War_2026-08-06", "# Hi")
            .unwrap();
        assert!(path.starts_with(dir.path().join("2-Plan")));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Hi\n"
        );
    }

    #[test]
    fn write_markdown_empty_title_gets_fallback_name() {
        let dir = TempDir::new().unwrap();
        let path = write_markdown(dir.path(), ExportKind::Hotlist, "", "body").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("hotlist_"));
        assert!(name.ends_with(".md"));
    }

    #[test]
    fn export_warstack_files_sets_both_paths() {
        let dir = TempDir::new().unwrap();
        let mut entry = WarstackEntry::new("Launch: v1", "Ship", "test");
        entry.hits = crate::hits::generate(crate::types::Domain::Business);
        export_warstack_files(&mut entry, dir.path()).unwrap();

        let warstack = entry.files.get("warstack").unwrap();
        let hits = entry.files.get("hits").unwrap();
        assert!(warstack.starts_with(dir.path().join("War-Stacks")));
        assert!(hits.starts_with(dir.path().join("3-Production")));
        assert!(warstack.exists());
        assert!(hits.exists());
        // Forbidden ':' in the title was sanitized.
        assert!(!warstack.file_name().unwrap().to_string_lossy().contains(':'));
    }
}
