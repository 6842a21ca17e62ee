use crate::error::{DoorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_bridge_timeout_ms() -> u64 {
    2500
}

fn default_hit_tags() -> Vec<String> {
    vec!["door".to_string(), "hit".to_string(), "production".to_string()]
}

/// Runtime configuration for the door flow.
///
/// Values come from an optional `door.yaml` file overridden by environment
/// variables (the deployment surface of the original service). Paths left
/// unset resolve against the user's vault under the home directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorConfig {
    #[serde(default)]
    pub vault_dir: Option<PathBuf>,
    #[serde(default)]
    pub flow_path: Option<PathBuf>,
    #[serde(default)]
    pub bridge_url: Option<String>,
    #[serde(default)]
    pub bridge_token: Option<String>,
    #[serde(default = "default_bridge_timeout_ms")]
    pub bridge_timeout_ms: u64,
    #[serde(default)]
    pub hits_ticktick: bool,
    #[serde(default = "default_hit_tags")]
    pub hit_tags: Vec<String>,
    #[serde(default)]
    pub ticktick_token: Option<String>,
    #[serde(default)]
    pub ticktick_project_id: Option<String>,
    /// Override of the TickTick API base URL (self-hosted proxies, tests).
    #[serde(default)]
    pub ticktick_base_url: Option<String>,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            vault_dir: None,
            flow_path: None,
            bridge_url: None,
            bridge_token: None,
            bridge_timeout_ms: default_bridge_timeout_ms(),
            hits_ticktick: false,
            hit_tags: default_hit_tags(),
            ticktick_token: None,
            ticktick_project_id: None,
            ticktick_base_url: None,
        }
    }
}

/// Split a comma-separated tag list, dropping empties.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl DoorConfig {
    /// Load from an optional YAML file, then let the environment override.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut cfg = match file {
            Some(path) if path.exists() => {
                let data = std::fs::read_to_string(path)?;
                serde_yaml::from_str(&data)?
            }
            _ => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    /// Environment overrides, matching the original deployment variables.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("DOOR_VAULT_DIR") {
            self.vault_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("DOOR_FLOW_PATH") {
            self.flow_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("DOOR_BRIDGE_URL") {
            self.bridge_url = Some(v.trim_end_matches('/').to_string());
        }
        if let Ok(v) = std::env::var("DOOR_BRIDGE_TOKEN") {
            self.bridge_token = Some(v);
        }
        if let Ok(v) = std::env::var("DOOR_BRIDGE_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.bridge_timeout_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("DOOR_HITS_TICKTICK") {
            self.hits_ticktick = v == "1";
        }
        if let Ok(v) = std::env::var("DOOR_HITS_TAGS") {
            let tags = parse_tags(&v);
            if !tags.is_empty() {
                self.hit_tags = tags;
            }
        }
        if let Ok(v) = std::env::var("TICKTICK_TOKEN") {
            self.ticktick_token = Some(v);
        }
        if let Ok(v) = std::env::var("TICKTICK_PROJECT_ID") {
            self.ticktick_project_id = Some(v);
        }
        if let Ok(v) = std::env::var("TICKTICK_BASE_URL") {
            self.ticktick_base_url = Some(v.trim_end_matches('/').to_string());
        }
    }

    /// The Door vault root (default `~/AlphaOS-Vault/Door`).
    pub fn vault_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.vault_dir {
            return Ok(dir.clone());
        }
        let hm = home::home_dir().ok_or(DoorError::HomeNotFound)?;
        Ok(hm.join("AlphaOS-Vault").join("Door"))
    }

    /// The flow document path (default `<vault>/.door-flow.json`).
    pub fn flow_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.flow_path {
            return Ok(path.clone());
        }
        Ok(self.vault_dir()?.join(".door-flow.json"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let cfg = DoorConfig::default();
        assert_eq!(cfg.bridge_timeout_ms, 2500);
        assert!(!cfg.hits_ticktick);
        assert_eq!(cfg.hit_tags, vec!["door", "hit", "production"]);
        assert!(cfg.bridge_url.is_none());
    }

    #[test]
    fn yaml_roundtrip() {
        let cfg = DoorConfig {
            vault_dir: Some(PathBuf::from("/tmp/vault")),
            bridge_url: Some("http://localhost:8080".into()),
            hits_ticktick: true,
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: DoorConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.vault_dir, cfg.vault_dir);
        assert_eq!(parsed.bridge_url, cfg.bridge_url);
        assert!(parsed.hits_ticktick);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let cfg: DoorConfig = serde_yaml::from_str("bridge_url: http://bridge:9000\n").unwrap();
        assert_eq!(cfg.bridge_url.as_deref(), Some("http://bridge:9000"));
        assert_eq!(cfg.bridge_timeout_ms, 2500);
        assert_eq!(cfg.hit_tags, vec!["door", "hit", "production"]);
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("door.yaml");
        std::fs::write(&path, "vault_dir: /tmp/door-vault\n").unwrap();
        let cfg = DoorConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.vault_dir, Some(PathBuf::from("/tmp/door-vault")));
    }

    #[test]
    fn explicit_paths_win_over_derived_defaults() {
        let cfg = DoorConfig {
            vault_dir: Some(PathBuf::from("/v")),
            flow_path: Some(PathBuf::from("/elsewhere/flow.json")),
            ..Default::default()
        };
        assert_eq!(cfg.vault_dir().unwrap(), PathBuf::from("/v"));
        assert_eq!(cfg.flow_path().unwrap(), PathBuf::from("/elsewhere/flow.json"));

        let derived = DoorConfig {
            vault_dir: Some(PathBuf::from("/v")),
            ..Default::default()
        };
        assert_eq!(
            derived.flow_path().unwrap(),
            PathBuf::from("/v/.door-flow.json")
        );
    }

    #[test]
    fn parse_tags_drops_empties() {
        assert_eq!(parse_tags("door, hit ,,production"), vec!["door", "hit", "production"]);
        assert!(parse_tags("").is_empty());
    }
}
