use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const CONFIG_FILE: &str = "config.yaml";

/// Project configuration, stored as `.notes/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Where anonymous requesters are sent to authenticate
    pub login_path: String,
    /// Landing page after a successful add, edit or delete
    pub success_path: String,
    /// Default tracing filter when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            login_path: "/auth/login/".to_string(),
            success_path: "/done/".to_string(),
            log_filter: "warn".to_string(),
        }
    }
}

impl NotesConfig {
    /// Load from `notes_dir`, falling back to defaults when the file is missing.
    pub fn load(notes_dir: &Path) -> Result<Self> {
        let path = notes_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    pub fn save(&self, notes_dir: &Path) -> Result<()> {
        let raw = serde_yaml::to_string(self)?;
        fs::write(notes_dir.join(CONFIG_FILE), raw)?;
        Ok(())
    }

    /// Login path carrying the page to come back to.
    pub fn login_redirect(&self, next: &str) -> String {
        format!("{}?next={}", self.login_path, next)
    }
}
