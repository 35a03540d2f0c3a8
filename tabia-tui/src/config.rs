//! Persistent configuration for tabia-tui.
//!
//! Lives at `~/.config/tabia/tui.toml`. This is consumer state (who am
//! I, how should the board look) — the presence core itself persists
//! nothing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default session user id when none is configured.
pub const DEFAULT_USER_ID: &str = "me";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Session user id (keys the crosstable score line).
    pub user_id: Option<String>,
    /// Display name.
    pub username: Option<String>,
    /// Board theme name, passed through to the renderer as a plain
    /// parameter. Never stored in core state.
    pub theme: Option<String>,
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabia")
        .join("tui.toml")
}

impl Config {
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(s) => match toml::from_str(&s) {
                    Ok(c) => return c,
                    Err(e) => eprintln!("Warning: bad config file {}: {e}", path.display()),
                },
                Err(e) => eprintln!("Warning: can't read {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        let path = config_path();
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match toml::to_string_pretty(self) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    tracing::warn!("can't write {}: {e}", path.display());
                }
            }
            Err(e) => tracing::warn!("can't serialize config: {e}"),
        }
    }

    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }
}
