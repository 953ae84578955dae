use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::CredentialStore;
use crate::app::state::GalleryStore;
use crate::gallery::Changes;

/// Automatically saved session state
/// stored in `state.toml`
///
/// Holds the credentials and the edit session so that pending changes
/// survive between invocations until they are committed or discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistentState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf: Option<String>,
    /// Share token taken from the last location.
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub is_edit_mode_enabled: bool,
    #[serde(default)]
    pub selected_files: Vec<String>,
    #[serde(default)]
    pub changes: Changes,
}

impl PersistentState {
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|err| {
                warn!("{} is invalid, starting fresh: {}", path.display(), err);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serializing state")?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Put the saved edit session back into a fresh store.
    pub fn restore(&self, store: &mut GalleryStore) {
        store.is_edit_mode_enabled = self.is_edit_mode_enabled;
        store.selected_files = self.selected_files.clone();
        store.changes = self.changes.clone();
    }

    pub fn capture(&mut self, store: &GalleryStore) {
        self.token = store.token.clone();
        self.is_edit_mode_enabled = store.is_edit_mode_enabled;
        self.selected_files = store.selected_files.clone();
        self.changes = store.changes.clone();
    }
}

impl CredentialStore for PersistentState {
    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn csrf(&self) -> Option<&str> {
        self.csrf.as_deref()
    }

    fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    fn set_csrf(&mut self, csrf: String) {
        self.csrf = Some(csrf);
    }

    fn forget(&mut self) {
        self.access_token = None;
        self.csrf = None;
    }
}
