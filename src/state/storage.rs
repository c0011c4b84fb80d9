//! Local preference storage
//!
//! A small JSON file holding per-screen view modes and unsaved create-form
//! drafts. A missing or unreadable file never blocks the admin panel; it
//! starts from defaults instead.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::list::ViewMode;
use crate::utils::errors::Result;

/// Raw form values keyed by dotted field name
pub type Draft = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub view_modes: BTreeMap<String, ViewMode>,
    #[serde(default)]
    pub drafts: BTreeMap<String, Draft>,
}

#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    data: Mutex<Preferences>,
}

impl PreferenceStore {
    /// Open the store at `path`, falling back to defaults
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str::<Preferences>(&text) {
                Ok(prefs) => {
                    debug!(path = %path.display(), "Preferences loaded");
                    prefs
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt preferences file, using defaults");
                    Preferences::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read preferences file, using defaults");
                Preferences::default()
            }
        };

        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> Preferences {
        self.data.lock().await.clone()
    }

    pub async fn view_mode(&self, screen: &str) -> ViewMode {
        self.data.lock().await.view_modes.get(screen).copied().unwrap_or_default()
    }

    pub async fn set_view_mode(&self, screen: &str, mode: ViewMode) -> Result<()> {
        let mut data = self.data.lock().await;
        data.view_modes.insert(screen.to_string(), mode);
        self.persist(&data).await
    }

    pub async fn draft(&self, form: &str) -> Option<Draft> {
        self.data.lock().await.drafts.get(form).cloned()
    }

    pub async fn save_draft(&self, form: &str, draft: Draft) -> Result<()> {
        let mut data = self.data.lock().await;
        data.drafts.insert(form.to_string(), draft);
        self.persist(&data).await
    }

    pub async fn clear_draft(&self, form: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        if data.drafts.remove(form).is_none() {
            return Ok(());
        }
        self.persist(&data).await
    }

    /// Write through a temporary file so a crash never leaves half a file
    async fn persist(&self, data: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let serialized = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp, serialized).await {
            error!(path = %tmp.display(), error = %e, "Failed to write preferences");
            return Err(e.into());
        }
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::load(dir.path().join("prefs.json")).await;
        assert_eq!(store.view_mode("atividades").await, ViewMode::Table);
        assert!(store.draft("atividades").await.is_none());
    }

    #[tokio::test]
    async fn test_view_mode_persists_across_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let store = PreferenceStore::load(&path).await;
        store.set_view_mode("atividades", ViewMode::Cards).await.unwrap();

        let reopened = PreferenceStore::load(&path).await;
        assert_eq!(reopened.view_mode("atividades").await, ViewMode::Cards);
        assert_eq!(reopened.view_mode("unidades").await, ViewMode::Table);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = PreferenceStore::load(&path).await;
        assert_eq!(store.snapshot().await, Preferences::default());

        store.set_view_mode("estudantes", ViewMode::Cards).await.unwrap();
        let reopened = PreferenceStore::load(&path).await;
        assert_eq!(reopened.view_mode("estudantes").await, ViewMode::Cards);
    }

    #[tokio::test]
    async fn test_drafts() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::load(dir.path().join("prefs.json")).await;

        let mut draft = Draft::new();
        draft.insert("name".to_string(), "Unidade Centro".to_string());
        store.save_draft("unidades", draft.clone()).await.unwrap();
        assert_eq!(store.draft("unidades").await, Some(draft));

        store.clear_draft("unidades").await.unwrap();
        assert!(store.draft("unidades").await.is_none());
    }
}
