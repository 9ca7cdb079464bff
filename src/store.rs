//! App-wide UI state: theme, matches and notifications
//!
//! An [`AppStore`] is created once by the host and handed out behind an
//! `Arc`. Reads return owned copies so no lock is ever held by callers.

use crate::runtime::lock;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Persisted form of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppState {
    pub theme: Theme,
    /// Match records are opaque to the map and kept as raw JSON
    pub matches: Vec<Value>,
    pub notifications: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct AppStore {
    state: Mutex<AppState>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: AppState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn theme(&self) -> Theme {
        lock(&self.state).theme
    }

    pub fn set_theme(&self, theme: Theme) {
        log::debug!("theme set to {:?}", theme);
        lock(&self.state).theme = theme;
    }

    pub fn add_match(&self, record: Value) {
        lock(&self.state).matches.push(record);
    }

    pub fn matches(&self) -> Vec<Value> {
        lock(&self.state).matches.clone()
    }

    pub fn add_notification(&self, notification: Value) {
        lock(&self.state).notifications.push(notification);
    }

    pub fn notifications(&self) -> Vec<Value> {
        lock(&self.state).notifications.clone()
    }

    pub fn snapshot(&self) -> AppState {
        lock(&self.state).clone()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path.as_ref(), json)?;
        log::debug!("app state saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Restores a store saved with [`save`](Self::save). A missing file
    /// yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no saved app state at {}", path.display());
            return Ok(Self::new());
        }
        let state: AppState = serde_json::from_str(&fs::read_to_string(path)?)?;
        Ok(Self::from_state(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "nearby-map-{}-{}-{}.json",
            name,
            std::process::id(),
            fastrand::u64(..)
        ))
    }

    #[test]
    fn test_defaults() {
        let store = AppStore::new();
        assert_eq!(store.theme(), Theme::System);
        assert!(store.matches().is_empty());
        assert!(store.notifications().is_empty());
    }

    #[test]
    fn test_shared_writes_append_in_order() {
        let store = Arc::new(AppStore::new());
        let writer = store.clone();

        writer.set_theme(Theme::Dark);
        writer.add_match(json!({ "id": "1" }));
        writer.add_match(json!({ "id": "2" }));
        writer.add_notification(json!("New match"));

        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.matches(), vec![json!({ "id": "1" }), json!({ "id": "2" })]);
        assert_eq!(store.snapshot().notifications.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("store");
        let store = AppStore::new();
        store.set_theme(Theme::Light);
        store.add_notification(json!({ "text": "hello" }));
        store.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"light\""));

        let restored = AppStore::load(&path).unwrap();
        assert_eq!(restored.snapshot(), store.snapshot());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_or_corrupt_file() {
        let missing = AppStore::load(temp_path("missing")).unwrap();
        assert_eq!(missing.theme(), Theme::System);

        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppStore::load(&path),
            Err(crate::MapError::Serialization(_))
        ));
        let _ = fs::remove_file(&path);
    }
}
