use crate::profile::Profile;
use std::sync::Arc;
use tokio::sync::watch;

/// Single shared "selected profile" cell, last write wins.
///
/// Marker click handlers write to it; the UI layer reads it or subscribes
/// for changes.
#[derive(Clone)]
pub struct SelectionSlot {
    tx: Arc<watch::Sender<Option<Profile>>>,
}

impl SelectionSlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Replaces any previous selection
    pub fn select(&self, profile: Profile) {
        log::debug!("selected profile {}", profile.id);
        self.tx.send_replace(Some(profile));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    pub fn selected(&self) -> Option<Profile> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.tx.subscribe()
    }
}

impl Default for SelectionSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SelectionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionSlot")
            .field("selected", &self.tx.borrow().as_ref().map(|p| p.id.clone()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_selection_wins() {
        let slot = SelectionSlot::new();
        assert!(slot.selected().is_none());

        slot.select(Profile::new("a", "A"));
        slot.select(Profile::new("b", "B"));
        assert_eq!(slot.selected().map(|p| p.id), Some("b".to_string()));

        slot.clear();
        assert!(slot.selected().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let slot = SelectionSlot::new();
        let mut rx = slot.subscribe();

        let writer = slot.clone();
        writer.select(Profile::new("a", "A"));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|p| p.id.as_str()), Some("a"));
    }
}
