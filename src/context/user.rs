//! The signed-in user's own profile record
//!
//! [`UserProfileContext`] holds the editable record and writes it back to a
//! document store after every change. The store is a trait so the hosting
//! app can plug in whatever backend it uses.

use crate::profile::Gender;
use crate::runtime::lock;
use crate::{MapError, Result};
use async_trait::async_trait;
use fxhash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub show_location: bool,
    pub show_age: bool,
    pub show_online_status: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            show_location: true,
            show_age: true,
            show_online_status: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub age_range: (u32, u32),
    /// Maximum discovery distance in kilometers
    pub distance: u32,
    pub gender_preference: Vec<Gender>,
    pub notifications_enabled: bool,
    pub privacy: PrivacySettings,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            age_range: (18, 35),
            distance: 25,
            gender_preference: Vec::new(),
            notifications_enabled: true,
            privacy: PrivacySettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub location: String,
    pub bio: String,
    pub profile_image: Option<String>,
    pub gallery_images: Vec<String>,
    pub interests: Vec<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub preferences: Preferences,
}

/// Document store holding one profile record per user id
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Option<UserProfile>>;

    async fn save(&self, user_id: &str, profile: &UserProfile) -> Result<()>;
}

/// In-memory [`ProfileStore`], mainly for tests and the demo app
#[derive(Default)]
pub struct MemoryProfileStore {
    records: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<UserProfile> {
        lock(&self.records).get(user_id).cloned()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.get(user_id))
    }

    async fn save(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        lock(&self.records).insert(user_id.to_string(), profile.clone());
        Ok(())
    }
}

struct Loaded {
    user_id: String,
    profile: UserProfile,
}

/// Editable profile of the current user with save-on-change semantics
pub struct UserProfileContext<S: ProfileStore> {
    store: S,
    current: Mutex<Option<Loaded>>,
}

impl<S: ProfileStore> UserProfileContext<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the record for `user_id`, creating a default one if none exists
    pub async fn load(&self, user_id: &str) -> Result<UserProfile> {
        let profile = match self.store.load(user_id).await? {
            Some(profile) => profile,
            None => {
                log::info!("no profile stored for {}, creating one", user_id);
                let profile = UserProfile::default();
                self.store.save(user_id, &profile).await?;
                profile
            }
        };

        *lock(&self.current) = Some(Loaded {
            user_id: user_id.to_string(),
            profile: profile.clone(),
        });
        Ok(profile)
    }

    pub fn profile(&self) -> Option<UserProfile> {
        lock(&self.current).as_ref().map(|loaded| loaded.profile.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        lock(&self.current).as_ref().map(|loaded| loaded.user_id.clone())
    }

    /// Applies `edit` and persists the result. The in-memory record only
    /// changes once the save succeeds.
    pub async fn update<F>(&self, edit: F) -> Result<UserProfile>
    where
        F: FnOnce(&mut UserProfile),
    {
        let (user_id, mut draft) = {
            let current = lock(&self.current);
            let loaded = current
                .as_ref()
                .ok_or_else(|| MapError::Store("no user profile loaded".to_string()))?;
            (loaded.user_id.clone(), loaded.profile.clone())
        };

        edit(&mut draft);
        self.store.save(&user_id, &draft).await?;

        let mut current = lock(&self.current);
        match current.as_mut() {
            Some(loaded) if loaded.user_id == user_id => loaded.profile = draft.clone(),
            _ => log::debug!("profile context changed during save for {}", user_id),
        }
        Ok(draft)
    }

    /// Forgets the loaded record, e.g. on sign-out
    pub fn clear(&self) {
        *lock(&self.current) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    #[async_trait]
    impl ProfileStore for FailingStore {
        async fn load(&self, _user_id: &str) -> Result<Option<UserProfile>> {
            Ok(Some(UserProfile::default()))
        }

        async fn save(&self, _user_id: &str, _profile: &UserProfile) -> Result<()> {
            Err(MapError::Store("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_load_creates_default_record() {
        let context = UserProfileContext::new(MemoryProfileStore::new());
        let profile = context.load("uid").await.unwrap();

        assert_eq!(profile.preferences.age_range, (18, 35));
        assert_eq!(profile.preferences.distance, 25);
        assert!(profile.preferences.privacy.show_location);
        assert!(context.store().get("uid").is_some());
        assert_eq!(context.user_id().as_deref(), Some("uid"));
    }

    #[tokio::test]
    async fn test_update_saves_every_change() {
        let context = UserProfileContext::new(MemoryProfileStore::new());
        context.load("uid").await.unwrap();

        context
            .update(|profile| {
                profile.name = "Wanjiru".to_string();
                profile.interests.push("Hiking".to_string());
            })
            .await
            .unwrap();

        let stored = context.store().get("uid").unwrap();
        assert_eq!(stored.name, "Wanjiru");
        assert_eq!(stored.interests, vec!["Hiking".to_string()]);
        assert_eq!(context.profile(), Some(stored));
    }

    #[tokio::test]
    async fn test_update_requires_loaded_profile() {
        let context = UserProfileContext::new(MemoryProfileStore::new());
        assert!(matches!(
            context.update(|p| p.bio = "x".into()).await,
            Err(MapError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_record() {
        let context = UserProfileContext::new(FailingStore);
        context.load("uid").await.unwrap();

        assert!(context.update(|p| p.name = "New".into()).await.is_err());
        assert_eq!(context.profile().map(|p| p.name), Some(String::new()));

        context.clear();
        assert!(context.profile().is_none());
    }

    #[test]
    fn test_partial_json_record() {
        let profile: UserProfile =
            serde_json::from_str(r#"{ "name": "Amani", "preferences": { "distance": 10 } }"#)
                .unwrap();
        assert_eq!(profile.name, "Amani");
        assert_eq!(profile.preferences.distance, 10);
        assert_eq!(profile.preferences.age_range, (18, 35));
    }
}
