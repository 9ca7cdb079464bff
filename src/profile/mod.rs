//! Discoverable user records and the directory that lists them

pub mod directory;
pub mod samples;

use crate::core::geo::LatLng;
use serde::{Deserialize, Deserializer, Serialize};

pub use directory::StaticDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A discoverable user as consumed by the swipe deck and the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    /// `[longitude, latitude]` exactly as received; repaired only when displayed
    #[serde(default, deserialize_with = "lenient_coordinates")]
    pub coordinates: Option<Vec<f64>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub online: Option<bool>,
    #[serde(default)]
    pub is_moving: bool,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Profile {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            coordinates: None,
            image_url: None,
            online: None,
            is_moving: false,
            age: None,
            gender: None,
            bio: None,
            interests: Vec::new(),
            location: None,
        }
    }

    pub fn with_coordinates(mut self, lng: f64, lat: f64) -> Self {
        self.coordinates = Some(vec![lng, lat]);
        self
    }

    pub fn with_position(self, position: LatLng) -> Self {
        self.with_coordinates(position.lng, position.lat)
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = Some(online);
        self
    }

    pub fn moving(mut self) -> Self {
        self.is_moving = true;
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn is_online(&self) -> bool {
        self.online.unwrap_or(false)
    }

    pub fn raw_coordinates(&self) -> Option<&[f64]> {
        self.coordinates.as_deref()
    }

    /// Parses a JSON array of profiles
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Profile>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Accepts any JSON for `coordinates`: arrays keep their arity with
/// non-numeric entries turned into `NaN`, everything else becomes `None`.
fn lenient_coordinates<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .map(|item| item.as_f64().unwrap_or(f64::NAN))
                .collect(),
        ),
        _ => None,
    })
}

/// Criteria for [`ProfileDirectory::list_candidates`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFilter {
    pub online_only: bool,
    pub gender: Option<Gender>,
    /// Inclusive `(min, max)`; profiles without an age are excluded when set
    pub age_range: Option<(u32, u32)>,
    /// Center and radius in meters
    pub near: Option<(LatLng, f64)>,
    pub limit: Option<usize>,
}

impl ProfileFilter {
    pub fn online_only(mut self) -> Self {
        self.online_only = true;
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn age_range(mut self, min: u32, max: u32) -> Self {
        self.age_range = Some((min.min(max), min.max(max)));
        self
    }

    pub fn near(mut self, center: LatLng, radius_m: f64) -> Self {
        self.near = Some((center, radius_m));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks everything except the spatial criterion
    pub fn matches_attributes(&self, profile: &Profile) -> bool {
        if self.online_only && !profile.is_online() {
            return false;
        }
        if let Some(gender) = self.gender {
            if profile.gender != Some(gender) {
                return false;
            }
        }
        if let Some((min, max)) = self.age_range {
            match profile.age {
                Some(age) if age >= min && age <= max => {}
                _ => return false,
            }
        }
        true
    }
}

/// Read-only, restartable source of candidate profiles
pub trait ProfileDirectory: Send + Sync {
    /// Returns a fresh snapshot on every call
    fn list_candidates(&self, filter: Option<&ProfileFilter>) -> Vec<Profile>;
}
