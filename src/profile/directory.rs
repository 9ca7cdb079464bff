use super::{samples::sample_profiles, Profile, ProfileDirectory, ProfileFilter};
use crate::core::config::CoordinatePolicy;
use crate::core::validate::sanitize_coordinates;
use crate::spatial::{SpatialIndex, SpatialItem};
use crate::Result;
use std::path::Path;

/// Fixed list of profiles, either the built-in samples or fetched records.
///
/// Profiles that carry coordinates are also kept in an R-tree (positions
/// repaired with the same policy the map uses) so radius filters stay cheap.
pub struct StaticDirectory {
    profiles: Vec<Profile>,
    /// Indexes into `profiles`
    index: SpatialIndex<usize>,
}

impl StaticDirectory {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self::with_policy(profiles, &CoordinatePolicy::default())
    }

    pub fn with_policy(profiles: Vec<Profile>, policy: &CoordinatePolicy) -> Self {
        let items = profiles
            .iter()
            .enumerate()
            .filter(|(_, profile)| profile.coordinates.is_some())
            .map(|(slot, profile)| {
                let position = sanitize_coordinates(profile.raw_coordinates(), policy);
                SpatialItem::new(profile.id.clone(), position, slot)
            })
            .collect();

        let index = SpatialIndex::bulk_load(items);
        log::debug!(
            "indexed {} of {} profiles by location",
            index.len(),
            profiles.len()
        );
        Self { profiles, index }
    }

    pub fn samples() -> Self {
        Self::new(sample_profiles())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(Profile::list_from_json(json)?))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }
}

impl ProfileDirectory for StaticDirectory {
    fn list_candidates(&self, filter: Option<&ProfileFilter>) -> Vec<Profile> {
        let Some(filter) = filter else {
            return self.profiles.clone();
        };

        // Keep directory order regardless of how the tree returns hits
        let slots: Vec<usize> = match filter.near {
            Some(_) if self.index.is_empty() => Vec::new(),
            Some((center, radius_m)) => {
                let mut slots: Vec<usize> = self
                    .index
                    .query_radius(&center, radius_m)
                    .into_iter()
                    .map(|item| item.data)
                    .collect();
                slots.sort_unstable();
                slots
            }
            None => (0..self.profiles.len()).collect(),
        };

        let matches = slots
            .into_iter()
            .map(|slot| &self.profiles[slot])
            .filter(|profile| filter.matches_attributes(profile))
            .cloned();

        match filter.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        }
    }
}
