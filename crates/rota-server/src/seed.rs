//! Seed data loading.
//!
//! A deployment's records come from a single JSON seed file holding the
//! school, its locations, courses and enrolled profiles. The file is loaded
//! once at startup, every record is validated against the school's week, and
//! cross-references are checked before anything reaches the store.

use crate::error::SeedError;
use rota_store::{Course, Location, MemoryStore, Profile, School};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The full contents of a seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedData {
    /// The school every calendar is read against
    pub school: School,

    /// Locations of the school
    #[serde(default)]
    pub locations: Vec<Location>,

    /// Courses offered across the locations
    #[serde(default)]
    pub courses: Vec<Course>,

    /// Enrolled profiles
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl SeedData {
    /// Load seed data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the file cannot be read or is malformed JSON.
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let file = File::open(path).map_err(|source| SeedError::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let data: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(data)
    }

    /// Validate every record and every cross-reference.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` on the first invalid field or dangling reference.
    pub fn validate(&self) -> Result<(), SeedError> {
        self.school.validate()?;

        let location_ids: HashSet<&str> =
            self.locations.iter().map(|l| l.id.as_str()).collect();

        for location in &self.locations {
            location.validate(&self.school)?;
        }

        for course in &self.courses {
            course.validate(&self.school)?;
            if !location_ids.contains(course.location_id.as_str()) {
                return Err(SeedError::UnknownReference {
                    record: "course",
                    id: course.id.clone(),
                    target: "location",
                    reference: course.location_id.clone(),
                });
            }
        }

        for profile in &self.profiles {
            profile.validate(&self.school)?;
            if let Some(location_id) = &profile.location_id {
                if !location_ids.contains(location_id.as_str()) {
                    return Err(SeedError::UnknownReference {
                        record: "profile",
                        id: profile.id.clone(),
                        target: "location",
                        reference: location_id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Populate a fresh in-memory store with these records.
    #[must_use]
    pub fn into_store(self) -> MemoryStore {
        let store = MemoryStore::new(self.school);
        for location in self.locations {
            store.upsert_location(location);
        }
        for course in self.courses {
            store.upsert_course(course);
        }
        for profile in self.profiles {
            store.upsert_profile(profile);
        }
        store
    }

    /// Load, validate and build a store in one step.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` as per [`Self::from_file`] and [`Self::validate`].
    pub fn load_store(path: &Path) -> Result<MemoryStore, SeedError> {
        let data = Self::from_file(path)?;
        data.validate()?;

        tracing::info!(
            "Loaded seed: {} locations, {} courses, {} profiles for school '{}'",
            data.locations.len(),
            data.courses.len(),
            data.profiles.len(),
            data.school.name
        );
        for location in &data.locations {
            tracing::debug!(
                "Location '{}' offers {}-{} hours per day",
                location.name,
                location.rules.min_offered_hours(),
                location.rules.max_offered_hours()
            );
        }

        Ok(data.into_store())
    }
}
