//! In-memory document store.
//!
//! Backs the test suites and single-node deployments. Entity collections use
//! `DashMap` for concurrent access; the reservation table sits behind a
//! single `parking_lot::RwLock` so an insert (admission counter bump plus
//! row insert) and a listing are each atomic, which is the visibility
//! guarantee [`crate::DocumentStore::insert_reservation`] requires.

use crate::error::{StoreError, StoreResult};
use crate::records::{Course, Location, NewReservation, Profile, Reservation, School};
use crate::traits::DocumentStore;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use rand::RngExt;
use rand::distr::Alphanumeric;
use rota_timetable::{Slot, WeekCalendar};
use std::collections::HashMap;

/// Length of generated reservation ids.
const RESERVATION_ID_LEN: usize = 20;

#[derive(Debug, Default)]
struct ReservationTable {
    next_seq: u64,
    rows: HashMap<String, Reservation>,
}

/// Thread-safe in-memory [`DocumentStore`].
#[derive(Debug)]
pub struct MemoryStore {
    school: School,
    locations: DashMap<String, Location>,
    courses: DashMap<String, Course>,
    profiles: DashMap<String, Profile>,
    reservations: RwLock<ReservationTable>,
}

impl MemoryStore {
    /// Create an empty store serving the given school.
    #[must_use]
    pub fn new(school: School) -> Self {
        Self {
            school,
            locations: DashMap::new(),
            courses: DashMap::new(),
            profiles: DashMap::new(),
            reservations: RwLock::new(ReservationTable::default()),
        }
    }

    /// Insert or replace a location.
    pub fn upsert_location(&self, location: Location) {
        self.locations.insert(location.id.clone(), location);
    }

    /// Insert or replace a course.
    pub fn upsert_course(&self, course: Course) {
        self.courses.insert(course.id.clone(), course);
    }

    /// Insert or replace a profile.
    pub fn upsert_profile(&self, profile: Profile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    /// Number of live reservations, across all courses.
    #[must_use]
    pub fn reservation_count(&self) -> usize {
        self.reservations.read().rows.len()
    }

    fn generate_id(rows: &HashMap<String, Reservation>) -> String {
        loop {
            let id: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(RESERVATION_ID_LEN)
                .map(char::from)
                .collect();
            if !rows.contains_key(&id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn school(&self) -> StoreResult<School> {
        Ok(self.school.clone())
    }

    async fn location(&self, id: &str) -> StoreResult<Option<Location>> {
        Ok(self.locations.get(id).map(|entry| entry.clone()))
    }

    async fn course(&self, id: &str) -> StoreResult<Option<Course>> {
        Ok(self.courses.get(id).map(|entry| entry.clone()))
    }

    async fn courses_for_location(&self, location_id: &str) -> StoreResult<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .courses
            .iter()
            .filter(|entry| entry.location_id == location_id)
            .map(|entry| entry.clone())
            .collect();
        courses.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(courses)
    }

    async fn profile(&self, id: &str) -> StoreResult<Option<Profile>> {
        Ok(self.profiles.get(id).map(|entry| entry.clone()))
    }

    async fn profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>> {
        Ok(self
            .profiles
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.clone()))
    }

    async fn merge_course_rules(&self, course_id: &str, rules: &WeekCalendar) -> StoreResult<()> {
        let mut course = self
            .courses
            .get_mut(course_id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "courses",
                id: course_id.to_string(),
            })?;
        course.rules = rules.clone();
        Ok(())
    }

    async fn merge_profile_rules(&self, profile_id: &str, rules: &WeekCalendar) -> StoreResult<()> {
        let mut profile = self
            .profiles
            .get_mut(profile_id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "profiles",
                id: profile_id.to_string(),
            })?;
        profile.rules = Some(rules.clone());
        Ok(())
    }

    async fn insert_reservation(&self, new: NewReservation) -> StoreResult<Reservation> {
        let mut table = self.reservations.write();
        table.next_seq += 1;

        let reservation = Reservation {
            id: Self::generate_id(&table.rows),
            seq: table.next_seq,
            course_id: new.course_id,
            profile_id: new.profile_id,
            slot: new.slot,
        };
        table
            .rows
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn reservation(&self, id: &str) -> StoreResult<Option<Reservation>> {
        Ok(self.reservations.read().rows.get(id).cloned())
    }

    async fn delete_reservation(&self, id: &str) -> StoreResult<bool> {
        Ok(self.reservations.write().rows.remove(id).is_some())
    }

    async fn reservations_for_course_slot(
        &self,
        course_id: &str,
        slot: &Slot,
    ) -> StoreResult<Vec<Reservation>> {
        let table = self.reservations.read();
        let mut matches: Vec<Reservation> = table
            .rows
            .values()
            .filter(|r| r.course_id == course_id && r.slot == *slot)
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.seq);
        Ok(matches)
    }

    async fn count_course_slot(&self, course_id: &str, slot: &Slot) -> StoreResult<u64> {
        let table = self.reservations.read();
        Ok(table
            .rows
            .values()
            .filter(|r| r.course_id == course_id && r.slot == *slot)
            .count() as u64)
    }

    async fn count_profile_slot(&self, profile_id: &str, slot: &Slot) -> StoreResult<u64> {
        let table = self.reservations.read();
        Ok(table
            .rows
            .values()
            .filter(|r| r.profile_id == profile_id && r.slot == *slot)
            .count() as u64)
    }
}
