//! The store interface the allocation protocol is written against.
//!
//! Implementations must be `Send + Sync`; every call is a short-lived
//! request against shared storage and may run concurrently with any other.
//! Reads used for pre-validation may be stale; the reservation insert, the
//! listing and the count aggregates are the authoritative operations and
//! must be linearizable with each other (see `insert_reservation`).

use crate::error::StoreResult;
use crate::records::{Course, Location, NewReservation, Profile, Reservation, School};
use async_trait::async_trait;
use rota_timetable::{Slot, WeekCalendar};

/// Async document store used by the allocation protocol.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The school record this store serves.
    async fn school(&self) -> StoreResult<School>;

    /// Point read of a location by id.
    async fn location(&self, id: &str) -> StoreResult<Option<Location>>;

    /// Point read of a course by id.
    async fn course(&self, id: &str) -> StoreResult<Option<Course>>;

    /// Courses offered at a location.
    async fn courses_for_location(&self, location_id: &str) -> StoreResult<Vec<Course>>;

    /// Point read of a profile by id.
    async fn profile(&self, id: &str) -> StoreResult<Option<Profile>>;

    /// First profile whose email matches, if any.
    async fn profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>>;

    /// Merge-write a course's calendar. Last writer wins.
    async fn merge_course_rules(&self, course_id: &str, rules: &WeekCalendar) -> StoreResult<()>;

    /// Merge-write a profile's calendar. Last writer wins.
    async fn merge_profile_rules(&self, profile_id: &str, rules: &WeekCalendar) -> StoreResult<()>;

    /// Persist a reservation, assigning its id and admission sequence.
    ///
    /// The sequence must be strictly increasing in insertion order, and an
    /// insert must be visible to every later `reservations_for_course_slot`
    /// call: the capacity tie-break depends on a racer seeing all
    /// earlier-admitted reservations when it lists after its own insert.
    async fn insert_reservation(&self, new: NewReservation) -> StoreResult<Reservation>;

    /// Point read of a reservation by id.
    async fn reservation(&self, id: &str) -> StoreResult<Option<Reservation>>;

    /// Delete a reservation. Returns whether it was present.
    async fn delete_reservation(&self, id: &str) -> StoreResult<bool>;

    /// Live reservations for a (course, slot) pair.
    async fn reservations_for_course_slot(
        &self,
        course_id: &str,
        slot: &Slot,
    ) -> StoreResult<Vec<Reservation>>;

    /// Count-only occupancy aggregate for a (course, slot) pair.
    async fn count_course_slot(&self, course_id: &str, slot: &Slot) -> StoreResult<u64>;

    /// Live reservations a profile holds at a slot, across courses.
    async fn count_profile_slot(&self, profile_id: &str, slot: &Slot) -> StoreResult<u64>;
}
