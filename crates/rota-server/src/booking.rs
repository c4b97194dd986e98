//! The allocation protocol.
//!
//! [`BookingService`] validates a requested reservation against the
//! intersection of three independently owned calendars — the location's
//! opening hours, the course's still-open hours and the caller's personal
//! timetable — then persists the reservation and closes the reserved hours
//! on the course (when capacity fills) and on the profile. Release reverses
//! both, re-opening hours as occupancy drops back below the limit.
//!
//! Calendar reads before the reservation write are best-effort and may be
//! stale. The authoritative capacity decision happens after the write: the
//! racer re-ranks the live reservations by store admission order and
//! withdraws its own write when it ranks past the course limit, so at most
//! `limit` reservations stay live for any (course, slot) pair. Writes are
//! ordered reservation-first; a crash before the calendar updates leaves a
//! reservation the next re-rank accounts for, never a silently shrunk
//! calendar.

use crate::auth::TokenVerifier;
use crate::error::BookingError;
use rota_store::{Course, DocumentStore, NewReservation, Profile, UserRole};
use rota_timetable::{Slot, WeekCalendar, segment};
use std::sync::Arc;

/// One bookable run of a course's location, rendered for the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SlotAvailability {
    /// Hour pair of the run
    pub hours: [u32; 2],
    /// Stable slot key for this run
    pub key: String,
    /// Wall-clock rendering, `"HH:MM - HH:MM"`
    pub time: String,
    /// Whether the course still accepts reservations for the whole run
    pub open: bool,
}

/// The subscribe/unsubscribe orchestrator.
///
/// Cheap to clone; clones share the underlying store and verifier.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn DocumentStore>,
    verifier: Arc<dyn TokenVerifier>,
}

impl BookingService {
    /// Create a service over an injected store and verifier.
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }

    /// The store this service operates on.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Resolve a token to its profile.
    async fn caller(&self, token: &str) -> Result<Profile, BookingError> {
        let identity = self
            .verifier
            .verify(token)
            .await
            .ok_or(BookingError::Unauthorized)?;
        self.store
            .profile_by_email(&identity.email)
            .await?
            .ok_or(BookingError::ProfileMissing)
    }

    /// Reserve `hours` of `day` on a course for the caller.
    ///
    /// Returns the caller's updated timetable.
    ///
    /// # Errors
    ///
    /// Any [`BookingError`] of the subscribe taxonomy; no writes are made
    /// before every validation gate has passed, and a capacity loss after
    /// the reservation write withdraws that write again.
    pub async fn subscribe(
        &self,
        token: &str,
        day: i64,
        hours: &[i64],
        course_id: &str,
    ) -> Result<WeekCalendar, BookingError> {
        // Gate 1: caller must resolve to an enrolled profile with a timetable
        let profile = self.caller(token).await?;
        let mut profile_rules = profile
            .rules
            .clone()
            .ok_or(BookingError::ProfileIncomplete)?;

        // Gate 2: course must exist and declare a booking unit
        let course = self
            .store
            .course(course_id)
            .await?
            .ok_or_else(|| BookingError::CourseNotFound(course_id.to_string()))?;
        let unit = course.unit.ok_or(BookingError::CourseMisconfigured)?;

        // Gate 3: the caller's location owns the opening hours
        let location = match &profile.location_id {
            Some(id) => self.store.location(id).await?,
            None => None,
        }
        .ok_or(BookingError::LocationNotFound)?;

        // Gate 4: the request itself must be well-formed
        let day_index = u32::try_from(day)
            .map_err(|_| BookingError::InvalidRange(format!("day {day} is not a day index")))?;
        let slot = Slot::new(day_index, hours)?;
        let (start, end) = slot.normalized();
        let day = day_index as usize;

        // Gate 5: the range must be one of the location's bookable runs for
        // this course's unit. Deliberately independent of gate 6: the two
        // gates surface distinct codes callers branch on.
        let offered = segment(location.rules.day(day), unit)
            .iter()
            .any(|run| (run.start, run.end) == (start, end));
        if !offered {
            return Err(BookingError::SlotNotOffered);
        }

        // Gate 6: no commitment may already consume part of the range
        let merged = location.rules.collide(&[&course.rules, &profile_rules]);
        if !merged.has_all(day, start, end) {
            return Err(BookingError::SlotConflict);
        }

        // Durability point: the reservation is the source of truth from here
        let reservation = self
            .store
            .insert_reservation(NewReservation {
                course_id: course.id.clone(),
                profile_id: profile.id.clone(),
                slot,
            })
            .await?;

        // Authoritative capacity check. Rank among live peers by admission
        // order; the pre-gates may have raced.
        let peers = self
            .store
            .reservations_for_course_slot(&course.id, &slot)
            .await?;
        let rank = peers.iter().filter(|r| r.seq < reservation.seq).count() as u64 + 1;
        if rank > u64::from(course.limit) {
            tracing::info!(
                "Reservation {} for {slot} lost the race for the last seat, withdrawing",
                reservation.id
            );
            self.store.delete_reservation(&reservation.id).await?;
            return Err(BookingError::CourseFull);
        }

        if peers.len() as u64 >= u64::from(course.limit) {
            // Capacity exhausted: stop offering this range to anyone else
            let mut course_rules = course.rules.clone();
            course_rules.clear_range(day, start, end);
            self.store
                .merge_course_rules(&course.id, &course_rules)
                .await?;
            tracing::debug!("Course {} closed {slot} at capacity {}", course.id, course.limit);
        }

        // The caller cannot double-book this time
        profile_rules.clear_range(day, start, end);
        self.store
            .merge_profile_rules(&profile.id, &profile_rules)
            .await?;

        tracing::info!(
            "Reserved {slot} of course {} for profile {} ({})",
            course.id,
            profile.id,
            reservation.id
        );

        Ok(profile_rules)
    }

    /// Release a reservation on behalf of its owner. Admin-only.
    ///
    /// # Errors
    ///
    /// Any [`BookingError`] of the unsubscribe taxonomy.
    pub async fn unsubscribe(
        &self,
        token: &str,
        subscription_id: &str,
    ) -> Result<(), BookingError> {
        // Only admins may release other people's reservations; an
        // unresolvable caller and a non-admin caller read the same.
        let identity = self
            .verifier
            .verify(token)
            .await
            .ok_or(BookingError::Unauthorized)?;
        let caller = self
            .store
            .profile_by_email(&identity.email)
            .await?
            .ok_or(BookingError::Unauthorized)?;
        if caller.role != UserRole::Admin {
            return Err(BookingError::Unauthorized);
        }

        let reservation = self
            .store
            .reservation(subscription_id)
            .await?
            .ok_or_else(|| BookingError::ReservationNotFound(subscription_id.to_string()))?;

        let owner = self
            .store
            .profile(&reservation.profile_id)
            .await?
            .ok_or(BookingError::ReservationOwnerMissing)?;
        if owner.role == UserRole::Admin {
            return Err(BookingError::CannotModifyAdmin);
        }
        let mut owner_rules = owner.rules.clone().ok_or(BookingError::OwnerRulesMissing)?;

        let course = self
            .store
            .course(&reservation.course_id)
            .await?
            .ok_or_else(|| BookingError::CourseNotFound(reservation.course_id.clone()))?;

        let slot = reservation.slot;
        let (start, end) = slot.normalized();
        let day = slot.day() as usize;

        // Freed capacity becomes bookable again, judged before the delete
        let count = self.store.count_course_slot(&course.id, &slot).await?;
        if count.saturating_sub(1) < u64::from(course.limit) {
            let mut course_rules = course.rules.clone();
            course_rules.set_range(day, start, end);
            self.store
                .merge_course_rules(&course.id, &course_rules)
                .await?;
        }

        // Durability point for the release
        self.store.delete_reservation(&reservation.id).await?;

        // A person should never hold two reservations at the same time, but
        // the re-open is guarded on a re-count all the same.
        let still_held = self.store.count_profile_slot(&owner.id, &slot).await?;
        if still_held == 0 {
            owner_rules.set_range(day, start, end);
            self.store
                .merge_profile_rules(&owner.id, &owner_rules)
                .await?;
        }

        tracing::info!(
            "Released {slot} of course {} held by profile {}",
            course.id,
            owner.id
        );

        Ok(())
    }

    /// Courses offered at a location.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Store` on store failure.
    pub async fn courses(&self, location_id: &str) -> Result<Vec<Course>, BookingError> {
        Ok(self.store.courses_for_location(location_id).await?)
    }

    /// The bookable runs a course's location offers on `day`.
    ///
    /// Runs come from the location calendar segmented by the course's unit
    /// (the same view subscribe's offer gate uses); `open` additionally
    /// reports whether the course calendar still accepts the whole run.
    ///
    /// # Errors
    ///
    /// `CourseNotFound`, `CourseMisconfigured`, `LocationNotFound`,
    /// `InvalidRange` or `Store`.
    pub async fn course_slots(
        &self,
        course_id: &str,
        day: i64,
    ) -> Result<Vec<SlotAvailability>, BookingError> {
        let course = self
            .store
            .course(course_id)
            .await?
            .ok_or_else(|| BookingError::CourseNotFound(course_id.to_string()))?;
        let unit = course.unit.ok_or(BookingError::CourseMisconfigured)?;

        let location = self
            .store
            .location(&course.location_id)
            .await?
            .ok_or(BookingError::LocationNotFound)?;

        let day_index = u32::try_from(day)
            .map_err(|_| BookingError::InvalidRange(format!("day {day} is not a day index")))?;
        let school = self.store.school().await?;

        let runs = segment(location.rules.day(day_index as usize), unit);
        let slots = runs
            .iter()
            .map(|run| {
                let slot = Slot::new(day_index, &[i64::from(run.start), i64::from(run.end)])?;
                Ok(SlotAvailability {
                    hours: run.hours(),
                    key: slot.to_string(),
                    time: slot.clock_range(school.start_minutes, school.slot_minutes),
                    open: course
                        .rules
                        .has_all(day_index as usize, run.start, run.end),
                })
            })
            .collect::<Result<Vec<_>, BookingError>>()?;

        Ok(slots)
    }
}
