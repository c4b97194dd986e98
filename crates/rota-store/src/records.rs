//! Persisted record types.
//!
//! One struct per document collection: [`School`], [`Location`], [`Course`],
//! [`Profile`] and [`Reservation`]. Calendars live inside the record that
//! owns them (`rules` fields); the allocation protocol only ever holds
//! transient copies during a single operation.

use crate::error::RecordError;
use rota_timetable::{HOURS_PER_DAY_MAX, Slot, WeekCalendar};
use serde::{Deserialize, Serialize};

/// Role attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// School administrator; may release other people's reservations
    Admin,
    /// Regular student
    Student,
    /// External organization account
    Org,
}

/// The school record: the single time origin every calendar is read against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    /// Document id
    pub id: String,

    /// Display name
    pub name: String,

    /// Hour slots per school day (bounded by the calendar bit width)
    pub hours_per_day: u32,

    /// First slot of the day, minutes after midnight
    pub start_minutes: u32,

    /// Length of one hour slot in minutes
    pub slot_minutes: u32,

    /// Names of the school days, index-aligned with every calendar
    pub days: Vec<String>,
}

impl School {
    /// Validate the school's time parameters.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidField` if any field is out of range.
    pub fn validate(&self) -> Result<(), RecordError> {
        let invalid = |field, reason: String| RecordError::InvalidField {
            record: "school",
            id: self.id.clone(),
            field,
            reason,
        };

        if !(1..=HOURS_PER_DAY_MAX).contains(&self.hours_per_day) {
            return Err(invalid(
                "hours_per_day",
                format!("must be between 1 and {HOURS_PER_DAY_MAX}"),
            ));
        }
        if self.slot_minutes == 0 || self.slot_minutes > 60 {
            return Err(invalid("slot_minutes", "must be between 1 and 60".to_string()));
        }
        if self.start_minutes >= 24 * 60 {
            return Err(invalid("start_minutes", "must be within a day".to_string()));
        }
        if self.days.is_empty() {
            return Err(invalid("days", "at least one school day required".to_string()));
        }

        Ok(())
    }

    /// Check that a calendar fits this school: no more days than configured
    /// and no bit past `hours_per_day`.
    pub(crate) fn check_calendar(
        &self,
        rules: &WeekCalendar,
        record: &'static str,
        id: &str,
    ) -> Result<(), RecordError> {
        if rules.day_count() > self.days.len() {
            return Err(RecordError::InvalidField {
                record,
                id: id.to_string(),
                field: "rules",
                reason: format!(
                    "{} days, school has {}",
                    rules.day_count(),
                    self.days.len()
                ),
            });
        }

        let width_mask = if self.hours_per_day == HOURS_PER_DAY_MAX {
            u32::MAX
        } else {
            (1 << self.hours_per_day) - 1
        };
        for (day, &mask) in rules.days().iter().enumerate() {
            if mask & !width_mask != 0 {
                return Err(RecordError::InvalidField {
                    record,
                    id: id.to_string(),
                    field: "rules",
                    reason: format!(
                        "day {day} uses hours past the school's {} per day",
                        self.hours_per_day
                    ),
                });
            }
        }

        Ok(())
    }
}

/// A physical location of the school, with its own opening hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Document id
    pub id: String,

    /// Display name
    pub name: String,

    /// Class names hosted at this location
    #[serde(default)]
    pub classes: Vec<String>,

    /// Opening-hours calendar; rarely mutated
    pub rules: WeekCalendar,
}

impl Location {
    /// Validate the location against its school.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidField` if the calendar does not fit the
    /// school's week.
    pub fn validate(&self, school: &School) -> Result<(), RecordError> {
        school.check_calendar(&self.rules, "location", &self.id)
    }
}

/// A bookable course offered at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Document id
    pub id: String,

    /// Location offering the course
    pub location_id: String,

    /// Display name
    pub name: String,

    /// Room label, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,

    /// Hours still accepting reservations; closed as capacity fills
    pub rules: WeekCalendar,

    /// Maximum concurrent reservations per slot
    pub limit: u32,

    /// Longest contiguous booking in hours; a course without one is not
    /// bookable yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<u32>,
}

impl Course {
    /// Validate the course against its school.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidField` on a zero limit, an oversized
    /// unit, or a calendar that does not fit the school's week.
    pub fn validate(&self, school: &School) -> Result<(), RecordError> {
        let invalid = |field, reason: String| RecordError::InvalidField {
            record: "course",
            id: self.id.clone(),
            field,
            reason,
        };

        if self.limit == 0 {
            return Err(invalid("limit", "must be at least 1".to_string()));
        }
        if let Some(unit) = self.unit {
            if unit == 0 || unit > school.hours_per_day {
                return Err(invalid(
                    "unit",
                    format!("must be between 1 and {}", school.hours_per_day),
                ));
            }
        }

        school.check_calendar(&self.rules, "course", &self.id)
    }
}

/// An enrolled individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Document id
    pub id: String,

    /// Display name
    pub name: String,

    /// Email the identity service resolves tokens to
    pub email: String,

    /// Role of this profile
    pub role: UserRole,

    /// Location the profile belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,

    /// Hours not yet committed elsewhere; absent until enrollment completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<WeekCalendar>,
}

impl Profile {
    /// Validate the profile against its school.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidField` on an empty email or a calendar
    /// that does not fit the school's week.
    pub fn validate(&self, school: &School) -> Result<(), RecordError> {
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(RecordError::InvalidField {
                record: "profile",
                id: self.id.clone(),
                field: "email",
                reason: "not an email address".to_string(),
            });
        }

        if let Some(rules) = &self.rules {
            school.check_calendar(rules, "profile", &self.id)?;
        }

        Ok(())
    }
}

/// A live reservation: one profile occupying one slot of one course.
///
/// Existence of this record is the single source of truth for occupancy;
/// counting live reservations for a (course, slot) pair yields the current
/// seat usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Document id
    pub id: String,

    /// Store-assigned admission order, strictly increasing per store.
    /// Capacity ties between racing subscribes are broken on this.
    pub seq: u64,

    /// Reserved course
    pub course_id: String,

    /// Owning profile
    pub profile_id: String,

    /// Reserved slot, persisted in its stable wire form
    pub slot: Slot,
}

/// Reservation contents as supplied by a caller; the store assigns the id
/// and the admission sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    /// Reserved course
    pub course_id: String,

    /// Owning profile
    pub profile_id: String,

    /// Reserved slot
    pub slot: Slot,
}
