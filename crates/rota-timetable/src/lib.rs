//! Weekly timetable algebra.
//!
//! This crate provides the pure data structures behind the rota reservation
//! service:
//! - `calendar`: per-day bitmask calendars and their set operations
//! - `slot`: the stable `"<day>:<start>,<end>"` slot key codec
//! - `segment`: partitioning a day mask into bookable runs
//!
//! A calendar is an ordered sequence of per-day `u32` masks where bit *h* set
//! means hour *h* of that day is open. Three calendars describe a school:
//! the location's opening hours, the hours a course still accepts
//! reservations for, and the hours an individual has not yet committed.
//! Intersecting them yields the actually bookable surface.
//!
//! # Example
//!
//! ```
//! use rota_timetable::{WeekCalendar, segment};
//!
//! // Monday open 08:00-12:00 (hours 0-3)
//! let location = WeekCalendar::from_days(vec![0b1111]);
//! let course = WeekCalendar::from_days(vec![0b0111]);
//!
//! let bookable = location.collide(&[&course]);
//! assert!(bookable.has_all(0, 0, 3));
//!
//! // Split into at-most-2-hour chunks
//! let runs = segment(bookable.day(0), 2);
//! assert_eq!(runs.len(), 2);
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod calendar;
pub mod error;
pub mod segment;
pub mod slot;

pub use calendar::{HOURS_PER_DAY_MAX, WeekCalendar};
pub use error::{TimetableError, TimetableResult};
pub use segment::{Run, segment};
pub use slot::Slot;
