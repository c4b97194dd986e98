//! Per-day bitmask calendars.
//!
//! A [`WeekCalendar`] is an ordered list of `u32` masks, one per day of the
//! school week (index 0 = first configured day). Bit *h* of a day mask set
//! means hour *h* is open on that day. Unused high bits stay zero; the bit
//! width bounds the hours a school may configure per day.
//!
//! All range entry points take a half-open `[a, b)` hour pair and accept it
//! in either order: `(2, 5)` and `(5, 2)` address the same three hours. The
//! pair is normalized to `[min, max)` before any bit is touched.

use serde::{Deserialize, Serialize};

/// Upper bound on configurable hours per day, fixed by the mask bit width.
pub const HOURS_PER_DAY_MAX: u32 = 32;

/// Bit mask covering the normalized half-open hour range `[a, b)`.
///
/// Hours past the mask width are clamped; an empty range yields zero.
fn range_mask(a: u32, b: u32) -> u32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let lo = lo.min(HOURS_PER_DAY_MAX);
    let hi = hi.min(HOURS_PER_DAY_MAX);
    if lo == hi {
        return 0;
    }
    let width = hi - lo;
    (((1u64 << width) - 1) << lo) as u32
}

/// A week of per-day open-hour masks.
///
/// Serializes as a bare JSON array of integers, the `rules` field of the
/// persisted records and of the wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekCalendar {
    days: Vec<u32>,
}

impl WeekCalendar {
    /// Create an empty calendar with no days.
    #[must_use]
    pub const fn new() -> Self {
        Self { days: Vec::new() }
    }

    /// Create a calendar from raw per-day masks.
    #[must_use]
    pub fn from_days(days: Vec<u32>) -> Self {
        Self { days }
    }

    /// Create a calendar with every hour of every day open.
    ///
    /// This is the calendar a profile starts with at enrollment: nothing
    /// committed yet.
    #[must_use]
    pub fn open_week(day_count: usize, hours_per_day: u32) -> Self {
        let mask = range_mask(0, hours_per_day);
        Self {
            days: vec![mask; day_count],
        }
    }

    /// Number of days carried by this calendar.
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Raw per-day masks.
    #[must_use]
    pub fn days(&self) -> &[u32] {
        &self.days
    }

    /// Consume the calendar, returning the raw per-day masks.
    #[must_use]
    pub fn into_days(self) -> Vec<u32> {
        self.days
    }

    /// Mask of the given day. A day the calendar does not carry reads as
    /// fully closed, never as an error.
    #[must_use]
    pub fn day(&self, day: usize) -> u32 {
        self.days.get(day).copied().unwrap_or(0)
    }

    /// Whether hour `hour` of day `day` is open.
    #[must_use]
    pub fn hour(&self, day: usize, hour: u32) -> bool {
        if hour >= HOURS_PER_DAY_MAX {
            return false;
        }
        self.day(day) & (1 << hour) != 0
    }

    /// Whether every hour of `[a, b)` on `day` is open. An empty range is
    /// vacuously satisfied.
    #[must_use]
    pub fn has_all(&self, day: usize, a: u32, b: u32) -> bool {
        let mask = range_mask(a, b);
        self.day(day) & mask == mask
    }

    /// Whether any hour of any day is open.
    ///
    /// The fast "still offers anything at all" check used before looking at
    /// individual days.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.days.iter().fold(0, |acc, mask| acc | mask) != 0
    }

    /// Open every hour of `[a, b)` on `day`, growing the calendar with
    /// closed days if `day` is not yet carried.
    pub fn set_range(&mut self, day: usize, a: u32, b: u32) {
        self.apply(day, range_mask(a, b), |mask, range| mask | range);
    }

    /// Close every hour of `[a, b)` on `day`.
    pub fn clear_range(&mut self, day: usize, a: u32, b: u32) {
        self.apply(day, range_mask(a, b), |mask, range| mask & !range);
    }

    /// Flip every hour of `[a, b)` on `day`.
    pub fn toggle_range(&mut self, day: usize, a: u32, b: u32) {
        self.apply(day, range_mask(a, b), |mask, range| mask ^ range);
    }

    fn apply(&mut self, day: usize, range: u32, op: impl Fn(u32, u32) -> u32) {
        if day >= self.days.len() {
            self.days.resize(day + 1, 0);
        }
        self.days[day] = op(self.days[day], range);
    }

    /// Elementwise intersection with `others`: the hours open in all inputs
    /// simultaneously.
    ///
    /// Day-aligned; inputs of unequal day count are right-padded with closed
    /// days, so a day missing from any input is closed in the result.
    #[must_use]
    pub fn collide(&self, others: &[&Self]) -> Self {
        let day_count = others
            .iter()
            .map(|c| c.day_count())
            .fold(self.day_count(), usize::max);

        let days = (0..day_count)
            .map(|d| others.iter().fold(self.day(d), |acc, c| acc & c.day(d)))
            .collect();

        Self { days }
    }

    /// Hours offered on `day`, computed as `floor(log2(mask + 1))`.
    ///
    /// This is the dense-low-run magnitude, not a popcount: it assumes open
    /// hours fill contiguously from hour 0, and a gap-then-open mask
    /// undercounts. Persisted data and existing callers depend on this exact
    /// reading, so it is preserved as-is.
    #[must_use]
    pub fn offered_hours(&self, day: usize) -> u32 {
        (u64::from(self.day(day)) + 1).ilog2()
    }

    /// Largest [`Self::offered_hours`] across the week.
    #[must_use]
    pub fn max_offered_hours(&self) -> u32 {
        (0..self.day_count())
            .map(|d| self.offered_hours(d))
            .max()
            .unwrap_or(0)
    }

    /// Smallest [`Self::offered_hours`] across the week.
    #[must_use]
    pub fn min_offered_hours(&self) -> u32 {
        (0..self.day_count())
            .map(|d| self.offered_hours(d))
            .min()
            .unwrap_or(0)
    }
}
