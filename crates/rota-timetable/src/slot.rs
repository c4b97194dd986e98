//! Slot keys.
//!
//! A [`Slot`] identifies a (day, hour-range) pair as the stable ASCII string
//! `"<day>:<start>,<end>"`. The string is persisted verbatim on reservation
//! records and must keep round-tripping to the exact pair that produced it,
//! including a pair supplied in reversed order. Normalization to
//! `[min, max)` is the calendar's job, not the codec's.

use crate::calendar::HOURS_PER_DAY_MAX;
use crate::error::{TimetableError, TimetableResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A reservable (day, hour-range) pair and its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    day: u32,
    start: u32,
    end: u32,
}

impl Slot {
    /// Build a slot from a request-supplied day and hour pair.
    ///
    /// The pair must be exactly two values, each inside the calendar bit
    /// width. Order is preserved: `[5, 3]` is a valid (reversed) pair and
    /// survives the round trip as `[5, 3]`.
    ///
    /// # Errors
    ///
    /// Returns [`TimetableError::InvalidRange`] if the slice is not exactly
    /// two entries or any entry is negative or past the bit width.
    pub fn new(day: u32, hours: &[i64]) -> TimetableResult<Self> {
        let [start, end] = hours else {
            return Err(TimetableError::InvalidRange(format!(
                "expected 2 hours, got {}",
                hours.len()
            )));
        };

        let parse = |h: i64| -> TimetableResult<u32> {
            if (0..=i64::from(HOURS_PER_DAY_MAX)).contains(&h) {
                Ok(h as u32)
            } else {
                Err(TimetableError::InvalidRange(format!(
                    "hour {h} outside 0..={HOURS_PER_DAY_MAX}"
                )))
            }
        };

        Ok(Self {
            day,
            start: parse(*start)?,
            end: parse(*end)?,
        })
    }

    /// Day index, 0-based.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Hour pair exactly as supplied.
    #[must_use]
    pub const fn hours(&self) -> [u32; 2] {
        [self.start, self.end]
    }

    /// Hour pair as a normalized half-open `[start, end)` range.
    #[must_use]
    pub const fn normalized(&self) -> (u32, u32) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Render the hour pair as wall-clock times, `"HH:MM - HH:MM"`.
    ///
    /// `start_minutes` is the school day's first slot as minutes after
    /// midnight; `slot_minutes` is the length of one hour slot. Rendering
    /// follows the supplied hour order, matching the key itself.
    #[must_use]
    pub fn clock_range(&self, start_minutes: u32, slot_minutes: u32) -> String {
        let at = |hour: u32| {
            let total = (start_minutes + hour * slot_minutes) % (24 * 60);
            format!("{:02}:{:02}", total / 60, total % 60)
        };
        format!("{} - {}", at(self.start), at(self.end))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{}", self.day, self.start, self.end)
    }
}

impl FromStr for Slot {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimetableError::MalformedKey(s.to_string());

        let (day, hours) = s.split_once(':').ok_or_else(malformed)?;
        let (start, end) = hours.split_once(',').ok_or_else(malformed)?;

        Ok(Self {
            day: day.parse().map_err(|_| malformed())?,
            start: start.parse().map_err(|_| malformed())?,
            end: end.parse().map_err(|_| malformed())?,
        })
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode() {
        let slot = Slot::new(3, &[2, 4]).unwrap();
        assert_eq!(slot.to_string(), "3:2,4");
        assert_eq!(slot.day(), 3);
        assert_eq!(slot.hours(), [2, 4]);
    }

    #[test]
    fn test_encode_rejects_wrong_arity() {
        assert!(matches!(
            Slot::new(0, &[1]),
            Err(TimetableError::InvalidRange(_))
        ));
        assert!(matches!(
            Slot::new(0, &[1, 2, 3]),
            Err(TimetableError::InvalidRange(_))
        ));
        assert!(matches!(
            Slot::new(0, &[]),
            Err(TimetableError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_encode_rejects_out_of_width_hours() {
        assert!(Slot::new(0, &[-1, 2]).is_err());
        assert!(Slot::new(0, &[0, 33]).is_err());
        // The day-end boundary itself is a valid exclusive bound
        assert!(Slot::new(0, &[30, 32]).is_ok());
    }

    #[test]
    fn test_decode() {
        let slot: Slot = "3:2,4".parse().unwrap();
        assert_eq!(slot, Slot::new(3, &[2, 4]).unwrap());
    }

    #[test]
    fn test_decode_rejects_malformed_keys() {
        for raw in ["", "3", "3:2", "3:2,4,5", "a:2,4", "3:b,4", "3:2,c", "3 :2,4", "3:2, 4"] {
            let err = raw.parse::<Slot>().unwrap_err();
            assert!(
                matches!(err, TimetableError::MalformedKey(_)),
                "expected MalformedKey for {raw:?}"
            );
        }
    }

    #[test]
    fn test_round_trip_preserves_reversed_pairs() {
        let slot = Slot::new(1, &[4, 2]).unwrap();
        assert_eq!(slot.to_string(), "1:4,2");

        let back: Slot = slot.to_string().parse().unwrap();
        assert_eq!(back, slot);
        assert_eq!(back.hours(), [4, 2]);
        assert_eq!(back.normalized(), (2, 4));
    }

    #[test]
    fn test_serde_as_string() {
        let slot = Slot::new(2, &[0, 2]).unwrap();
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "\"2:0,2\"");

        let back: Slot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);

        assert!(serde_json::from_str::<Slot>("\"2:0\"").is_err());
    }

    #[test]
    fn test_round_trip_law() {
        for day in 0..14 {
            for start in 0..=32 {
                for end in 0..=32 {
                    let slot = Slot::new(day, &[start, end]).unwrap();
                    let back: Slot = slot.to_string().parse().unwrap();
                    assert_eq!(back, slot);
                }
            }
        }
    }

    #[test]
    fn test_clock_range() {
        // School day starts 08:00, one slot = 60 minutes
        let slot = Slot::new(0, &[1, 3]).unwrap();
        assert_eq!(slot.clock_range(8 * 60, 60), "09:00 - 11:00");

        // 50-minute slots starting 08:30
        assert_eq!(slot.clock_range(8 * 60 + 30, 50), "09:20 - 11:00");

        // Reversed pairs render in supplied order
        let slot = Slot::new(0, &[3, 1]).unwrap();
        assert_eq!(slot.clock_range(8 * 60, 60), "11:00 - 09:00");
    }
}
