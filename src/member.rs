use crate::time::{Cell, Day, CELLS, SLOTS_PER_DAY};
use core::fmt;
use log::warn;
use std::convert::TryFrom;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum ScheduleParseError {
    #[error("Unsupported length of schedule. Expected {expected}, got {found}")]
    UnsupportedLength { expected: usize, found: usize },
    #[error("Invalid schedule character {found:?} at position {position}")]
    InvalidCharacter { position: usize, found: char },
}

/// A member's free hours across the week, one flag per grid cell.
/// Serialized as 133 '0'/'1' characters, day-major.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct WeeklyAvailability {
    cells: [bool; CELLS],
}

impl Default for WeeklyAvailability {
    fn default() -> Self {
        WeeklyAvailability::closed()
    }
}

impl WeeklyAvailability {
    /// Free at no time at all
    pub fn closed() -> WeeklyAvailability {
        WeeklyAvailability {
            cells: [false; CELLS],
        }
    }

    /// Free at every slot of the week
    pub fn all_open() -> WeeklyAvailability {
        WeeklyAvailability {
            cells: [true; CELLS],
        }
    }

    /// Reads a serialized schedule without failing.
    /// Any string that is not exactly 133 characters long means the member is
    /// never free. Within a correctly sized string only '1' marks a free slot.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::member::WeeklyAvailability;
    /// use treffpunkt_libs::time::Day;
    ///
    /// let partial = WeeklyAvailability::parse_lenient("1111");
    /// assert_eq!(partial, WeeklyAvailability::closed());
    ///
    /// let monday_morning = format!("1{}", "0".repeat(132));
    /// let availability = WeeklyAvailability::parse_lenient(&monday_morning);
    /// assert!(availability.is_free(Day::Monday, 0));
    /// assert!(!availability.is_free(Day::Monday, 1));
    /// ```
    pub fn parse_lenient(serialized: &str) -> WeeklyAvailability {
        let length = serialized.chars().count();
        if length != CELLS {
            warn!(
                "Ignoring schedule of length {}, expected {}",
                length, CELLS
            );
            return WeeklyAvailability::closed();
        }

        let mut availability = WeeklyAvailability::closed();
        for (cell, c) in availability.cells.iter_mut().zip(serialized.chars()) {
            *cell = c == '1';
        }

        availability
    }

    pub fn is_free(&self, day: Day, slot: usize) -> bool {
        slot < SLOTS_PER_DAY && self.cells[Cell::new(day, slot).flat()]
    }

    /// Marks a slot free or busy. Slots past the end of the day are ignored.
    pub fn set(&mut self, day: Day, slot: usize, free: bool) {
        if slot < SLOTS_PER_DAY {
            self.cells[Cell::new(day, slot).flat()] = free;
        }
    }

    /// Cells in day-major order
    pub fn cells(&self) -> impl Iterator<Item = (Cell, bool)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(position, &free)| Cell::from_flat(position).map(|cell| (cell, free)))
    }
}

impl FromStr for WeeklyAvailability {
    type Err = ScheduleParseError;

    /// Strict counterpart of [`WeeklyAvailability::parse_lenient`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = s.chars().count();
        if found != CELLS {
            return Err(ScheduleParseError::UnsupportedLength {
                expected: CELLS,
                found,
            });
        }

        let mut availability = WeeklyAvailability::closed();
        for (position, (cell, c)) in availability.cells.iter_mut().zip(s.chars()).enumerate() {
            *cell = match c {
                '1' => true,
                '0' => false,
                found => return Err(ScheduleParseError::InvalidCharacter { position, found }),
            };
        }

        Ok(availability)
    }
}

impl TryFrom<String> for WeeklyAvailability {
    type Error = ScheduleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for WeeklyAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &free in self.cells.iter() {
            f.write_str(if free { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl From<WeeklyAvailability> for String {
    fn from(availability: WeeklyAvailability) -> Self {
        availability.to_string()
    }
}

/// A group member as handed over by the preference collection
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    #[cfg_attr(feature = "serde", serde(alias = "memberId"))]
    pub id: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "serializedSchedule")
    )]
    pub schedule: Option<String>,
}

impl Member {
    pub fn new(id: &str, schedule: Option<String>) -> Member {
        Member {
            id: id.to_string(),
            schedule,
        }
    }

    /// Member with an already decoded availability
    pub fn with_availability(id: &str, availability: &WeeklyAvailability) -> Member {
        Member::new(id, Some(availability.to_string()))
    }

    /// The member's availability. A missing or malformed schedule reads as
    /// never free.
    pub fn availability(&self) -> WeeklyAvailability {
        match &self.schedule {
            Some(schedule) => WeeklyAvailability::parse_lenient(schedule),
            None => {
                warn!("Member {} has no schedule", self.id);
                WeeklyAvailability::closed()
            }
        }
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Member {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let id = u.arbitrary::<uuid::Uuid>()?.to_string();
        let schedule = if u.ratio(1, 16)? {
            None
        } else if u.ratio(1, 16)? {
            Some(u.arbitrary::<String>()?)
        } else {
            let mut availability = WeeklyAvailability::closed();
            // Bias toward free slots so unanimous blocks actually show up
            for cell in availability.cells.iter_mut() {
                *cell = !u.ratio(1, 8)?;
            }
            Some(availability.to_string())
        };

        Ok(Member { id, schedule })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_rejects_bad_input() {
        assert_eq!(
            "01".parse::<WeeklyAvailability>(),
            Err(ScheduleParseError::UnsupportedLength {
                expected: 133,
                found: 2
            })
        );

        let mut bad = "1".repeat(132);
        bad.insert(40, 'x');
        assert_eq!(
            bad.parse::<WeeklyAvailability>(),
            Err(ScheduleParseError::InvalidCharacter {
                position: 40,
                found: 'x'
            })
        );
    }

    #[test]
    fn serialization_round_trips() {
        let mut availability = WeeklyAvailability::closed();
        availability.set(Day::Monday, 0, true);
        availability.set(Day::Sunday, 18, true);
        availability.set(Day::Sunday, 19, true);

        let serialized = availability.to_string();
        assert_eq!(serialized.len(), 133);
        assert!(serialized.starts_with('1'));
        assert!(serialized.ends_with('1'));
        assert_eq!(serialized.matches('1').count(), 2);
        assert_eq!(serialized.parse(), Ok(availability));
    }

    #[test]
    fn lenient_parse_only_counts_ones() {
        let schedule = format!("1x{}", "1".repeat(131));
        let availability = WeeklyAvailability::parse_lenient(&schedule);

        assert!(availability.is_free(Day::Monday, 0));
        assert!(!availability.is_free(Day::Monday, 1));
        assert!(availability.is_free(Day::Monday, 2));
    }

    #[test]
    fn lenient_length_counts_characters() {
        // 132 characters in 133 bytes
        let short = format!("é{}", "1".repeat(131));
        assert_eq!(
            WeeklyAvailability::parse_lenient(&short),
            WeeklyAvailability::closed()
        );

        // 133 characters in 134 bytes
        let exact = format!("é{}", "1".repeat(132));
        let availability = WeeklyAvailability::parse_lenient(&exact);
        assert!(!availability.is_free(Day::Monday, 0));
        assert!(availability.is_free(Day::Monday, 1));
        assert!(availability.is_free(Day::Sunday, 18));
    }

    #[test]
    fn missing_schedule_is_never_free() {
        let member = Member::new("absent", None);
        assert_eq!(member.availability(), WeeklyAvailability::closed());
    }
}
