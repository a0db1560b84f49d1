use core::fmt;
use num::Integer;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Days in the weekly grid
pub const DAYS: usize = 7;
/// Hourly slots in a single day, 05:00 through midnight
pub const SLOTS_PER_DAY: usize = 19;
/// Wall clock hour at which slot 0 starts
pub const FIRST_HOUR: u8 = 5;
/// Number of consecutive slots a meeting occupies
pub const BLOCK_LEN: usize = 2;
/// Total cells of the weekly grid
pub const CELLS: usize = DAYS * SLOTS_PER_DAY;

/// Day of the week, Monday first.
/// The discriminant is the internal row index of every weekly grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; DAYS] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Looks up a day by its internal, Monday first, index
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::time::Day;
    ///
    /// assert_eq!(Day::from_index(0), Some(Day::Monday));
    /// assert_eq!(Day::from_index(6), Some(Day::Sunday));
    /// assert_eq!(Day::from_index(7), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Day> {
        Day::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// English name of the day
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single (day, slot) cell of the weekly grid
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub day: Day,
    pub slot: usize,
}

impl Cell {
    pub fn new(day: Day, slot: usize) -> Cell {
        Cell { day, slot }
    }

    /// Position of this cell in a day-major scan
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::time::{Cell, Day};
    ///
    /// assert_eq!(Cell::new(Day::Monday, 0).flat(), 0);
    /// assert_eq!(Cell::new(Day::Tuesday, 1).flat(), 20);
    /// ```
    pub fn flat(self) -> usize {
        self.day.index() * SLOTS_PER_DAY + self.slot
    }

    /// Inverse of [`Cell::flat`]. `None` once the scan runs off the grid.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::time::{Cell, Day, CELLS};
    ///
    /// assert_eq!(Cell::from_flat(38), Some(Cell::new(Day::Wednesday, 0)));
    /// assert_eq!(Cell::from_flat(CELLS), None);
    /// ```
    pub fn from_flat(position: usize) -> Option<Cell> {
        let (day, slot) = position.div_rem(&SLOTS_PER_DAY);
        Day::from_index(day).map(|day| Cell { day, slot })
    }
}

/// Human readable label of the hour a slot starts at
///
/// # Examples
/// ```
/// use treffpunkt_libs::time::time_label;
///
/// assert_eq!(time_label(0).as_deref(), Some("5:00 AM"));
/// assert_eq!(time_label(5).as_deref(), Some("10:00 AM"));
/// assert_eq!(time_label(7).as_deref(), Some("12:00 PM"));
/// assert_eq!(time_label(18).as_deref(), Some("11:00 PM"));
/// assert_eq!(time_label(19), None);
/// ```
pub fn time_label(slot: usize) -> Option<String> {
    if slot >= SLOTS_PER_DAY {
        return None;
    }

    let hour = usize::from(FIRST_HOUR) + slot;
    let (hour, suffix) = match hour {
        h if h < 12 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };

    Some(format!("{}:00 {}", hour, suffix))
}

#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum WallTimeError {
    #[error("Expected a 4 digit HHMM time, got {0:?}")]
    Format(String),
    #[error("Time {hour:02}{minute:02} is outside of a 24 hour clock")]
    OutOfRange { hour: u16, minute: u16 },
}

/// A 24 hour wall clock time, as found in "HHMM" business hours
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
}

impl WallTime {
    pub fn new(hour: u8, minute: u8) -> WallTime {
        WallTime { hour, minute }
    }

    pub fn is_midnight(self) -> bool {
        self.hour % 24 == 0 && self.minute == 0
    }

    /// Slot index this time bounds on the daily grid.
    /// A partial hour rounds up to the next full slot, and the result is
    /// clamped to `[0, SLOTS_PER_DAY]`.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::time::WallTime;
    ///
    /// assert_eq!(WallTime::new(10, 0).boundary_slot(), 5);
    /// assert_eq!(WallTime::new(10, 30).boundary_slot(), 6);
    /// assert_eq!(WallTime::new(3, 0).boundary_slot(), 0);
    /// assert_eq!(WallTime::new(24, 0).boundary_slot(), 19);
    /// ```
    pub fn boundary_slot(self) -> usize {
        let slot = i16::from(self.hour) - i16::from(FIRST_HOUR) + i16::from(self.minute != 0);
        slot.clamp(0, SLOTS_PER_DAY as i16) as usize
    }
}

impl FromStr for WallTime {
    type Err = WallTimeError;

    /// # Examples
    /// ```
    /// use treffpunkt_libs::time::WallTime;
    ///
    /// assert_eq!("1030".parse(), Ok(WallTime::new(10, 30)));
    /// assert!("10:30".parse::<WallTime>().is_err());
    /// assert!("2500".parse::<WallTime>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WallTimeError::Format(s.to_string()));
        }

        let value: u16 = s
            .parse()
            .map_err(|_| WallTimeError::Format(s.to_string()))?;
        let (hour, minute) = value.div_rem(&100);

        if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(WallTimeError::OutOfRange { hour, minute });
        }

        Ok(WallTime::new(hour as u8, minute as u8))
    }
}
