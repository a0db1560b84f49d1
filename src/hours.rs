use crate::matcher::MatchError;
use crate::time::{Day, WallTime, WallTimeError, DAYS, SLOTS_PER_DAY};
use log::{debug, warn};
use std::ops::Range;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum IntervalError {
    #[error("Day index {0} is outside of the week")]
    UnknownDay(u8),
    #[error(transparent)]
    Time(#[from] WallTimeError),
}

/// Translates the restaurant source's day numbering into grid rows.
/// `DayMapping.0[i]` is the grid day of external day `i`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DayMapping(pub [Day; DAYS]);

impl DayMapping {
    /// External day 0 is Monday, same as the grid
    pub const MONDAY_FIRST: DayMapping = DayMapping(Day::ALL);

    /// External day 0 is Sunday
    pub const SUNDAY_FIRST: DayMapping = DayMapping([
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ]);

    /// # Examples
    /// ```
    /// use treffpunkt_libs::hours::DayMapping;
    /// use treffpunkt_libs::time::Day;
    ///
    /// assert_eq!(DayMapping::MONDAY_FIRST.day(0), Some(Day::Monday));
    /// assert_eq!(DayMapping::SUNDAY_FIRST.day(0), Some(Day::Sunday));
    /// assert_eq!(DayMapping::SUNDAY_FIRST.day(1), Some(Day::Monday));
    /// assert_eq!(DayMapping::SUNDAY_FIRST.day(7), None);
    /// ```
    pub fn day(&self, external: u8) -> Option<Day> {
        self.0.get(usize::from(external)).copied()
    }
}

impl Default for DayMapping {
    fn default() -> Self {
        DayMapping::MONDAY_FIRST
    }
}

/// One opening interval of a restaurant, times as "HHMM"
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpenInterval {
    pub day: u8,
    pub start: String,
    pub end: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_overnight: bool,
}

impl OpenInterval {
    pub fn new(day: u8, start: &str, end: &str) -> OpenInterval {
        OpenInterval {
            day,
            start: start.to_string(),
            end: end.to_string(),
            is_overnight: false,
        }
    }

    /// Slots on the interval's own day covered by this interval.
    /// Both ends round a partial hour up. An interval closing at midnight,
    /// flagged overnight, or closing before it opens runs to the end of the
    /// day. Hours past midnight never spill into the next day's slots, so an
    /// overnight "2200" to "0600" interval leaves the following 05:00 slot
    /// closed.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::hours::OpenInterval;
    ///
    /// assert_eq!(OpenInterval::new(0, "1000", "1200").slots(), Ok(5..7));
    /// assert_eq!(OpenInterval::new(0, "1030", "1200").slots(), Ok(6..7));
    /// assert_eq!(OpenInterval::new(0, "1000", "1130").slots(), Ok(5..7));
    /// assert_eq!(OpenInterval::new(0, "1700", "0000").slots(), Ok(12..19));
    /// assert_eq!(OpenInterval::new(0, "1800", "0200").slots(), Ok(13..19));
    /// ```
    pub fn slots(&self) -> Result<Range<usize>, WallTimeError> {
        let start: WallTime = self.start.parse()?;
        let end: WallTime = self.end.parse()?;

        let start_slot = start.boundary_slot();
        let end_slot = if self.is_overnight || end.is_midnight() || end <= start {
            SLOTS_PER_DAY
        } else {
            end.boundary_slot()
        };

        Ok(start_slot..end_slot.max(start_slot))
    }
}

/// Restaurant as returned by the search provider.
/// `business_hours` is `None` when the provider has no hours at all.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Restaurant {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub business_hours: Option<Vec<OpenInterval>>,
}

impl Restaurant {
    pub fn new(id: &str, business_hours: Option<Vec<OpenInterval>>) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            business_hours,
        }
    }

    /// The restaurant's intervals, or `HoursUnavailable` when there are none
    pub fn open_intervals(&self) -> Result<&[OpenInterval], MatchError> {
        match self.business_hours.as_deref() {
            Some(intervals) if !intervals.is_empty() => Ok(intervals),
            _ => Err(MatchError::HoursUnavailable),
        }
    }

    pub fn hours_grid(&self, mapping: &DayMapping) -> Result<HoursGrid, MatchError> {
        self.open_intervals()
            .map(|intervals| HoursGrid::from_intervals(intervals, mapping))
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for OpenInterval {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        fn hhmm(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<String> {
            if u.ratio(1, 32)? {
                return u.arbitrary::<String>();
            }
            let hour = u.int_in_range(0..=24_u8)?;
            let minute = *u.choose(&[0_u8, 0, 15, 30, 45])?;
            Ok(format!("{:02}{:02}", hour, minute))
        }

        Ok(OpenInterval {
            day: u.int_in_range(0..=7)?,
            start: hhmm(u)?,
            end: hhmm(u)?,
            is_overnight: u.ratio(1, 8)?,
        })
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Restaurant {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let id = u.arbitrary::<uuid::Uuid>()?.to_string();
        let business_hours = if u.ratio(1, 16)? {
            None
        } else {
            Some(u.arbitrary::<Vec<OpenInterval>>()?)
        };

        Ok(Restaurant { id, business_hours })
    }
}

/// Open/closed flag for each cell of the week
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HoursGrid {
    open: [[bool; SLOTS_PER_DAY]; DAYS],
}

impl HoursGrid {
    /// Marks every slot covered by at least one interval as open.
    /// Intervals that cannot be read are skipped.
    pub fn from_intervals(intervals: &[OpenInterval], mapping: &DayMapping) -> HoursGrid {
        let mut grid = HoursGrid::default();

        for interval in intervals {
            if let Err(error) = grid.open_interval(interval, mapping) {
                warn!("Skipping business hours {:?}: {}", interval, error);
            }
        }

        grid
    }

    fn open_interval(
        &mut self,
        interval: &OpenInterval,
        mapping: &DayMapping,
    ) -> Result<(), IntervalError> {
        let day = mapping
            .day(interval.day)
            .ok_or(IntervalError::UnknownDay(interval.day))?;
        let slots = interval.slots()?;

        debug!("Opening {} slots {:?}", day, slots);
        for open in self.open[day.index()][slots].iter_mut() {
            *open = true;
        }

        Ok(())
    }

    pub fn is_open(&self, day: Day, slot: usize) -> bool {
        self.open[day.index()].get(slot).copied().unwrap_or(false)
    }

    /// All `len` slots from `slot` on are open. Runs past the end of the day
    /// are closed.
    pub fn is_block_open(&self, day: Day, slot: usize, len: usize) -> bool {
        (slot..slot + len).all(|s| self.is_open(day, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_on_one_day_union() {
        let intervals = vec![
            OpenInterval::new(2, "1100", "1400"),
            OpenInterval::new(2, "1300", "1500"),
            OpenInterval::new(2, "1800", "2000"),
        ];
        let grid = HoursGrid::from_intervals(&intervals, &DayMapping::MONDAY_FIRST);

        let open: Vec<usize> = (0..SLOTS_PER_DAY)
            .filter(|&slot| grid.is_open(Day::Wednesday, slot))
            .collect();
        assert_eq!(open, vec![6, 7, 8, 9, 13, 14]);
        assert!(!grid.is_open(Day::Tuesday, 7));
    }

    #[test]
    fn half_hour_opening_closes_leading_hour() {
        let intervals = vec![OpenInterval::new(0, "1030", "1300")];
        let grid = HoursGrid::from_intervals(&intervals, &DayMapping::MONDAY_FIRST);

        assert!(!grid.is_open(Day::Monday, 5));
        assert!(grid.is_open(Day::Monday, 6));
        assert!(grid.is_open(Day::Monday, 7));
        assert!(!grid.is_open(Day::Monday, 8));
    }

    #[test]
    fn mapping_moves_rows() {
        let intervals = vec![OpenInterval::new(0, "1000", "1200")];

        let monday_first = HoursGrid::from_intervals(&intervals, &DayMapping::MONDAY_FIRST);
        let sunday_first = HoursGrid::from_intervals(&intervals, &DayMapping::SUNDAY_FIRST);

        assert!(monday_first.is_open(Day::Monday, 5));
        assert!(!monday_first.is_open(Day::Sunday, 5));
        assert!(sunday_first.is_open(Day::Sunday, 5));
        assert!(!sunday_first.is_open(Day::Monday, 5));
    }

    #[test]
    fn unreadable_intervals_are_skipped() {
        let intervals = vec![
            OpenInterval::new(9, "1000", "1200"),
            OpenInterval::new(1, "10:00", "1200"),
            OpenInterval::new(1, "1400", "1600"),
        ];
        let grid = HoursGrid::from_intervals(&intervals, &DayMapping::MONDAY_FIRST);

        assert!(!grid.is_open(Day::Tuesday, 5));
        assert!(grid.is_block_open(Day::Tuesday, 9, 2));
    }

    #[test]
    fn overnight_hours_stay_on_their_day() {
        let mut late = OpenInterval::new(4, "2200", "0600");
        late.is_overnight = true;
        let grid = HoursGrid::from_intervals(&[late], &DayMapping::MONDAY_FIRST);

        assert!(grid.is_open(Day::Friday, 17));
        assert!(grid.is_open(Day::Friday, 18));
        assert!(!grid.is_open(Day::Saturday, 0));
        assert!(!grid.is_open(Day::Friday, 0));
    }

    #[test]
    fn block_past_end_of_day_is_closed() {
        let intervals = vec![OpenInterval::new(6, "0500", "0000")];
        let grid = HoursGrid::from_intervals(&intervals, &DayMapping::MONDAY_FIRST);

        assert!(grid.is_block_open(Day::Sunday, 17, 2));
        assert!(!grid.is_block_open(Day::Sunday, 18, 2));
    }

    #[test]
    fn missing_or_empty_hours_are_unavailable() {
        let missing = Restaurant::new("missing", None);
        let empty = Restaurant::new("empty", Some(vec![]));

        assert_eq!(
            missing.hours_grid(&DayMapping::default()),
            Err(MatchError::HoursUnavailable)
        );
        assert_eq!(
            empty.hours_grid(&DayMapping::default()),
            Err(MatchError::HoursUnavailable)
        );
    }
}
