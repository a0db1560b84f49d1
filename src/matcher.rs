use crate::config::MatchConfig;
use crate::frequency::{FrequencyMatrix, Tally};
use crate::hours::{HoursGrid, Restaurant};
use crate::member::Member;
use crate::selector::SlotSelector;
use crate::time::{time_label, Cell, Day};
use core::fmt;
use log::{debug, info};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why no meeting time came out for a (members, restaurant) pair.
/// Neither is retried; the caller picks another restaurant or asks members
/// for more availability.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchError {
    #[error("No business hours are known for this restaurant")]
    HoursUnavailable,
    #[error("There is no two hour block where every member is free and the restaurant is open")]
    NoCommonAvailability,
}

/// The recommended meeting time
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayOfWeekAndTime {
    pub day: Day,
    pub time: String,
}

impl DayOfWeekAndTime {
    /// `None` for a slot outside of the day
    pub fn from_cell(cell: Cell) -> Option<DayOfWeekAndTime> {
        time_label(cell.slot).map(|time| DayOfWeekAndTime {
            day: cell.day,
            time,
        })
    }
}

impl fmt::Display for DayOfWeekAndTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.day, self.time)
    }
}

/// A successful match together with how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MatchOutcome {
    pub recommendation: DayOfWeekAndTime,
    pub start: Cell,
    /// Candidates dropped because the restaurant was closed
    pub rejected: usize,
    /// Grid cells scanned
    pub visited: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Matcher {
        Matcher { config }
    }

    /// Picks a day and hour for `members` to meet at `restaurant`.
    ///
    /// # Example
    /// ```
    /// use treffpunkt_libs::{
    ///     hours::{OpenInterval, Restaurant},
    ///     matcher::Matcher,
    ///     member::{Member, WeeklyAvailability},
    ///     time::Day,
    /// };
    ///
    /// let mut availability = WeeklyAvailability::closed();
    /// availability.set(Day::Monday, 5, true);
    /// availability.set(Day::Monday, 6, true);
    ///
    /// let members: Vec<Member> = ["ana", "ben", "cai"]
    ///     .iter()
    ///     .map(|id| Member::with_availability(id, &availability))
    ///     .collect();
    /// let restaurant = Restaurant::new(
    ///     "noodle-bar",
    ///     Some(vec![OpenInterval::new(0, "1000", "1200")]),
    /// );
    ///
    /// let recommendation = Matcher::default().recommend(&members, &restaurant).unwrap();
    /// assert_eq!(recommendation.day, Day::Monday);
    /// assert_eq!(recommendation.time, "10:00 AM");
    /// ```
    ///
    /// # Errors
    /// `MatchError::HoursUnavailable` if the restaurant has no business hours,
    /// whatever the members' availability. Otherwise
    /// `MatchError::NoCommonAvailability` if no two hour block has every
    /// member free while the restaurant is open.
    pub fn recommend(
        &self,
        members: &[Member],
        restaurant: &Restaurant,
    ) -> Result<DayOfWeekAndTime, MatchError> {
        self.run(members, restaurant)
            .map(|outcome| outcome.recommendation)
    }

    /// Same as [`Matcher::recommend`], keeping the details of the search
    pub fn run(
        &self,
        members: &[Member],
        restaurant: &Restaurant,
    ) -> Result<MatchOutcome, MatchError> {
        let matrix = members.iter().tally();
        self.run_tallied(&matrix, restaurant)
    }

    /// Runs against an already aggregated roster, so one matrix can be
    /// reused across restaurant candidates.
    pub fn run_tallied(
        &self,
        matrix: &FrequencyMatrix,
        restaurant: &Restaurant,
    ) -> Result<MatchOutcome, MatchError> {
        let intervals = restaurant.open_intervals()?;

        if matrix.members() == 0 {
            debug!("Nobody to meet at {}", restaurant.id);
            return Err(MatchError::NoCommonAvailability);
        }

        let mut selector = SlotSelector::new(matrix);
        if selector.next_candidate().is_none() {
            info!(
                "No unanimous block among {} members for {}, at most {} free at once",
                matrix.members(),
                restaurant.id,
                matrix.peak()
            );
            return Err(MatchError::NoCommonAvailability);
        }

        let hours = HoursGrid::from_intervals(intervals, &self.config.day_mapping);

        let start = match selector.run(&hours) {
            Some(start) => start,
            None => {
                info!(
                    "{} is closed for all {} unanimous blocks",
                    restaurant.id,
                    selector.rejected()
                );
                return Err(MatchError::NoCommonAvailability);
            }
        };

        let recommendation =
            DayOfWeekAndTime::from_cell(start).ok_or(MatchError::NoCommonAvailability)?;
        info!("Meeting at {} on {}", restaurant.id, recommendation);

        Ok(MatchOutcome {
            recommendation,
            start,
            rejected: selector.rejected(),
            visited: selector.visited(),
        })
    }
}
