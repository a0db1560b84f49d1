//! Trying a group against a list of restaurants.
//!
//! The matcher itself never moves on to another restaurant. These helpers do
//! that for callers who are happy with "first restaurant in the given order
//! that works".

use crate::frequency::Tally;
use crate::hours::Restaurant;
use crate::matcher::{MatchError, MatchOutcome, Matcher};
use crate::member::Member;
use log::{debug, info};
use thiserror::Error;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CandidateFailure {
    pub restaurant_id: String,
    pub error: MatchError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CandidateMatch<'r> {
    pub restaurant: &'r Restaurant,
    pub outcome: MatchOutcome,
    /// Restaurants before this one, and why they did not work
    pub skipped: Vec<CandidateFailure>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("None of the {} restaurant candidates has a meeting time", .failures.len())]
pub struct NoCandidate {
    pub failures: Vec<CandidateFailure>,
}

impl NoCandidate {
    /// Every candidate failed for lack of hours, as opposed to the group
    /// never being free together
    pub fn all_hours_unavailable(&self) -> bool {
        self.failures
            .iter()
            .all(|failure| failure.error == MatchError::HoursUnavailable)
    }
}

fn pick<'r, I>(results: I) -> Result<CandidateMatch<'r>, NoCandidate>
where
    I: IntoIterator<Item = (&'r Restaurant, Result<MatchOutcome, MatchError>)>,
{
    let mut failures = Vec::new();

    for (restaurant, result) in results {
        match result {
            Ok(outcome) => {
                info!(
                    "Picked {} after skipping {} candidates",
                    restaurant.id,
                    failures.len()
                );
                return Ok(CandidateMatch {
                    restaurant,
                    outcome,
                    skipped: failures,
                });
            }
            Err(error) => {
                debug!("Skipping {}: {}", restaurant.id, error);
                failures.push(CandidateFailure {
                    restaurant_id: restaurant.id.clone(),
                    error,
                });
            }
        }
    }

    Err(NoCandidate { failures })
}

/// Tries `restaurants` in order and returns the first one with a meeting time.
/// Restaurants after the first success are not evaluated.
pub fn first_match<'r>(
    matcher: &Matcher,
    members: &[Member],
    restaurants: &'r [Restaurant],
) -> Result<CandidateMatch<'r>, NoCandidate> {
    let matrix = members.iter().tally();

    pick(
        restaurants
            .iter()
            .map(|restaurant| (restaurant, matcher.run_tallied(&matrix, restaurant))),
    )
}

/// Evaluates every restaurant concurrently, then picks like [`first_match`]:
/// the earliest restaurant in `restaurants` with a meeting time wins.
#[cfg(feature = "rayon")]
pub fn first_match_par<'r>(
    matcher: &Matcher,
    members: &[Member],
    restaurants: &'r [Restaurant],
) -> Result<CandidateMatch<'r>, NoCandidate> {
    let matrix = members.iter().tally();

    let results: Vec<_> = restaurants
        .par_iter()
        .map(|restaurant| (restaurant, matcher.run_tallied(&matrix, restaurant)))
        .collect();

    pick(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::OpenInterval;
    use crate::member::WeeklyAvailability;
    use crate::time::Day;

    fn group() -> Vec<Member> {
        let mut availability = WeeklyAvailability::closed();
        availability.set(Day::Thursday, 14, true);
        availability.set(Day::Thursday, 15, true);

        vec![
            Member::with_availability("1", &availability),
            Member::with_availability("2", &availability),
        ]
    }

    fn restaurants() -> Vec<Restaurant> {
        vec![
            Restaurant::new("unknown", None),
            Restaurant::new("lunch-only", Some(vec![OpenInterval::new(3, "1100", "1500")])),
            Restaurant::new("dinner", Some(vec![OpenInterval::new(3, "1700", "2300")])),
            Restaurant::new("late", Some(vec![OpenInterval::new(3, "1900", "0000")])),
        ]
    }

    #[test]
    fn first_working_restaurant_wins() {
        let restaurants = restaurants();
        let found = first_match(&Matcher::default(), &group(), &restaurants).unwrap();

        assert_eq!(found.restaurant.id, "dinner");
        assert_eq!(found.outcome.recommendation.time, "7:00 PM");
        assert_eq!(
            found.skipped,
            vec![
                CandidateFailure {
                    restaurant_id: "unknown".to_string(),
                    error: MatchError::HoursUnavailable,
                },
                CandidateFailure {
                    restaurant_id: "lunch-only".to_string(),
                    error: MatchError::NoCommonAvailability,
                },
            ]
        );
    }

    #[test]
    fn reports_every_failure() {
        let restaurants = vec![Restaurant::new("a", None), Restaurant::new("b", Some(vec![]))];
        let error = first_match(&Matcher::default(), &group(), &restaurants).unwrap_err();

        assert_eq!(error.failures.len(), 2);
        assert!(error.all_hours_unavailable());
        assert_eq!(
            error.to_string(),
            "None of the 2 restaurant candidates has a meeting time"
        );
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_keeps_candidate_order() {
        let restaurants = restaurants();
        let sequential = first_match(&Matcher::default(), &group(), &restaurants).unwrap();
        let parallel = first_match_par(&Matcher::default(), &group(), &restaurants).unwrap();

        assert_eq!(sequential, parallel);
    }
}
