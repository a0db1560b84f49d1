pub mod candidates;
pub mod config;
pub mod frequency;
pub mod hours;
pub mod matcher;
pub mod member;
pub mod selector;
pub mod time;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use hours::{OpenInterval, Restaurant};
pub use matcher::{DayOfWeekAndTime, MatchError, Matcher};
pub use member::{Member, WeeklyAvailability};
