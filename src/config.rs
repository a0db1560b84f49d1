use crate::hours::DayMapping;
use log::warn;
use std::env;

/// Environment variable naming the weekday the restaurant source counts from
pub const WEEK_START_VAR: &str = "TREFFPUNKT_WEEK_START";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MatchConfig {
    /// Numbering of the `day` field in restaurant business hours
    pub day_mapping: DayMapping,
}

impl MatchConfig {
    pub fn new(day_mapping: DayMapping) -> MatchConfig {
        MatchConfig { day_mapping }
    }

    /// Reads `TREFFPUNKT_WEEK_START` ("monday" or "sunday").
    /// Anything else keeps the Monday first default.
    pub fn from_env() -> MatchConfig {
        MatchConfig::from_week_start(env::var(WEEK_START_VAR).ok().as_deref())
    }

    /// # Examples
    /// ```
    /// use treffpunkt_libs::config::MatchConfig;
    /// use treffpunkt_libs::hours::DayMapping;
    ///
    /// assert_eq!(
    ///     MatchConfig::from_week_start(Some("Sunday")).day_mapping,
    ///     DayMapping::SUNDAY_FIRST
    /// );
    /// assert_eq!(MatchConfig::from_week_start(None), MatchConfig::default());
    /// ```
    pub fn from_week_start(week_start: Option<&str>) -> MatchConfig {
        let day_mapping = match week_start.map(|s| s.trim().to_ascii_lowercase()) {
            None => DayMapping::default(),
            Some(start) => match start.as_str() {
                "monday" => DayMapping::MONDAY_FIRST,
                "sunday" => DayMapping::SUNDAY_FIRST,
                other => {
                    warn!(
                        "Unknown {} value {:?}, counting days from Monday",
                        WEEK_START_VAR, other
                    );
                    DayMapping::default()
                }
            },
        };

        MatchConfig { day_mapping }
    }
}
