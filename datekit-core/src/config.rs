//! Calendar configuration
//!
//! Plain, serializable settings that `Calendar::from_config` turns into a
//! calendar. The shared calendar is built from `CalendarConfig::from_env()`.

use std::env;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::{DateKitError, Zone};

pub const ENV_TIMEZONE: &str = "DATEKIT_TIMEZONE";
pub const ENV_FIRST_WEEKDAY: &str = "DATEKIT_FIRST_WEEKDAY";
pub const ENV_MIN_DAYS_IN_FIRST_WEEK: &str = "DATEKIT_MIN_DAYS_IN_FIRST_WEEK";

/// Settings for building a `Calendar`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// `local`, `UTC`, a fixed offset such as `+05:30`, or an IANA name
    pub zone: String,
    /// Weekday that starts a week (`sunday`, `mon`, ...)
    pub first_weekday: String,
    /// Days of the new year a week needs to count as week 1 (1-7)
    pub minimum_days_in_first_week: u8,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            zone: "local".to_string(),
            first_weekday: "sunday".to_string(),
            minimum_days_in_first_week: 1,
        }
    }
}

impl CalendarConfig {
    /// Defaults overridden by `DATEKIT_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(zone) = env::var(ENV_TIMEZONE) {
            config.zone = zone;
        }
        if let Ok(weekday) = env::var(ENV_FIRST_WEEKDAY) {
            config.first_weekday = weekday;
        }
        if let Ok(days) = env::var(ENV_MIN_DAYS_IN_FIRST_WEEK) {
            match days.trim().parse() {
                Ok(days) => config.minimum_days_in_first_week = days,
                Err(_) => tracing::warn!(
                    var = ENV_MIN_DAYS_IN_FIRST_WEEK,
                    value = %days,
                    "ignoring non-numeric value"
                ),
            }
        }
        config
    }

    pub(crate) fn parsed_zone(&self) -> Result<Zone, DateKitError> {
        self.zone.parse()
    }

    pub(crate) fn parsed_first_weekday(&self) -> Result<Weekday, DateKitError> {
        self.first_weekday
            .trim()
            .parse::<Weekday>()
            .map_err(|_| DateKitError::InvalidWeekday(self.first_weekday.clone()))
    }

    pub(crate) fn validated_minimum_days(&self) -> Result<u8, DateKitError> {
        match self.minimum_days_in_first_week {
            1..=7 => Ok(self.minimum_days_in_first_week),
            other => Err(DateKitError::InvalidMinimumDays(other)),
        }
    }
}
