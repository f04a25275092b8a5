//! DateKit Core - calendar-aware date reasoning
//!
//! This crate layers calendar-relative questions on top of chrono:
//! - `Calendar`: zone, week rules and clock; unit addition, differencing and
//!   component extraction, plus every relative/comparison/interval operation
//! - `DateComponents` / `CalendarUnit`: sparse calendar fields and unit masks
//! - `Zone`: local, UTC, fixed-offset or IANA time zones
//! - `DateKitError`: errors for the few fallible edges
//!
//! Instants are plain `chrono::DateTime<Utc>` values and are never mutated;
//! every adjustment returns a new instant.
//!
//! ```
//! use datekit_core::{Calendar, Clock, Zone};
//! use chrono::{TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
//! let cal = Calendar::gregorian(Zone::Utc).with_clock(Clock::Fixed(now));
//! assert!(cal.is_workday(&now));
//! assert_eq!(cal.tomorrow(), Utc.with_ymd_and_hms(2024, 1, 16, 10, 0, 0).unwrap());
//! ```

mod calendar;
mod components;
mod config;
mod dates;
mod error;
mod zone;

pub use calendar::{Calendar, Clock};
pub use components::{CalendarUnit, DateComponents};
pub use config::{CalendarConfig, ENV_FIRST_WEEKDAY, ENV_MIN_DAYS_IN_FIRST_WEEK, ENV_TIMEZONE};
pub use error::{codes, DateKitError};
pub use zone::Zone;

/// A point in time
pub type Instant = chrono::DateTime<chrono::Utc>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Calendar, CalendarUnit, Clock, DateComponents, DateKitError, Instant, Zone};
}
