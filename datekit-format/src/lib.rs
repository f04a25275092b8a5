//! DateKit Format - pre-configured date formatters
//!
//! `DateFormatter` factories:
//! - `with_pattern`: any Unicode date pattern (`yyyy-MM-dd HH:mm`)
//! - `with_date_style` / `with_time_style`: short, medium, long or full
//! - `rfc822` / `rfc3339`: fixed POSIX-locale UTC formats
//!
//! Each call builds an independent formatter that can format and parse.
//!
//! ```
//! use datekit_format::DateFormatter;
//! use chrono::{TimeZone, Utc};
//!
//! let epoch = Utc.timestamp_opt(0, 0).unwrap();
//! assert_eq!(DateFormatter::rfc3339().format(&epoch), "1970-01-01T00:00:00+00:00");
//! ```

mod formatter;
mod pattern;

pub use formatter::{DateFormatter, FormatLocale, FormatStyle, RFC3339_PATTERN, RFC822_PATTERN};
pub use pattern::compile as compile_pattern;
