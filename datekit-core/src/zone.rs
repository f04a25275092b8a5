//! Time zones consumed by calendars and formatters
//!
//! A `Zone` maps instants to local wall-clock time and back. The zone rules
//! themselves come from chrono (`Local`, `Utc`, `FixedOffset`) and chrono-tz
//! (IANA names); this module only dispatches and resolves DST edge cases.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{DateKitError, Instant};

/// A time zone
///
/// `Local` is re-resolved by chrono on every use, so it follows changes to
/// the host zone (`TZ`, `/etc/localtime`) without rebuilding anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    /// UTC offset in effect at `instant`
    pub fn offset_at(&self, instant: &Instant) -> FixedOffset {
        let utc = instant.naive_utc();
        match self {
            Zone::Local => Local.offset_from_utc_datetime(&utc).fix(),
            Zone::Utc => Utc.fix(),
            Zone::Fixed(offset) => *offset,
            Zone::Named(tz) => tz.offset_from_utc_datetime(&utc).fix(),
        }
    }

    /// Local wall-clock time of `instant` in this zone
    pub fn to_local(&self, instant: &Instant) -> NaiveDateTime {
        instant.with_timezone(&self.offset_at(instant)).naive_local()
    }

    /// Instant for a local wall-clock time
    ///
    /// Ambiguous times (DST fall-back overlap) pick the occurrence whose offset
    /// matches `prefer`, falling back to the earlier one. Times inside a DST
    /// gap are moved forward by the length of the gap.
    pub fn from_local(&self, local: &NaiveDateTime, prefer: Option<FixedOffset>) -> Instant {
        match self {
            Zone::Local => resolve(&Local, local, prefer),
            Zone::Utc => resolve(&Utc, local, prefer),
            Zone::Fixed(offset) => resolve(offset, local, prefer),
            Zone::Named(tz) => resolve(tz, local, prefer),
        }
    }
}

fn resolve<Z: TimeZone>(zone: &Z, local: &NaiveDateTime, prefer: Option<FixedOffset>) -> Instant {
    match zone.from_local_datetime(local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, later) => {
            tracing::trace!(%local, "local time is ambiguous");
            if prefer == Some(later.offset().fix()) {
                later.with_timezone(&Utc)
            } else {
                earlier.with_timezone(&Utc)
            }
        }
        LocalResult::None => {
            tracing::trace!(%local, "local time falls in a gap");
            // Reading the wall time with the offset from before the gap lands
            // just past it.
            let before = local
                .checked_sub_signed(TimeDelta::days(1))
                .unwrap_or(*local);
            let offset = zone.offset_from_utc_datetime(&before).fix();
            let utc = local
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                .unwrap_or(*local);
            DateTime::from_naive_utc_and_offset(utc, Utc)
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Utc => write!(f, "UTC"),
            Zone::Fixed(offset) => write!(f, "{}", offset),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl FromStr for Zone {
    type Err = DateKitError;

    /// Accepts `local`, `UTC`/`GMT`/`Z`, a `+HH:MM` / `-HHMM` offset, or an
    /// IANA zone name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("gmt") || s == "Z" {
            return Ok(Zone::Utc);
        }
        if s.starts_with('+') || s.starts_with('-') {
            return parse_offset(s).map(Zone::Fixed);
        }
        s.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| DateKitError::InvalidZone(s.to_string()))
    }
}

fn parse_offset(s: &str) -> Result<FixedOffset, DateKitError> {
    let invalid = || DateKitError::InvalidZone(s.to_string());
    let (sign, rest) = s.split_at(1);
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        2 => (&digits[..2], "0"),
        4 => (&digits[..2], &digits[2..]),
        _ => return Err(invalid()),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes > 59 {
        return Err(invalid());
    }
    let secs = hours * 3600 + minutes * 60;
    let secs = if sign == "-" { -secs } else { secs };
    FixedOffset::east_opt(secs).ok_or_else(invalid)
}
