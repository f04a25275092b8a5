//! The calendar engine
//!
//! A `Calendar` is an immutable Gregorian configuration: a zone, the weekday
//! that starts a week, the minimum days week 1 must have, and a clock for
//! "now". On top of chrono's civil arithmetic it provides the three
//! primitives every date operation is built from:
//! - unit addition (`adding`)
//! - unit differencing (`difference`)
//! - component extraction (`components`)
//!
//! Day, week, month and year arithmetic moves the local wall-clock date and
//! keeps the wall time, so "one day later" survives DST transitions. Hour,
//! minute, second and nanosecond arithmetic is elapsed time.

use std::sync::OnceLock;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc, Weekday};

use crate::{CalendarConfig, CalendarUnit, DateComponents, DateKitError, Instant, Zone};

static SHARED_CALENDAR: OnceLock<Calendar> = OnceLock::new();

// ============================================================================
// Clock
// ============================================================================

/// Source of "now"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Host wall clock
    #[default]
    System,
    /// Always returns the given instant
    Fixed(Instant),
}

impl Clock {
    pub fn now(&self) -> Instant {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(instant) => *instant,
        }
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// Gregorian calendar configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    zone: Zone,
    first_weekday: Weekday,
    minimum_days_in_first_week: u8,
    clock: Clock,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::gregorian(Zone::Local)
    }
}

impl Calendar {
    // ========== Construction ==========

    /// Gregorian calendar with weeks starting on Sunday and week 1 being the
    /// week that contains January 1st
    pub fn gregorian(zone: Zone) -> Self {
        Self {
            zone,
            first_weekday: Weekday::Sun,
            minimum_days_in_first_week: 1,
            clock: Clock::System,
        }
    }

    /// Gregorian calendar with ISO 8601 week rules (Monday, 4 days)
    pub fn iso8601(zone: Zone) -> Self {
        Self {
            zone,
            first_weekday: Weekday::Mon,
            minimum_days_in_first_week: 4,
            clock: Clock::System,
        }
    }

    /// Build a calendar from configuration
    pub fn from_config(config: &CalendarConfig) -> Result<Self, DateKitError> {
        Ok(Self {
            zone: config.parsed_zone()?,
            first_weekday: config.parsed_first_weekday()?,
            minimum_days_in_first_week: config.validated_minimum_days()?,
            clock: Clock::System,
        })
    }

    /// Process-wide default calendar
    ///
    /// Built on first access from `CalendarConfig::from_env()`. With the
    /// default `local` zone it follows host timezone changes on every call.
    pub fn shared() -> &'static Calendar {
        SHARED_CALENDAR.get_or_init(|| {
            let calendar = Self::from_config_or_defaults(&CalendarConfig::from_env());
            tracing::debug!(
                zone = %calendar.zone,
                first_weekday = %calendar.first_weekday,
                minimum_days_in_first_week = calendar.minimum_days_in_first_week,
                "shared calendar initialized"
            );
            calendar
        })
    }

    /// Like `from_config`, but each invalid field falls back to its default
    /// on its own, with a warning
    pub(crate) fn from_config_or_defaults(config: &CalendarConfig) -> Self {
        let defaults = Self::default();
        let zone = config.parsed_zone().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid zone, using {}", defaults.zone);
            defaults.zone
        });
        let first_weekday = config.parsed_first_weekday().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid first weekday, using {}", defaults.first_weekday);
            defaults.first_weekday
        });
        let minimum_days_in_first_week = config.validated_minimum_days().unwrap_or_else(|err| {
            tracing::warn!(
                error = %err,
                "invalid minimum days in first week, using {}",
                defaults.minimum_days_in_first_week
            );
            defaults.minimum_days_in_first_week
        });
        Self {
            zone,
            first_weekday,
            minimum_days_in_first_week,
            clock: Clock::System,
        }
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_first_weekday(mut self, weekday: Weekday) -> Self {
        self.first_weekday = weekday;
        self
    }

    /// Set the minimum days in week 1 (clamped to 1-7)
    pub fn with_minimum_days_in_first_week(mut self, days: u8) -> Self {
        self.minimum_days_in_first_week = days.clamp(1, 7);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // ========== Accessors ==========

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn minimum_days_in_first_week(&self) -> u8 {
        self.minimum_days_in_first_week
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Current instant according to this calendar's clock
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    // ========== Building instants ==========

    /// Instant for a local date and time in this calendar's zone
    pub fn ymd_hms(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Instant, DateKitError> {
        let local = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .ok_or_else(|| {
                DateKitError::InvalidDate(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                ))
            })?;
        Ok(self.zone.from_local(&local, None))
    }

    /// Instant for absolute components
    ///
    /// `year` is required; month and day default to 1 and time fields to 0.
    /// Other fields are ignored.
    pub fn date_from_components(&self, components: &DateComponents) -> Result<Instant, DateKitError> {
        let year = components
            .year
            .ok_or_else(|| DateKitError::InvalidDate("year is undefined".to_string()))?;
        let field = |value: Option<i64>, default: i64| -> Result<u32, DateKitError> {
            let value = value.unwrap_or(default);
            u32::try_from(value).map_err(|_| DateKitError::InvalidDate(format!("{} is out of range", value)))
        };
        let year = i32::try_from(year)
            .map_err(|_| DateKitError::InvalidDate(format!("year {} is out of range", year)))?;
        let date = NaiveDate::from_ymd_opt(year, field(components.month, 1)?, field(components.day, 1)?)
            .ok_or_else(|| DateKitError::InvalidDate(components.to_string()))?;
        let time = NaiveTime::from_hms_nano_opt(
            field(components.hour, 0)?,
            field(components.minute, 0)?,
            field(components.second, 0)?,
            field(components.nanosecond, 0)?,
        )
        .ok_or_else(|| DateKitError::InvalidDate(components.to_string()))?;
        Ok(self.zone.from_local(&date.and_time(time), None))
    }

    // ========== Unit Addition ==========

    /// Add `amount` of a single unit
    ///
    /// Supported units: year, month, week of year / week of month (7 days),
    /// day, hour, minute, second, nanosecond. Other units, and results out of
    /// range, return `date` unchanged.
    pub fn adding(&self, date: &Instant, unit: CalendarUnit, amount: i64) -> Instant {
        self.checked_adding(date, unit, amount).unwrap_or(*date)
    }

    fn checked_adding(&self, date: &Instant, unit: CalendarUnit, amount: i64) -> Option<Instant> {
        if amount == 0 {
            return Some(*date);
        }
        match unit {
            CalendarUnit::YEAR => self.shift_local(date, |local| add_months(local, amount.checked_mul(12)?)),
            CalendarUnit::MONTH => self.shift_local(date, |local| add_months(local, amount)),
            CalendarUnit::WEEK_OF_YEAR | CalendarUnit::WEEK_OF_MONTH => {
                self.shift_local(date, |local| add_days(local, amount.checked_mul(7)?))
            }
            CalendarUnit::DAY => self.shift_local(date, |local| add_days(local, amount)),
            CalendarUnit::HOUR => date.checked_add_signed(TimeDelta::try_hours(amount)?),
            CalendarUnit::MINUTE => date.checked_add_signed(TimeDelta::try_minutes(amount)?),
            CalendarUnit::SECOND => date.checked_add_signed(TimeDelta::try_seconds(amount)?),
            CalendarUnit::NANOSECOND => date.checked_add_signed(TimeDelta::nanoseconds(amount)),
            _ => None,
        }
    }

    /// Apply `shift` to the local wall time and map the result back,
    /// preferring the original offset when the new wall time is ambiguous
    fn shift_local<F>(&self, date: &Instant, shift: F) -> Option<Instant>
    where
        F: FnOnce(NaiveDateTime) -> Option<NaiveDateTime>,
    {
        let offset = self.zone.offset_at(date);
        let local = date.with_timezone(&offset).naive_local();
        let shifted = shift(local)?;
        Some(self.zone.from_local(&shifted, Some(offset)))
    }

    // ========== Unit Differencing ==========

    /// Elapsed units from `from` to `to`
    ///
    /// Positive when `to` is later. Requested units are filled from the
    /// largest to the smallest, each holding the whole units that remain
    /// after the larger ones, truncated toward zero. Every candidate is
    /// measured from `from` itself, so month-end clamping is applied once.
    /// Only year, month, week of year / month, day, hour, minute, second and
    /// nanosecond can be measured; other requested units stay undefined.
    pub fn difference(&self, units: CalendarUnit, from: &Instant, to: &Instant) -> DateComponents {
        let mut result = DateComponents::new();
        let mut span = Span::default();
        let mut cursor = *from;
        for unit in CalendarUnit::DIFFERENCE_ORDER {
            if !units.contains(unit) {
                continue;
            }
            let count = self.count_units(unit, from, span, &cursor, to);
            result.set(unit, count);
            if let Some(next) = span.plus(unit, count) {
                if let Some(at) = self.advance(from, next) {
                    span = next;
                    cursor = at;
                }
            }
        }
        result
    }

    /// `from` moved by a combined span: calendar months and days on the wall
    /// clock in one step, then elapsed time
    fn advance(&self, from: &Instant, span: Span) -> Option<Instant> {
        let shifted = if span.months == 0 && span.days == 0 {
            *from
        } else {
            self.shift_local(from, |local| add_days(add_months(local, span.months)?, span.days))?
        };
        let secs = i64::try_from(span.nanos.div_euclid(1_000_000_000)).ok()?;
        let nanos = u32::try_from(span.nanos.rem_euclid(1_000_000_000)).ok()?;
        shifted.checked_add_signed(TimeDelta::new(secs, nanos)?)
    }

    /// Whole `unit`s between `cursor` (which is `from` moved by `base`) and `to`
    fn count_units(&self, unit: CalendarUnit, from: &Instant, base: Span, cursor: &Instant, to: &Instant) -> i64 {
        if let Some(unit_nanos) = unit.fixed_nanos() {
            return (nanos_between(cursor, to) / unit_nanos) as i64;
        }

        let at = |n: i64| base.plus(unit, n).and_then(|span| self.advance(from, span));
        let mut count = self.estimate_units(unit, cursor, to);
        if to >= cursor {
            while matches!(at(count), Some(d) if d > *to) {
                count -= 1;
            }
            while matches!(at(count + 1), Some(d) if d <= *to) {
                count += 1;
            }
        } else {
            while matches!(at(count), Some(d) if d < *to) {
                count += 1;
            }
            while matches!(at(count - 1), Some(d) if d >= *to) {
                count -= 1;
            }
        }
        count
    }

    /// Count from local dates alone; close enough that `count_units` only
    /// corrects it by a step or two
    fn estimate_units(&self, unit: CalendarUnit, from: &Instant, to: &Instant) -> i64 {
        let start = self.zone.to_local(from);
        let end = self.zone.to_local(to);
        let months = |local: &NaiveDateTime| i64::from(local.year()) * 12 + i64::from(local.month0());
        match unit {
            CalendarUnit::YEAR => i64::from(end.year()) - i64::from(start.year()),
            CalendarUnit::MONTH => months(&end) - months(&start),
            CalendarUnit::WEEK_OF_YEAR | CalendarUnit::WEEK_OF_MONTH => {
                (end.date() - start.date()).num_days() / 7
            }
            _ => (end.date() - start.date()).num_days(),
        }
    }

    // ========== Component Extraction ==========

    /// Requested fields of `date` in this calendar's zone
    pub fn components(&self, date: &Instant, units: CalendarUnit) -> DateComponents {
        let local = self.zone.to_local(date);
        let day = local.date();
        let mut c = DateComponents::new();

        if units.contains(CalendarUnit::YEAR) {
            c.year = Some(i64::from(day.year()));
        }
        if units.contains(CalendarUnit::MONTH) {
            c.month = Some(i64::from(day.month()));
        }
        if units.contains(CalendarUnit::DAY) {
            c.day = Some(i64::from(day.day()));
        }
        if units.contains(CalendarUnit::HOUR) {
            c.hour = Some(i64::from(local.hour()));
        }
        if units.contains(CalendarUnit::MINUTE) {
            c.minute = Some(i64::from(local.minute()));
        }
        if units.contains(CalendarUnit::SECOND) {
            c.second = Some(i64::from(local.second()));
        }
        if units.contains(CalendarUnit::NANOSECOND) {
            c.nanosecond = Some(i64::from(local.nanosecond()));
        }
        if units.contains(CalendarUnit::WEEKDAY) {
            c.weekday = Some(i64::from(day.weekday().number_from_sunday()));
        }
        if units.contains(CalendarUnit::WEEKDAY_ORDINAL) {
            c.weekday_ordinal = Some(i64::from((day.day() - 1) / 7 + 1));
        }
        if units.contains(CalendarUnit::QUARTER) {
            c.quarter = Some(i64::from(day.month0() / 3 + 1));
        }
        if units.contains(CalendarUnit::WEEK_OF_MONTH) {
            c.week_of_month = Some(self.week_of_month(day));
        }
        if units.contains(CalendarUnit::WEEK_OF_YEAR) || units.contains(CalendarUnit::YEAR_FOR_WEEK_OF_YEAR) {
            let (week_year, week) = self.week_numbering(day);
            if units.contains(CalendarUnit::WEEK_OF_YEAR) {
                c.week_of_year = Some(week);
            }
            if units.contains(CalendarUnit::YEAR_FOR_WEEK_OF_YEAR) {
                c.year_for_week_of_year = Some(i64::from(week_year));
            }
        }
        c
    }

    // ========== Week Numbering ==========

    /// Days between the start of the week and `date` (0-6)
    fn days_into_week(&self, date: NaiveDate) -> u32 {
        (date.weekday().num_days_from_sunday() + 7 - self.first_weekday.num_days_from_sunday()) % 7
    }

    /// First day of week 1 for the period starting at `period_start`
    fn first_week_start(&self, period_start: NaiveDate) -> NaiveDate {
        let back = self.days_into_week(period_start);
        let week_start = period_start - Days::new(u64::from(back));
        if 7 - back >= u32::from(self.minimum_days_in_first_week) {
            week_start
        } else {
            week_start + Days::new(7)
        }
    }

    /// (year for week of year, week of year)
    fn week_numbering(&self, date: NaiveDate) -> (i32, i64) {
        let year = date.year();
        let start_of = |y: i32, fallback: NaiveDate| {
            NaiveDate::from_ymd_opt(y, 1, 1)
                .map(|jan1| self.first_week_start(jan1))
                .unwrap_or(fallback)
        };
        let this_year = start_of(year, NaiveDate::MIN);
        let next_year = start_of(year + 1, NaiveDate::MAX);

        let (week_year, start) = if date < this_year {
            (year - 1, start_of(year - 1, NaiveDate::MIN))
        } else if date >= next_year {
            (year + 1, next_year)
        } else {
            (year, this_year)
        };
        (week_year, (date - start).num_days() / 7 + 1)
    }

    /// Week of month; days before the month's first full week are week 0
    fn week_of_month(&self, date: NaiveDate) -> i64 {
        let first = date.with_day(1).unwrap_or(date);
        (date - self.first_week_start(first)).num_days().div_euclid(7) + 1
    }

    // ========== Period Starts ==========

    /// Local midnight of `date`'s calendar day
    ///
    /// When midnight is skipped by a DST gap, the first instant after the
    /// gap is returned.
    pub fn start_of_day(&self, date: &Instant) -> Instant {
        let day = self.zone.to_local(date).date();
        self.zone.from_local(&day.and_time(NaiveTime::MIN), None)
    }

    /// Local midnight of the first day of `date`'s week
    pub fn start_of_week(&self, date: &Instant) -> Instant {
        let day = self.zone.to_local(date).date();
        let start = day - Days::new(u64::from(self.days_into_week(day)));
        self.zone.from_local(&start.and_time(NaiveTime::MIN), None)
    }

    /// Local midnight of the first day of `date`'s month
    pub fn start_of_month(&self, date: &Instant) -> Instant {
        let day = self.zone.to_local(date).date();
        let start = day.with_day(1).unwrap_or(day);
        self.zone.from_local(&start.and_time(NaiveTime::MIN), None)
    }

    /// Local midnight of January 1st of `date`'s year
    pub fn start_of_year(&self, date: &Instant) -> Instant {
        let day = self.zone.to_local(date).date();
        let start = day.with_ordinal(1).unwrap_or(day);
        self.zone.from_local(&start.and_time(NaiveTime::MIN), None)
    }
}

// ============================================================================
// Civil arithmetic helpers
// ============================================================================

fn add_months(local: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        local.checked_add_months(magnitude)
    } else {
        local.checked_sub_months(magnitude)
    }
}

fn add_days(local: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        local.checked_add_days(magnitude)
    } else {
        local.checked_sub_days(magnitude)
    }
}

/// Accumulated difference: wall-clock months and days, then elapsed nanoseconds
#[derive(Debug, Clone, Copy, Default)]
struct Span {
    months: i64,
    days: i64,
    nanos: i128,
}

impl Span {
    fn plus(self, unit: CalendarUnit, amount: i64) -> Option<Self> {
        let mut span = self;
        match unit {
            CalendarUnit::YEAR => span.months = span.months.checked_add(amount.checked_mul(12)?)?,
            CalendarUnit::MONTH => span.months = span.months.checked_add(amount)?,
            CalendarUnit::WEEK_OF_YEAR | CalendarUnit::WEEK_OF_MONTH => {
                span.days = span.days.checked_add(amount.checked_mul(7)?)?
            }
            CalendarUnit::DAY => span.days = span.days.checked_add(amount)?,
            _ => span.nanos = span.nanos.checked_add(i128::from(amount) * unit.fixed_nanos()?)?,
        }
        Some(span)
    }
}

fn nanos_between(from: &Instant, to: &Instant) -> i128 {
    let secs = i128::from(to.timestamp()) - i128::from(from.timestamp());
    let nanos = i128::from(to.timestamp_subsec_nanos()) - i128::from(from.timestamp_subsec_nanos());
    secs * 1_000_000_000 + nanos
}
