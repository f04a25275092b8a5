//! Calendar-relative date operations
//!
//! Relative dates, same-period predicates, date roles, adjustment, intervals
//! and single-field decomposition. Everything here is expressed through the
//! calendar primitives (`adding`, `difference`, `components`), so it inherits
//! their zone and DST behaviour. "Now" always comes from the calendar's clock.

use chrono::Timelike;

use crate::{Calendar, CalendarUnit, DateComponents, Instant};

impl Calendar {
    // ========== Relative Dates ==========

    /// Now plus one calendar day
    pub fn tomorrow(&self) -> Instant {
        self.days_from_now(1)
    }

    /// Now minus one calendar day
    pub fn yesterday(&self) -> Instant {
        self.days_before_now(1)
    }

    pub fn minutes_from_now(&self, minutes: i64) -> Instant {
        self.adding_minutes(&self.now(), minutes)
    }

    pub fn minutes_before_now(&self, minutes: i64) -> Instant {
        self.subtracting_minutes(&self.now(), minutes)
    }

    pub fn hours_from_now(&self, hours: i64) -> Instant {
        self.adding_hours(&self.now(), hours)
    }

    pub fn hours_before_now(&self, hours: i64) -> Instant {
        self.subtracting_hours(&self.now(), hours)
    }

    pub fn days_from_now(&self, days: i64) -> Instant {
        self.adding_days(&self.now(), days)
    }

    pub fn days_before_now(&self, days: i64) -> Instant {
        self.subtracting_days(&self.now(), days)
    }

    // ========== Comparing Dates ==========

    fn same_fields(&self, a: &Instant, b: &Instant, units: CalendarUnit) -> bool {
        self.components(a, units) == self.components(b, units)
    }

    /// Same local calendar day
    pub fn is_equal_ignoring_time(&self, a: &Instant, b: &Instant) -> bool {
        self.same_fields(a, b, CalendarUnit::YEAR | CalendarUnit::MONTH | CalendarUnit::DAY)
    }

    /// Equal down to the second
    ///
    /// Compares whole seconds since the epoch, so the two occurrences of a
    /// repeated wall time in a DST overlap stay distinct.
    pub fn is_equal_ignoring_nanoseconds(&self, a: &Instant, b: &Instant) -> bool {
        a.timestamp() == b.timestamp()
    }

    pub fn is_same_day(&self, a: &Instant, b: &Instant) -> bool {
        self.is_equal_ignoring_time(a, b)
    }

    /// Same (year for week of year, week of year) under this calendar's week rules
    pub fn is_same_week(&self, a: &Instant, b: &Instant) -> bool {
        self.same_fields(a, b, CalendarUnit::WEEK_OF_YEAR | CalendarUnit::YEAR_FOR_WEEK_OF_YEAR)
    }

    pub fn is_same_month(&self, a: &Instant, b: &Instant) -> bool {
        self.same_fields(a, b, CalendarUnit::YEAR | CalendarUnit::MONTH)
    }

    pub fn is_same_year(&self, a: &Instant, b: &Instant) -> bool {
        self.same_fields(a, b, CalendarUnit::YEAR)
    }

    /// Now moved by `amount` of `unit`
    fn now_shifted(&self, unit: CalendarUnit, amount: i64) -> Instant {
        self.adding(&self.now(), unit, amount)
    }

    pub fn is_today(&self, date: &Instant) -> bool {
        self.is_same_day(date, &self.now())
    }

    pub fn is_tomorrow(&self, date: &Instant) -> bool {
        self.is_same_day(date, &self.now_shifted(CalendarUnit::DAY, 1))
    }

    pub fn is_yesterday(&self, date: &Instant) -> bool {
        self.is_same_day(date, &self.now_shifted(CalendarUnit::DAY, -1))
    }

    pub fn is_this_week(&self, date: &Instant) -> bool {
        self.is_same_week(date, &self.now())
    }

    pub fn is_next_week(&self, date: &Instant) -> bool {
        self.is_same_week(date, &self.now_shifted(CalendarUnit::WEEK_OF_YEAR, 1))
    }

    pub fn is_last_week(&self, date: &Instant) -> bool {
        self.is_same_week(date, &self.now_shifted(CalendarUnit::WEEK_OF_YEAR, -1))
    }

    pub fn is_this_month(&self, date: &Instant) -> bool {
        self.is_same_month(date, &self.now())
    }

    pub fn is_this_year(&self, date: &Instant) -> bool {
        self.is_same_year(date, &self.now())
    }

    pub fn is_next_year(&self, date: &Instant) -> bool {
        self.is_same_year(date, &self.now_shifted(CalendarUnit::YEAR, 1))
    }

    pub fn is_last_year(&self, date: &Instant) -> bool {
        self.is_same_year(date, &self.now_shifted(CalendarUnit::YEAR, -1))
    }

    /// Strictly before; false for equal instants
    pub fn is_earlier_than(&self, a: &Instant, b: &Instant) -> bool {
        a < b
    }

    /// Strictly after; false for equal instants
    pub fn is_later_than(&self, a: &Instant, b: &Instant) -> bool {
        a > b
    }

    pub fn is_in_the_future(&self, date: &Instant) -> bool {
        self.is_later_than(date, &self.now())
    }

    pub fn is_in_the_past(&self, date: &Instant) -> bool {
        self.is_earlier_than(date, &self.now())
    }

    // ========== Date Roles ==========

    /// Monday through Friday
    pub fn is_workday(&self, date: &Instant) -> bool {
        !self.is_weekend(date)
    }

    /// Saturday (7) or Sunday (1)
    pub fn is_weekend(&self, date: &Instant) -> bool {
        matches!(self.weekday(date), 1 | 7)
    }

    // ========== Adjusting Dates ==========

    pub fn adding_minutes(&self, date: &Instant, minutes: i64) -> Instant {
        self.adding(date, CalendarUnit::MINUTE, minutes)
    }

    pub fn subtracting_minutes(&self, date: &Instant, minutes: i64) -> Instant {
        self.adding(date, CalendarUnit::MINUTE, minutes.saturating_neg())
    }

    pub fn adding_hours(&self, date: &Instant, hours: i64) -> Instant {
        self.adding(date, CalendarUnit::HOUR, hours)
    }

    pub fn subtracting_hours(&self, date: &Instant, hours: i64) -> Instant {
        self.adding(date, CalendarUnit::HOUR, hours.saturating_neg())
    }

    /// Same wall-clock time `days` calendar days later
    pub fn adding_days(&self, date: &Instant, days: i64) -> Instant {
        self.adding(date, CalendarUnit::DAY, days)
    }

    pub fn subtracting_days(&self, date: &Instant, days: i64) -> Instant {
        self.adding(date, CalendarUnit::DAY, days.saturating_neg())
    }

    // ========== Intervals ==========
    //
    // `x_after(a, b)` counts units from `b` to `a`; `x_before(a, b)` counts
    // from `a` to `b`. A negative count means the argument was on the other
    // side.

    fn units_between(&self, unit: CalendarUnit, from: &Instant, to: &Instant) -> i64 {
        self.difference(unit, from, to).get(unit).unwrap_or(0)
    }

    pub fn seconds_after(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::SECOND, b, a)
    }

    pub fn seconds_before(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::SECOND, a, b)
    }

    pub fn minutes_after(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::MINUTE, b, a)
    }

    pub fn minutes_before(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::MINUTE, a, b)
    }

    pub fn hours_after(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::HOUR, b, a)
    }

    pub fn hours_before(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::HOUR, a, b)
    }

    /// Whole calendar days from `b` to `a`
    pub fn days_after(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::DAY, b, a)
    }

    pub fn days_before(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::DAY, a, b)
    }

    pub fn years_after(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::YEAR, b, a)
    }

    pub fn years_before(&self, a: &Instant, b: &Instant) -> i64 {
        self.units_between(CalendarUnit::YEAR, a, b)
    }

    // ========== Decomposing Dates ==========

    /// Elapsed year..nanosecond components from `other` to `date`
    pub fn components_spanning(&self, date: &Instant, other: &Instant) -> DateComponents {
        self.components_spanning_units(CalendarUnit::DIFFERENCE_ALL, date, other)
    }

    /// Elapsed components from `other` to `date`, restricted to `units`
    pub fn components_spanning_units(&self, units: CalendarUnit, date: &Instant, other: &Instant) -> DateComponents {
        self.difference(units, other, date)
    }

    pub fn date_and_time_components(&self, date: &Instant) -> DateComponents {
        self.components(date, CalendarUnit::DATE_AND_TIME)
    }

    pub fn time_components(&self, date: &Instant) -> DateComponents {
        self.components(date, CalendarUnit::TIME)
    }

    fn field(&self, date: &Instant, unit: CalendarUnit) -> i64 {
        self.components(date, unit).get(unit).unwrap_or(0)
    }

    /// `date` rounded to the closer local hour; minute 30 and above rounds up
    pub fn date_at_nearest_hour(&self, date: &Instant) -> Instant {
        let offset = self.zone().offset_at(date);
        let local = self.zone().to_local(date);
        let truncated = local
            .with_nanosecond(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_minute(0))
            .unwrap_or(local);
        let hour_start = self.zone().from_local(&truncated, Some(offset));
        if local.minute() >= 30 {
            self.adding(&hour_start, CalendarUnit::HOUR, 1)
        } else {
            hour_start
        }
    }

    /// Local hour (0-23) of `date` rounded to the closer hour
    pub fn nearest_hour(&self, date: &Instant) -> i64 {
        self.hour(&self.date_at_nearest_hour(date))
    }

    pub fn hour(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::HOUR)
    }

    pub fn minute(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::MINUTE)
    }

    pub fn second(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::SECOND)
    }

    pub fn nanosecond(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::NANOSECOND)
    }

    pub fn day(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::DAY)
    }

    /// 1 = Sunday .. 7 = Saturday
    pub fn weekday(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::WEEKDAY)
    }

    /// Which occurrence of its weekday `date` is within the month
    pub fn nth_weekday(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::WEEKDAY_ORDINAL)
    }

    pub fn week_of_year(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::WEEK_OF_YEAR)
    }

    pub fn month(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::MONTH)
    }

    pub fn year(&self, date: &Instant) -> i64 {
        self.field(date, CalendarUnit::YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Clock, Zone};
    use chrono::{TimeDelta, TimeZone, Utc};
    use chrono_tz::America::New_York;
    use chrono_tz::Europe::London;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> Instant {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    /// UTC Gregorian calendar frozen at Monday 2024-01-15T10:00:00Z
    fn monday_calendar() -> Calendar {
        Calendar::gregorian(Zone::Utc).with_clock(Clock::Fixed(utc(2024, 1, 15, 10, 0, 0)))
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    fn test_monday_scenario() {
        let cal = monday_calendar();
        let now = cal.now();
        assert!(cal.is_workday(&now));
        assert!(!cal.is_weekend(&now));
        assert_eq!(cal.tomorrow(), utc(2024, 1, 16, 10, 0, 0));
        assert_eq!(cal.start_of_day(&now), utc(2024, 1, 15, 0, 0, 0));
        assert_eq!(cal.days_after(&now, &utc(2024, 1, 10, 10, 0, 0)), 5);
    }

    #[test]
    fn test_relative_dates() {
        let cal = monday_calendar();
        assert_eq!(cal.yesterday(), utc(2024, 1, 14, 10, 0, 0));
        assert_eq!(cal.minutes_from_now(90), utc(2024, 1, 15, 11, 30, 0));
        assert_eq!(cal.minutes_before_now(15), utc(2024, 1, 15, 9, 45, 0));
        assert_eq!(cal.hours_from_now(14), utc(2024, 1, 16, 0, 0, 0));
        assert_eq!(cal.hours_before_now(11), utc(2024, 1, 14, 23, 0, 0));
        assert_eq!(cal.days_from_now(17), utc(2024, 2, 1, 10, 0, 0));
        assert_eq!(cal.days_before_now(15), utc(2023, 12, 31, 10, 0, 0));
        assert_eq!(cal.days_from_now(-1), cal.yesterday());
    }

    #[test]
    fn test_tomorrow_keeps_wall_time_across_dst() {
        init_tracing();
        let zone = Zone::Named(New_York);
        let base = Calendar::gregorian(zone);
        let now = base.ymd_hms(2024, 3, 9, 8, 15, 0).unwrap();
        let cal = base.with_clock(Clock::Fixed(now));
        let tomorrow = cal.tomorrow();
        assert_eq!(cal.hour(&tomorrow), 8);
        assert_eq!(cal.minute(&tomorrow), 15);
        assert_eq!(tomorrow - now, TimeDelta::hours(23));
    }

    #[test]
    fn test_same_period_predicates() {
        let cal = monday_calendar();
        let now = cal.now();
        assert!(cal.is_today(&utc(2024, 1, 15, 23, 59, 59)));
        assert!(!cal.is_today(&utc(2024, 1, 16, 0, 0, 0)));
        assert!(cal.is_tomorrow(&utc(2024, 1, 16, 0, 0, 0)));
        assert!(cal.is_yesterday(&utc(2024, 1, 14, 0, 0, 0)));

        // Sunday-start weeks: 2024-01-14 (Sun) .. 2024-01-20 (Sat)
        assert!(cal.is_this_week(&utc(2024, 1, 14, 0, 0, 0)));
        assert!(cal.is_this_week(&utc(2024, 1, 20, 23, 0, 0)));
        assert!(!cal.is_this_week(&utc(2024, 1, 13, 23, 0, 0)));
        assert!(cal.is_next_week(&utc(2024, 1, 21, 0, 0, 0)));
        assert!(cal.is_last_week(&utc(2024, 1, 13, 0, 0, 0)));

        assert!(cal.is_this_month(&utc(2024, 1, 31, 0, 0, 0)));
        assert!(!cal.is_this_month(&utc(2024, 2, 1, 0, 0, 0)));
        assert!(cal.is_this_year(&utc(2024, 12, 31, 0, 0, 0)));
        assert!(cal.is_next_year(&utc(2025, 6, 1, 0, 0, 0)));
        assert!(cal.is_last_year(&utc(2023, 6, 1, 0, 0, 0)));
        assert!(!cal.is_next_year(&now));
    }

    #[test]
    fn test_same_week_is_not_proximity() {
        let cal = monday_calendar();
        // Six days apart, on either side of the Saturday/Sunday boundary
        let saturday = utc(2024, 1, 13, 12, 0, 0);
        let friday = utc(2024, 1, 19, 12, 0, 0);
        assert!(!cal.is_same_week(&saturday, &friday));
        // Twelve hours apart across the same boundary
        assert!(!cal.is_same_week(&saturday, &utc(2024, 1, 14, 0, 0, 0)));
        assert!(cal.is_same_week(&utc(2024, 1, 14, 0, 0, 0), &friday));
    }

    #[test]
    fn test_same_week_across_year_boundary() {
        let cal = Calendar::iso8601(Zone::Utc);
        // ISO week 1 of 2025 runs from 2024-12-30 to 2025-01-05
        assert!(cal.is_same_week(&utc(2024, 12, 30, 0, 0, 0), &utc(2025, 1, 5, 0, 0, 0)));
        assert!(!cal.is_same_week(&utc(2024, 12, 29, 0, 0, 0), &utc(2024, 12, 30, 0, 0, 0)));
    }

    #[test]
    fn test_equal_ignoring() {
        let cal = monday_calendar();
        let a = utc(2024, 1, 15, 10, 0, 0);
        let b = a + TimeDelta::nanoseconds(999_999_999);
        assert!(cal.is_equal_ignoring_nanoseconds(&a, &b));
        assert!(!cal.is_equal_ignoring_nanoseconds(&a, &(a + TimeDelta::seconds(1))));
        assert!(cal.is_equal_ignoring_time(&a, &utc(2024, 1, 15, 0, 0, 0)));
        assert!(!cal.is_equal_ignoring_time(&a, &utc(2023, 1, 15, 10, 0, 0)));
    }

    #[test]
    fn test_equal_ignoring_nanoseconds_in_overlap() {
        let cal = Calendar::gregorian(Zone::Named(New_York));
        // 01:30 EDT and 01:30 EST on 2024-11-03 share every local field
        let first = utc(2024, 11, 3, 5, 30, 0);
        let second = utc(2024, 11, 3, 6, 30, 0);
        assert_eq!(cal.date_and_time_components(&first), cal.date_and_time_components(&second));
        assert!(!cal.is_equal_ignoring_nanoseconds(&first, &second));
        assert!(cal.is_equal_ignoring_nanoseconds(&first, &(first + TimeDelta::milliseconds(999))));
        assert!(cal.is_equal_ignoring_time(&first, &second));
    }

    #[test]
    fn test_same_day_uses_calendar_zone() {
        let cal = Calendar::gregorian(Zone::Named(New_York));
        // Same UTC day, different New York days
        let a = utc(2024, 1, 15, 3, 0, 0);
        let b = utc(2024, 1, 15, 12, 0, 0);
        assert!(!cal.is_same_day(&a, &b));
        assert!(Calendar::gregorian(Zone::Utc).is_same_day(&a, &b));
    }

    #[test]
    fn test_reflexivity() {
        let cal = Calendar::gregorian(Zone::Named(London));
        for d in [utc(2024, 3, 31, 1, 30, 0), utc(1969, 12, 31, 23, 59, 59), utc(2000, 2, 29, 12, 0, 0)] {
            assert!(cal.is_equal_ignoring_time(&d, &d));
            assert!(cal.is_same_day(&d, &d));
            assert!(!cal.is_earlier_than(&d, &d));
            assert!(!cal.is_later_than(&d, &d));
        }
    }

    #[test]
    fn test_ordering() {
        let cal = monday_calendar();
        let now = cal.now();
        let later = now + TimeDelta::seconds(1);
        assert!(cal.is_earlier_than(&now, &later));
        assert!(cal.is_later_than(&later, &now));
        assert!(cal.is_in_the_future(&later));
        assert!(!cal.is_in_the_future(&now));
        assert!(!cal.is_in_the_past(&now));
        assert!(cal.is_in_the_past(&(now - TimeDelta::nanoseconds(1))));
    }

    #[test]
    fn test_roles_exclusive() {
        let cal = monday_calendar();
        let expected = [false, false, false, false, false, true, true]; // Mon..Sun
        for (offset, weekend) in expected.iter().enumerate() {
            let d = cal.adding_days(&cal.now(), offset as i64);
            assert_eq!(cal.is_weekend(&d), *weekend, "{}", d);
            assert_ne!(cal.is_workday(&d), cal.is_weekend(&d));
        }
    }

    #[test]
    fn test_roles_ignore_first_weekday() {
        let cal = Calendar::iso8601(Zone::Utc);
        let sunday = utc(2024, 1, 14, 12, 0, 0);
        assert_eq!(cal.weekday(&sunday), 1);
        assert!(cal.is_weekend(&sunday));
    }

    #[test]
    fn test_adjusting() {
        let cal = monday_calendar();
        let d = cal.now();
        assert_eq!(cal.adding_minutes(&d, 61), utc(2024, 1, 15, 11, 1, 0));
        assert_eq!(cal.subtracting_minutes(&d, 601), utc(2024, 1, 14, 23, 59, 0));
        assert_eq!(cal.adding_hours(&d, -10), utc(2024, 1, 15, 0, 0, 0));
        assert_eq!(cal.subtracting_hours(&d, 24), utc(2024, 1, 14, 10, 0, 0));
        assert_eq!(cal.adding_days(&d, 366), utc(2025, 1, 15, 10, 0, 0));
        assert_eq!(cal.subtracting_days(&d, 45), utc(2023, 12, 1, 10, 0, 0));
    }

    #[test]
    fn test_day_round_trip_across_dst() {
        for zone in [Zone::Named(New_York), Zone::Named(London), Zone::Utc] {
            let cal = Calendar::gregorian(zone);
            let starts = [
                cal.ymd_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                cal.ymd_hms(2024, 10, 20, 12, 34, 56).unwrap(),
                cal.ymd_hms(2024, 11, 2, 23, 30, 0).unwrap(),
            ];
            for d in starts {
                for n in [0, 1, 7, 30, 200, 400] {
                    let there = cal.adding_days(&d, n);
                    assert_eq!(cal.subtracting_days(&there, n), d, "{} + {} days in {}", d, n, zone);
                }
            }
        }
    }

    #[test]
    fn test_day_into_dst_gap_does_not_round_trip() {
        let cal = Calendar::gregorian(Zone::Named(New_York));
        // 02:30 on 2024-03-10 does not exist; it is read as EST, i.e. 03:30 EDT
        let start = cal.ymd_hms(2024, 3, 9, 2, 30, 0).unwrap();
        assert_eq!(start, utc(2024, 3, 9, 7, 30, 0));
        let next = cal.adding_days(&start, 1);
        assert_eq!(next, utc(2024, 3, 10, 7, 30, 0));
        assert_eq!((cal.hour(&next), cal.minute(&next)), (3, 30));
        // Going back keeps the 03:30 wall time
        assert_eq!(cal.subtracting_days(&next, 1), utc(2024, 3, 9, 8, 30, 0));
    }

    #[test]
    fn test_start_of_day_consistent_for_same_day() {
        let cal = Calendar::gregorian(Zone::Named(New_York));
        let morning = cal.ymd_hms(2024, 3, 10, 0, 30, 0).unwrap();
        let evening = cal.ymd_hms(2024, 3, 10, 23, 30, 0).unwrap();
        assert!(cal.is_same_day(&morning, &evening));
        assert_eq!(cal.start_of_day(&morning), cal.start_of_day(&evening));
        assert_eq!(cal.start_of_day(&evening), utc(2024, 3, 10, 5, 0, 0));
    }

    #[test]
    fn test_interval_sign_symmetry() {
        let cal = monday_calendar();
        let a = utc(2024, 1, 15, 10, 0, 0);
        let b = utc(2021, 6, 30, 18, 45, 10);
        assert_eq!(cal.days_after(&a, &b), -cal.days_after(&b, &a));
        assert_eq!(cal.days_before(&a, &b), cal.days_after(&b, &a));
        assert_eq!(cal.days_before(&a, &b), -cal.days_after(&a, &b));
        assert_eq!(cal.years_after(&a, &b), 2);
        assert_eq!(cal.years_before(&a, &b), -2);
        assert_eq!(cal.hours_after(&a, &b), cal.seconds_after(&a, &b) / 3600);
        assert_eq!(cal.minutes_before(&a, &b), -cal.minutes_after(&a, &b));
        assert_eq!(cal.seconds_before(&b, &a), cal.seconds_after(&a, &b));
        assert_eq!(cal.hours_before(&b, &a), cal.hours_after(&a, &b));
    }

    #[test]
    fn test_interval_wrong_side_is_negative() {
        let cal = monday_calendar();
        let now = cal.now();
        let future = utc(2024, 1, 20, 10, 0, 0);
        assert_eq!(cal.days_after(&now, &future), -5);
        assert_eq!(cal.days_before(&now, &future), 5);
        assert_eq!(cal.minutes_after(&now, &now), 0);
    }

    #[test]
    fn test_days_are_calendar_days_across_dst() {
        let cal = Calendar::gregorian(Zone::Named(New_York));
        let a = cal.ymd_hms(2024, 3, 10, 10, 0, 0).unwrap();
        let b = cal.ymd_hms(2024, 3, 9, 10, 0, 0).unwrap();
        assert_eq!(cal.days_after(&a, &b), 1);
        assert_eq!(cal.hours_after(&a, &b), 23);
    }

    #[test]
    fn test_components_spanning() {
        let cal = monday_calendar();
        let a = utc(2024, 1, 15, 10, 0, 0);
        let b = utc(2022, 11, 10, 8, 30, 0);
        let c = cal.components_spanning(&a, &b);
        assert_eq!(c.year, Some(1));
        assert_eq!(c.month, Some(2));
        assert_eq!(c.day, Some(5));
        assert_eq!(c.hour, Some(1));
        assert_eq!(c.minute, Some(30));
        assert_eq!(c.weekday, None);

        let reversed = cal.components_spanning(&b, &a);
        assert_eq!(reversed.year, Some(-1));

        let days = cal.components_spanning_units(CalendarUnit::DAY, &a, &b);
        assert_eq!(days.day, Some(431));
        assert_eq!(days.defined_units(), CalendarUnit::DAY);
    }

    #[test]
    fn test_fixed_masks() {
        let cal = monday_calendar();
        let d = utc(2024, 1, 15, 10, 20, 30) + TimeDelta::nanoseconds(5);
        let time = cal.time_components(&d);
        assert_eq!((time.hour, time.minute, time.second, time.nanosecond), (Some(10), Some(20), Some(30), Some(5)));
        assert_eq!(time.year, None);
        let full = cal.date_and_time_components(&d);
        assert_eq!((full.year, full.month, full.day), (Some(2024), Some(1), Some(15)));
        assert_eq!(full.weekday, Some(2));
        assert_eq!(full.week_of_year, None);
    }

    #[test]
    fn test_scalar_accessors() {
        let cal = monday_calendar();
        let d = utc(2024, 2, 29, 13, 45, 7) + TimeDelta::nanoseconds(42);
        assert_eq!(cal.year(&d), 2024);
        assert_eq!(cal.month(&d), 2);
        assert_eq!(cal.day(&d), 29);
        assert_eq!(cal.hour(&d), 13);
        assert_eq!(cal.minute(&d), 45);
        assert_eq!(cal.second(&d), 7);
        assert_eq!(cal.nanosecond(&d), 42);
        assert_eq!(cal.weekday(&d), 5); // Thursday
        assert_eq!(cal.nth_weekday(&d), 5);
        assert_eq!(cal.week_of_year(&d), 9);
    }

    #[test]
    fn test_nearest_hour_boundary() {
        let cal = monday_calendar();
        let down = utc(2024, 1, 15, 10, 29, 59);
        let up = utc(2024, 1, 15, 10, 30, 0);
        assert_eq!(cal.nearest_hour(&down), 10);
        assert_eq!(cal.date_at_nearest_hour(&down), utc(2024, 1, 15, 10, 0, 0));
        assert_eq!(cal.nearest_hour(&up), 11);
        assert_eq!(cal.date_at_nearest_hour(&up), utc(2024, 1, 15, 11, 0, 0));
    }

    #[test]
    fn test_nearest_hour_carries_date() {
        let cal = monday_calendar();
        let d = utc(2024, 12, 31, 23, 30, 0);
        assert_eq!(cal.nearest_hour(&d), 0);
        assert_eq!(cal.date_at_nearest_hour(&d), utc(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_nearest_hour_fixed_offset_zone() {
        let cal = Calendar::gregorian("+05:30".parse().unwrap());
        // 10:15 UTC is 15:45 local
        let d = utc(2024, 1, 15, 10, 15, 0);
        assert_eq!(cal.nearest_hour(&d), 16);
        assert_eq!(cal.date_at_nearest_hour(&d), utc(2024, 1, 15, 10, 30, 0));
    }
}
