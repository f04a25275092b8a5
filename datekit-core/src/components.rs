//! Calendar units and sparse date components
//!
//! `CalendarUnit` is a bit mask naming calendar fields. `DateComponents`
//! holds a value for each requested field; fields that were not requested
//! are `None` (undefined), which is distinct from `Some(0)`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

// ============================================================================
// CalendarUnit
// ============================================================================

/// A set of calendar units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CalendarUnit(u32);

impl CalendarUnit {
    pub const YEAR: Self = Self(1 << 0);
    pub const MONTH: Self = Self(1 << 1);
    pub const DAY: Self = Self(1 << 2);
    pub const HOUR: Self = Self(1 << 3);
    pub const MINUTE: Self = Self(1 << 4);
    pub const SECOND: Self = Self(1 << 5);
    pub const NANOSECOND: Self = Self(1 << 6);
    /// Day of week, 1 = Sunday .. 7 = Saturday
    pub const WEEKDAY: Self = Self(1 << 7);
    /// Occurrence of the weekday within the month (the 2nd Tuesday is 2)
    pub const WEEKDAY_ORDINAL: Self = Self(1 << 8);
    pub const QUARTER: Self = Self(1 << 9);
    pub const WEEK_OF_MONTH: Self = Self(1 << 10);
    pub const WEEK_OF_YEAR: Self = Self(1 << 11);
    pub const YEAR_FOR_WEEK_OF_YEAR: Self = Self(1 << 12);

    pub const NONE: Self = Self(0);

    /// Every supported unit
    pub const ALL: Self = Self((1 << 13) - 1);

    /// Calendar date plus wall-clock time
    pub const DATE_AND_TIME: Self = Self(
        Self::YEAR.0
            | Self::MONTH.0
            | Self::DAY.0
            | Self::HOUR.0
            | Self::MINUTE.0
            | Self::SECOND.0
            | Self::NANOSECOND.0
            | Self::WEEKDAY.0,
    );

    /// Wall-clock time only
    pub const TIME: Self = Self(Self::HOUR.0 | Self::MINUTE.0 | Self::SECOND.0 | Self::NANOSECOND.0);

    /// Units that can be measured between two instants, largest first
    pub const DIFFERENCE_ALL: Self = Self(
        Self::YEAR.0
            | Self::MONTH.0
            | Self::DAY.0
            | Self::HOUR.0
            | Self::MINUTE.0
            | Self::SECOND.0
            | Self::NANOSECOND.0,
    );

    /// Order in which differences are filled
    pub(crate) const DIFFERENCE_ORDER: [Self; 9] = [
        Self::YEAR,
        Self::MONTH,
        Self::WEEK_OF_YEAR,
        Self::WEEK_OF_MONTH,
        Self::DAY,
        Self::HOUR,
        Self::MINUTE,
        Self::SECOND,
        Self::NANOSECOND,
    ];

    /// Raw bit representation
    pub fn bits(self) -> u32 {
        self.0
    }

    /// True if every unit in `other` is in `self`
    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Length of the unit when it is a fixed span of elapsed time
    pub(crate) fn fixed_nanos(self) -> Option<i128> {
        match self {
            Self::HOUR => Some(3_600_000_000_000),
            Self::MINUTE => Some(60_000_000_000),
            Self::SECOND => Some(1_000_000_000),
            Self::NANOSECOND => Some(1),
            _ => None,
        }
    }
}

impl BitOr for CalendarUnit {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CalendarUnit {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ============================================================================
// DateComponents
// ============================================================================

/// Sparse calendar fields
///
/// Produced either by decomposing an instant (absolute values) or by
/// differencing two instants (elapsed units, signed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateComponents {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hour: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub minute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub second: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nanosecond: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weekday: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weekday_ordinal: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quarter: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub week_of_month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub week_of_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub year_for_week_of_year: Option<i64>,
}

impl DateComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a single unit (None if undefined or `unit` is not a single unit)
    pub fn get(&self, unit: CalendarUnit) -> Option<i64> {
        match unit {
            CalendarUnit::YEAR => self.year,
            CalendarUnit::MONTH => self.month,
            CalendarUnit::DAY => self.day,
            CalendarUnit::HOUR => self.hour,
            CalendarUnit::MINUTE => self.minute,
            CalendarUnit::SECOND => self.second,
            CalendarUnit::NANOSECOND => self.nanosecond,
            CalendarUnit::WEEKDAY => self.weekday,
            CalendarUnit::WEEKDAY_ORDINAL => self.weekday_ordinal,
            CalendarUnit::QUARTER => self.quarter,
            CalendarUnit::WEEK_OF_MONTH => self.week_of_month,
            CalendarUnit::WEEK_OF_YEAR => self.week_of_year,
            CalendarUnit::YEAR_FOR_WEEK_OF_YEAR => self.year_for_week_of_year,
            _ => None,
        }
    }

    /// Set a single unit; masks naming several units are ignored
    pub fn set(&mut self, unit: CalendarUnit, value: i64) {
        let slot = match unit {
            CalendarUnit::YEAR => &mut self.year,
            CalendarUnit::MONTH => &mut self.month,
            CalendarUnit::DAY => &mut self.day,
            CalendarUnit::HOUR => &mut self.hour,
            CalendarUnit::MINUTE => &mut self.minute,
            CalendarUnit::SECOND => &mut self.second,
            CalendarUnit::NANOSECOND => &mut self.nanosecond,
            CalendarUnit::WEEKDAY => &mut self.weekday,
            CalendarUnit::WEEKDAY_ORDINAL => &mut self.weekday_ordinal,
            CalendarUnit::QUARTER => &mut self.quarter,
            CalendarUnit::WEEK_OF_MONTH => &mut self.week_of_month,
            CalendarUnit::WEEK_OF_YEAR => &mut self.week_of_year,
            CalendarUnit::YEAR_FOR_WEEK_OF_YEAR => &mut self.year_for_week_of_year,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Units that hold a value
    pub fn defined_units(&self) -> CalendarUnit {
        let mut units = CalendarUnit::NONE;
        for bit in 0..13 {
            let unit = CalendarUnit(1 << bit);
            if self.get(unit).is_some() {
                units |= unit;
            }
        }
        units
    }
}

impl fmt::Display for DateComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("year", self.year),
            ("month", self.month),
            ("day", self.day),
            ("hour", self.hour),
            ("minute", self.minute),
            ("second", self.second),
            ("nanosecond", self.nanosecond),
            ("weekday", self.weekday),
            ("weekday_ordinal", self.weekday_ordinal),
            ("quarter", self.quarter),
            ("week_of_month", self.week_of_month),
            ("week_of_year", self.week_of_year),
            ("year_for_week_of_year", self.year_for_week_of_year),
        ];
        let mut first = true;
        write!(f, "{{")?;
        for (name, value) in fields {
            if let Some(v) = value {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", name, v)?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}
