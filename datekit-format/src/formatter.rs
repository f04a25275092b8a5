//! Pre-configured date formatters
//!
//! Every constructor returns a fresh `DateFormatter` that owns its compiled
//! pattern, zone and locale; formatters share no state with each other.

use std::fmt::{self, Write};

use chrono::format::{parse, Item, Parsed};
use chrono::{Local, NaiveTime, TimeZone, Utc};

use datekit_core::{DateKitError, Instant, Zone};

use crate::pattern;

pub const RFC822_PATTERN: &str = "EEE, dd MMM yyyy HH:mm:ss Z";
pub const RFC3339_PATTERN: &str = "yyyy-MM-dd'T'HH:mm:ssxxxxx";

// ============================================================================
// Styles and locales
// ============================================================================

/// Predefined date or time rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatStyle {
    Short,
    Medium,
    Long,
    Full,
}

impl FormatStyle {
    /// Pattern used for the date part
    pub fn date_pattern(self) -> &'static str {
        match self {
            FormatStyle::Short => "M/d/yy",
            FormatStyle::Medium => "MMM d, y",
            FormatStyle::Long => "MMMM d, y",
            FormatStyle::Full => "EEEE, MMMM d, y",
        }
    }

    /// Pattern used for the time part
    pub fn time_pattern(self) -> &'static str {
        match self {
            FormatStyle::Short => "h:mm a",
            FormatStyle::Medium => "h:mm:ss a",
            FormatStyle::Long => "h:mm:ss a z",
            FormatStyle::Full => "h:mm:ss a zzzz",
        }
    }
}

/// Locale label carried by a formatter
///
/// The label does not change output: month and weekday names render in
/// English under both variants. `Posix` tags the fixed RFC formatters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FormatLocale {
    #[default]
    Default,
    Posix,
}

impl FormatLocale {
    pub fn identifier(self) -> &'static str {
        match self {
            FormatLocale::Default => "current",
            FormatLocale::Posix => "en_US_POSIX",
        }
    }
}

// ============================================================================
// DateFormatter
// ============================================================================

/// Converts instants to and from text with a fixed pattern
#[derive(Debug, Clone)]
pub struct DateFormatter {
    pattern: String,
    items: Vec<Item<'static>>,
    zone: Zone,
    locale: FormatLocale,
}

impl DateFormatter {
    // ========== Factories ==========

    /// Formatter for an explicit Unicode pattern in the host zone
    ///
    /// Any pattern is accepted; letters without a mapping render literally.
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let items = pattern::compile(&pattern);
        Self {
            pattern,
            items,
            zone: Zone::Local,
            locale: FormatLocale::Default,
        }
    }

    /// Formatter rendering only the time, in the given style
    pub fn with_time_style(style: FormatStyle) -> Self {
        Self::with_pattern(style.time_pattern())
    }

    /// Formatter rendering only the date, in the given style
    pub fn with_date_style(style: FormatStyle) -> Self {
        Self::with_pattern(style.date_pattern())
    }

    /// RFC 822 date-time, e.g. `Thu, 01 Jan 1970 00:00:00 +0000`
    pub fn rfc822() -> Self {
        Self::with_pattern(RFC822_PATTERN)
            .with_locale(FormatLocale::Posix)
            .with_zone(Zone::Utc)
    }

    /// RFC 3339 date-time, e.g. `1970-01-01T00:00:00+00:00`
    pub fn rfc3339() -> Self {
        Self::with_pattern(RFC3339_PATTERN)
            .with_locale(FormatLocale::Posix)
            .with_zone(Zone::Utc)
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_locale(mut self, locale: FormatLocale) -> Self {
        self.locale = locale;
        self
    }

    // ========== Accessors ==========

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn locale(&self) -> FormatLocale {
        self.locale
    }

    // ========== Conversion ==========

    /// Render `instant` in this formatter's zone
    pub fn format(&self, instant: &Instant) -> String {
        match self.zone {
            Zone::Local => render(instant, &Local, &self.items),
            Zone::Utc => render(instant, &Utc, &self.items),
            Zone::Fixed(offset) => render(instant, &offset, &self.items),
            Zone::Named(tz) => render(instant, &tz, &self.items),
        }
    }

    /// Parse text produced with this formatter's pattern
    ///
    /// An offset in the text wins; otherwise the wall time is read in the
    /// formatter's zone. Patterns without time fields yield local midnight.
    pub fn parse(&self, text: &str) -> Result<Instant, DateKitError> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, self.items.iter())
            .map_err(|e| DateKitError::Parse(format!("{}: {:?}", e, text)))?;

        if let Ok(dt) = parsed.to_datetime() {
            return Ok(dt.with_timezone(&Utc));
        }
        let local = match parsed.to_naive_datetime_with_offset(0) {
            Ok(local) => local,
            Err(err) => parsed
                .to_naive_date()
                .map(|date| date.and_time(NaiveTime::MIN))
                .map_err(|_| DateKitError::Parse(format!("{}: {:?}", err, text)))?,
        };
        Ok(self.zone.from_local(&local, None))
    }
}

fn render<Z>(instant: &Instant, zone: &Z, items: &[Item<'static>]) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    let mut out = String::new();
    let formatted = instant.with_timezone(zone).format_with_items(items.iter());
    if write!(out, "{}", formatted).is_err() {
        // chrono reports unrepresentable fields as a fmt error
        tracing::debug!(items = items.len(), "date could not be fully rendered");
    }
    out
}

impl fmt::Display for DateFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.pattern, self.zone, self.locale.identifier())
    }
}
