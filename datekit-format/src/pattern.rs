//! Unicode date pattern compiler
//!
//! Turns a UTS #35 pattern such as `EEE, dd MMM yyyy HH:mm:ss Z` into chrono
//! format items, which chrono then uses both to render and to parse text.
//!
//! Supported letters:
//! - `y`, `u`: year (`yy` is the two-digit year)
//! - `Y`: ISO week-based year
//! - `M`, `L`: month (`M`, `MM`, `MMM` short name, `MMMM` long name)
//! - `d`: day of month, `D`: day of year
//! - `E`: weekday name (`EEEE` long), `e`, `c`: ISO weekday number, Monday
//!   is 1 and Sunday is 7 (`eee` as `E`); calendar components count from
//!   Sunday instead
//! - `a`: AM/PM
//! - `H`: hour 0-23, `h`: hour 1-12
//! - `m`: minute, `s`: second, `S`: fractional second in 3, 6 or 9 digits
//!   (runs are rounded up to the next of those widths)
//! - `Z`: `+HHMM` (`ZZZZZ` is `+HH:MM` or `Z`)
//! - `X`: ISO offset with `Z` for UTC, `x`: ISO offset without `Z`
//! - `z`: zone abbreviation
//!
//! Text inside single quotes is literal; `''` is a single quote. Any other
//! letter is kept as literal text.

use chrono::format::{Fixed, Item, Numeric, Pad, StrftimeItems};

/// Compile `pattern` into chrono format items
pub fn compile(pattern: &str) -> Vec<Item<'static>> {
    let mut compiler = Compiler::default();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            compiler.flush_space();
            if chars.peek() == Some(&'\'') {
                chars.next();
                compiler.literal.push('\'');
                continue;
            }
            // Quoted run; `''` inside quotes is an escaped quote
            loop {
                match chars.next() {
                    Some('\'') if chars.peek() == Some(&'\'') => {
                        chars.next();
                        compiler.literal.push('\'');
                    }
                    Some('\'') | None => break,
                    Some(q) => compiler.literal.push(q),
                }
            }
        } else if c.is_ascii_alphabetic() {
            let mut count = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                count += 1;
            }
            compiler.field(c, count);
        } else if c.is_whitespace() {
            compiler.flush_literal();
            compiler.space.push(c);
        } else {
            compiler.flush_space();
            compiler.literal.push(c);
        }
    }
    compiler.finish()
}

#[derive(Default)]
struct Compiler {
    items: Vec<Item<'static>>,
    literal: String,
    space: String,
}

impl Compiler {
    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            let text = std::mem::take(&mut self.literal);
            self.items.push(Item::OwnedLiteral(text.into_boxed_str()));
        }
    }

    fn flush_space(&mut self) {
        if !self.space.is_empty() {
            let text = std::mem::take(&mut self.space);
            self.items.push(Item::OwnedSpace(text.into_boxed_str()));
        }
    }

    fn flush(&mut self) {
        self.flush_space();
        self.flush_literal();
    }

    fn finish(mut self) -> Vec<Item<'static>> {
        self.flush();
        self.items
    }

    fn numeric(&mut self, numeric: Numeric, count: usize) {
        let pad = if count >= 2 { Pad::Zero } else { Pad::None };
        self.flush();
        self.items.push(Item::Numeric(numeric, pad));
    }

    fn fixed(&mut self, fixed: Fixed) {
        self.flush();
        self.items.push(Item::Fixed(fixed));
    }

    fn field(&mut self, letter: char, count: usize) {
        match (letter, count) {
            ('y' | 'u', 2) => self.numeric(Numeric::YearMod100, 2),
            ('y' | 'u', n) => self.numeric(Numeric::Year, n),
            ('Y', 2) => self.numeric(Numeric::IsoYearMod100, 2),
            ('Y', n) => self.numeric(Numeric::IsoYear, n),
            ('M' | 'L', 1 | 2) => self.numeric(Numeric::Month, count),
            ('M' | 'L', 3) => self.fixed(Fixed::ShortMonthName),
            ('M' | 'L', _) => self.fixed(Fixed::LongMonthName),
            ('d', n) => self.numeric(Numeric::Day, n),
            ('D', n) => self.numeric(Numeric::Ordinal, n),
            ('e' | 'c', 1 | 2) => self.numeric(Numeric::WeekdayFromMon, 1),
            ('E' | 'e' | 'c', 1..=3) => self.fixed(Fixed::ShortWeekdayName),
            ('E' | 'e' | 'c', _) => self.fixed(Fixed::LongWeekdayName),
            ('a', _) => self.fixed(Fixed::UpperAmPm),
            ('H', n) => self.numeric(Numeric::Hour, n),
            ('h', n) => self.numeric(Numeric::Hour12, n),
            ('m', n) => self.numeric(Numeric::Minute, n),
            ('s', n) => self.numeric(Numeric::Second, n),
            ('S', n) => self.fraction(n),
            ('Z', 1..=3) | ('x', 1 | 2 | 4) => self.fixed(Fixed::TimezoneOffset),
            ('Z', 4) | ('x', _) => self.fixed(Fixed::TimezoneOffsetColon),
            ('Z', _) | ('X', 3 | 5) => self.fixed(Fixed::TimezoneOffsetColonZ),
            ('X', _) => self.fixed(Fixed::TimezoneOffsetZ),
            ('z', _) => self.fixed(Fixed::TimezoneName),
            _ => {
                tracing::trace!(letter = %letter, count, "unsupported pattern letter kept as literal");
                self.flush_space();
                self.literal.extend(std::iter::repeat(letter).take(count));
            }
        }
    }

    /// chrono's public fractional items carry their own leading dot, so a
    /// `.` directly before the `S` run is folded into them. A bare run uses
    /// the dotless `%3f`/`%6f`/`%9f` items.
    fn fraction(&mut self, count: usize) {
        if self.space.is_empty() && self.literal.ends_with('.') {
            self.literal.pop();
            let fixed = match count {
                1..=3 => Fixed::Nanosecond3,
                4..=6 => Fixed::Nanosecond6,
                _ => Fixed::Nanosecond9,
            };
            self.fixed(fixed);
        } else {
            let spec = match count {
                1..=3 => "%3f",
                4..=6 => "%6f",
                _ => "%9f",
            };
            self.flush();
            self.items.extend(StrftimeItems::new(spec));
        }
    }
}
