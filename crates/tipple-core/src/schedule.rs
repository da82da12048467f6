//! Day and clock-window resolution for deal schedules.
//!
//! `valid_days`, `start_time`, and `end_time` are human-authored strings
//! from venue staff, so everything here degrades silently: input that cannot
//! be understood yields an empty day set or a missing window, which makes
//! the deal inactive rather than failing the request. Parsing happens once
//! per run via [`Schedule::parse`]; the rest of the pipeline works with the
//! typed values, never the raw strings.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Full and abbreviated day names in canonical order, Sunday first.
///
/// Index positions are the range-matching format: `"mon-fri"` spans indices
/// 1 through 5.
const DAY_NAMES: [(&str, &str); 7] = [
    ("sunday", "sun"),
    ("monday", "mon"),
    ("tuesday", "tue"),
    ("wednesday", "wed"),
    ("thursday", "thu"),
    ("friday", "fri"),
    ("saturday", "sat"),
];

/// The set of weekdays a deal runs on, parsed once from the authored
/// `valid_days` string and carried as a bitmask (bit 0 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: DaySet = DaySet(0);
    pub const ALL: DaySet = DaySet(0b0111_1111);

    /// Parse an authored day description.
    ///
    /// A day is in the set when the lowercased input:
    /// - contains `"all"` or `"everyday"` (every day), or
    /// - contains that day's full name or three-letter abbreviation
    ///   (so comma lists like `"Tue,Thu"` need no special handling), or
    /// - contains a `"<start>-<end>"` range covering it, inclusive at both
    ///   ends, in the canonical Sunday-first ordering.
    ///
    /// A range whose start index falls after its end index (`"fri-mon"`)
    /// matches nothing beyond the named endpoints; week-wrapping ranges are
    /// not a supported authoring form. Empty or unrecognizable input yields
    /// [`DaySet::EMPTY`].
    #[must_use]
    pub fn parse(valid_days: &str) -> DaySet {
        let lower = valid_days.to_lowercase();
        if lower.contains("all") || lower.contains("everyday") {
            return DaySet::ALL;
        }

        let mut bits = 0u8;
        for (idx, (full, abbr)) in DAY_NAMES.iter().enumerate() {
            if lower.contains(full) || lower.contains(abbr) {
                bits |= 1 << idx;
            }
        }

        if let Some((start, end)) = parse_day_range(&lower) {
            if start <= end {
                for idx in start..=end {
                    bits |= 1 << idx;
                }
            }
        }

        DaySet(bits)
    }

    #[must_use]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Extract a `"<start>-<end>"` day range from a pre-lowercased string.
///
/// Only the first dash is significant: `"mon-fri"` splits into `"mon"` and
/// `"fri"`. Returns `None` unless both sides resolve to a day.
fn parse_day_range(lower: &str) -> Option<(usize, usize)> {
    let (left, right) = lower.split_once('-')?;
    Some((day_index(left)?, day_index(right)?))
}

/// Resolve a token to its canonical day index by three-letter prefix, so
/// `"mon"`, `"monday"`, `"tues"`, and `"thurs"` all work.
fn day_index(token: &str) -> Option<usize> {
    let token = token.trim();
    DAY_NAMES
        .iter()
        .position(|(_, abbr)| token.starts_with(abbr))
}

/// Parse an authored clock string into compact `HHMM` form.
///
/// `"17:30"` becomes `1730`; a bare `"1730"` is taken as already compact.
/// Values are compared numerically downstream, so `"24:00"` works as an
/// end-of-day close without special handling. Returns `None` for anything
/// non-numeric; the deal then never activates.
#[must_use]
pub fn parse_clock(raw: &str) -> Option<u16> {
    let s = raw.trim();
    if let Some((hours, minutes)) = s.split_once(':') {
        let hours: u16 = hours.trim().parse().ok()?;
        let minutes: u16 = minutes.trim().parse().ok()?;
        hours.checked_mul(100)?.checked_add(minutes)
    } else {
        s.parse().ok()
    }
}

/// An inclusive daily clock window in compact `HHMM` form.
///
/// When `start > end` the window crosses midnight: `2200–0200` is live from
/// 22:00 through 23:59 and again from 00:00 through 02:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: u16,
    pub end: u16,
}

impl TimeWindow {
    /// Build a window from the authored start/end strings. `None` when
    /// either side fails to parse.
    #[must_use]
    pub fn parse(start: &str, end: &str) -> Option<TimeWindow> {
        Some(TimeWindow {
            start: parse_clock(start)?,
            end: parse_clock(end)?,
        })
    }

    /// Whether `now` (compact `HHMM`) falls inside the window, inclusive at
    /// both ends.
    #[must_use]
    pub fn contains(self, now: u16) -> bool {
        if self.start <= self.end {
            self.start <= now && now <= self.end
        } else {
            now >= self.start || now <= self.end
        }
    }
}

/// A deal's full availability rule: the days it runs and its daily clock
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub days: DaySet,
    /// `None` when either clock string failed to parse; such schedules are
    /// never active.
    pub window: Option<TimeWindow>,
}

impl Schedule {
    #[must_use]
    pub fn parse(valid_days: &str, start_time: &str, end_time: &str) -> Schedule {
        Schedule {
            days: DaySet::parse(valid_days),
            window: TimeWindow::parse(start_time, end_time),
        }
    }

    /// Evaluate against an injected civil instant, already converted to the
    /// shared venue timezone. Active = day match AND clock match.
    #[must_use]
    pub fn is_active_at(self, now: NaiveDateTime) -> bool {
        let Some(window) = self.window else {
            return false;
        };
        if !self.days.contains(now.weekday()) {
            return false;
        }
        // Bounded by 23*100 + 59; the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        let clock = (now.hour() * 100 + now.minute()) as u16;
        window.contains(clock)
    }
}
