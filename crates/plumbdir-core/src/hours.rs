//! # Opening Hours
//!
//! Parsing and evaluation of the free-text hour strings carried by each
//! listing, e.g. `"8 AM–6 PM"`, `"7:30 am - 4:30 pm"`, `"6–10 PM"`,
//! `"Open 24 hours"` or `"Closed"`.
//!
//! The same parser feeds the "open now" badge and the
//! `openingHoursSpecification` block of the structured data.

use crate::types::{HoursMap, Plumber};
use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Marker the dataset uses for round-the-clock service.
pub const OPEN_24_HOURS: &str = "Open 24 hours";

/// Minutes in a day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// `open[:mm] [am|pm] <dash> close[:mm] am|pm`, with ASCII or full-width colons
/// and hyphen, en dash or em dash separators.
static WINDOW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9]{1,2})(?:\s*[：:]\s*([0-9]{2}))?\s*([AaPp][Mm])?\s*[-–—]\s*([0-9]{1,2})(?:\s*[：:]\s*([0-9]{2}))?\s*([AaPp][Mm])",
    )
    .expect("hour window pattern")
});

// =============================================================================
// DAY NAMES
// =============================================================================

/// English day name used as the key of an hours map.
#[must_use]
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse an English day name (case-insensitive).
#[must_use]
pub fn parse_day_name(name: &str) -> Option<Weekday> {
    WEEK.iter()
        .copied()
        .find(|day| day_name(*day).eq_ignore_ascii_case(name.trim()))
}

/// Days in schema.org order, Monday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// =============================================================================
// TIME WINDOW
// =============================================================================

/// An opening window in minutes since midnight.
///
/// A window whose `closes` is earlier than `opens` runs past midnight
/// into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub opens: u16,
    pub closes: u16,
}

impl TimeWindow {
    /// The whole day, 00:00 to 23:59.
    pub const ALL_DAY: Self = Self {
        opens: 0,
        closes: MINUTES_PER_DAY - 1,
    };

    /// Whether the window runs past midnight.
    #[must_use]
    pub fn wraps_midnight(&self) -> bool {
        self.closes < self.opens
    }

    /// Whether `minute` falls in the part of the window on its opening day.
    #[must_use]
    pub fn contains_same_day(&self, minute: u16) -> bool {
        if self.wraps_midnight() {
            minute >= self.opens
        } else {
            self.opens <= minute && minute <= self.closes
        }
    }

    /// Whether `minute` falls in the spill-over part on the following day.
    #[must_use]
    pub fn contains_next_day(&self, minute: u16) -> bool {
        self.wraps_midnight() && minute <= self.closes
    }

    /// Opening time as `HH:MM`.
    #[must_use]
    pub fn opens_hhmm(&self) -> String {
        hhmm(self.opens)
    }

    /// Closing time as `HH:MM`.
    #[must_use]
    pub fn closes_hhmm(&self) -> String {
        hhmm(self.closes)
    }
}

fn hhmm(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Convert a 12-hour clock reading into minutes since midnight.
fn to_minutes(hour: u16, minute: u16, meridiem: &str) -> Option<u16> {
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let pm = meridiem.eq_ignore_ascii_case("pm");
    let hour24 = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    Some(hour24 * 60 + minute)
}

/// Parse the first time range found in an hour string.
///
/// When only the closing time carries AM/PM (`"6–10 PM"`), the opening time
/// takes the same meridiem. Returns `None` for `"Closed"`, single times
/// without a closing part, and out-of-range clock values.
#[must_use]
pub fn parse_window(text: &str) -> Option<TimeWindow> {
    let caps = WINDOW_PATTERN.captures(text)?;
    let num = |i: usize| -> Option<u16> {
        caps.get(i)
            .map_or(Some(0), |m| m.as_str().parse::<u16>().ok())
    };

    let close_meridiem = caps.get(6)?.as_str();
    let open_meridiem = caps.get(3).map_or(close_meridiem, |m| m.as_str());

    let opens = to_minutes(num(1)?, num(2)?, open_meridiem)?;
    let closes = to_minutes(num(4)?, num(5)?, close_meridiem)?;
    Some(TimeWindow { opens, closes })
}

// =============================================================================
// DAY HOURS
// =============================================================================

/// What a listing says about one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayHours {
    /// No entries, only "Closed", or nothing parseable.
    Closed,
    /// "Open 24 hours".
    OpenAllDay,
    /// One or more parsed windows.
    Windows(Vec<TimeWindow>),
}

impl DayHours {
    /// Classify the raw entries for a day.
    #[must_use]
    pub fn from_entries(entries: &[String]) -> Self {
        if entries
            .iter()
            .any(|e| e.trim().eq_ignore_ascii_case(OPEN_24_HOURS))
        {
            return Self::OpenAllDay;
        }
        let windows: Vec<TimeWindow> = entries.iter().filter_map(|e| parse_window(e)).collect();
        if windows.is_empty() {
            Self::Closed
        } else {
            Self::Windows(windows)
        }
    }

    /// Look up and classify a day of an hours map.
    #[must_use]
    pub fn for_day(hours: &HoursMap, day: Weekday) -> Self {
        entries_for(hours, day)
            .map(|entries| Self::from_entries(entries))
            .unwrap_or(Self::Closed)
    }

    /// Windows for the day; all-day service is a single 00:00–23:59 window.
    #[must_use]
    pub fn windows(&self) -> Vec<TimeWindow> {
        match self {
            Self::Closed => Vec::new(),
            Self::OpenAllDay => vec![TimeWindow::ALL_DAY],
            Self::Windows(w) => w.clone(),
        }
    }
}

/// Raw entries for a day, matching the key exactly first, then ignoring case.
fn entries_for(hours: &HoursMap, day: Weekday) -> Option<&Vec<String>> {
    let name = day_name(day);
    hours.get(name).or_else(|| {
        hours
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

// =============================================================================
// OPEN-NOW EVALUATION
// =============================================================================

/// Evaluate an hours map at a given day and minute of day.
///
/// - `Some(true)` when the day is "Open 24 hours" or a window contains the
///   minute (inclusive), including the spill-over of yesterday's overnight
///   windows.
/// - `Some(false)` otherwise. A day with no entries is closed apart from that
///   spill-over.
#[must_use]
pub fn hours_open_at(hours: &HoursMap, day: Weekday, minute: u16) -> bool {
    let today = match DayHours::for_day(hours, day) {
        DayHours::OpenAllDay => return true,
        DayHours::Closed => Vec::new(),
        DayHours::Windows(w) => w,
    };
    if today.iter().any(|w| w.contains_same_day(minute)) {
        return true;
    }

    match DayHours::for_day(hours, day.pred()) {
        DayHours::Windows(yesterday) => yesterday.iter().any(|w| w.contains_next_day(minute)),
        DayHours::OpenAllDay | DayHours::Closed => false,
    }
}

/// Whether a listing is open at a given day and minute of day.
///
/// `None` when the listing publishes no hours at all.
#[must_use]
pub fn is_open_at(plumber: &Plumber, day: Weekday, minute: u16) -> Option<bool> {
    let hours = plumber.hours.as_ref()?;
    Some(hours_open_at(hours, day, minute))
}

/// Whether a listing is open at a wall-clock date and time.
#[must_use]
pub fn is_open_at_time(plumber: &Plumber, at: NaiveDateTime) -> Option<bool> {
    let minute = (at.hour() * 60 + at.minute()) as u16;
    is_open_at(plumber, at.weekday(), minute)
}

/// Whether a listing is open right now, by the local clock.
#[must_use]
pub fn is_open_now(plumber: &Plumber) -> Option<bool> {
    is_open_at_time(plumber, Local::now().naive_local())
}

/// Day → entries joined with `", "`, for display.
#[must_use]
pub fn format_hours(plumber: &Plumber) -> BTreeMap<String, String> {
    plumber
        .hours
        .as_ref()
        .map(|hours| {
            hours
                .iter()
                .map(|(day, entries)| (day.clone(), entries.join(", ")))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// TESTS
// =============================================================================
