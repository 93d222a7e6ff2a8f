//! Time-of-day values and the quiet-window membership test.
//!
//! A `QuietWindow` is a pair of wall-clock times without a date. When
//! `start > end` the window spans midnight, e.g. `22:00-09:00`.

use std::{fmt, str::FromStr};

use thiserror::Error;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Hour and minute of a day, seconds fixed at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("invalid time {input:?}: missing ':' separator, must use HH:MM")]
    MissingSeparator { input: String },

    #[error("invalid hour in {input:?}: must be 00-23 (HH:MM)")]
    InvalidHour { input: String },

    #[error("invalid minute in {input:?}: must be 00-59 (HH:MM)")]
    InvalidMinute { input: String },
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Builds a time from minutes past midnight, wrapping at 24h.
    pub const fn from_minutes(minutes: u32) -> Self {
        let m = minutes % MINUTES_PER_DAY as u32;
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    pub const fn minutes_since_midnight(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

fn parse_field(field: &str, max: u8) -> Option<u8> {
    if field.is_empty() || field.len() > 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse::<u8>().ok().filter(|v| *v <= max)
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        let Some((hh, mm)) = input.split_once(':') else {
            return Err(TimeParseError::MissingSeparator {
                input: input.to_string(),
            });
        };

        let hour = parse_field(hh, 23).ok_or_else(|| TimeParseError::InvalidHour {
            input: input.to_string(),
        })?;
        let minute = parse_field(mm, 59).ok_or_else(|| TimeParseError::InvalidMinute {
            input: input.to_string(),
        })?;

        Ok(Self { hour, minute })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Recurring daily interval during which auto-mute is armed. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl QuietWindow {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, now: TimeOfDay) -> bool {
        is_within_window(now, *self)
    }
}

impl fmt::Display for QuietWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

pub fn is_within_window(now: TimeOfDay, window: QuietWindow) -> bool {
    let QuietWindow { start, end } = window;

    if start <= end {
        return start <= now && now <= end;
    }

    now >= start || now <= end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn window(start: &str, end: &str) -> QuietWindow {
        QuietWindow::new(t(start), t(end))
    }

    fn every_minute() -> impl Iterator<Item = TimeOfDay> {
        (0..u32::from(MINUTES_PER_DAY)).map(TimeOfDay::from_minutes)
    }

    #[test]
    fn parses_and_displays_hh_mm() {
        assert_eq!(t("22:00"), TimeOfDay::new(22, 0).unwrap());
        assert_eq!(t("9:05"), TimeOfDay::new(9, 5).unwrap());
        assert_eq!(t(" 07:30 "), TimeOfDay::new(7, 30).unwrap());
        assert_eq!(t("9:05").to_string(), "09:05");
        assert_eq!(t("00:00"), TimeOfDay::MIDNIGHT);
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(matches!(
            "2200".parse::<TimeOfDay>(),
            Err(TimeParseError::MissingSeparator { .. })
        ));
        assert!(matches!(
            "24:00".parse::<TimeOfDay>(),
            Err(TimeParseError::InvalidHour { .. })
        ));
        assert!(matches!(
            ":30".parse::<TimeOfDay>(),
            Err(TimeParseError::InvalidHour { .. })
        ));
        assert!(matches!(
            "+1:30".parse::<TimeOfDay>(),
            Err(TimeParseError::InvalidHour { .. })
        ));
        assert!(matches!(
            "10:60".parse::<TimeOfDay>(),
            Err(TimeParseError::InvalidMinute { .. })
        ));
        assert!(matches!(
            "10:".parse::<TimeOfDay>(),
            Err(TimeParseError::InvalidMinute { .. })
        ));
        assert!(matches!(
            "10:5x".parse::<TimeOfDay>(),
            Err(TimeParseError::InvalidMinute { .. })
        ));
    }

    #[test]
    fn from_minutes_wraps_at_midnight() {
        assert_eq!(TimeOfDay::from_minutes(22 * 60 + 15), t("22:15"));
        assert_eq!(TimeOfDay::from_minutes(24 * 60), TimeOfDay::MIDNIGHT);
        assert_eq!(TimeOfDay::from_minutes(25 * 60 + 1), t("01:01"));
        assert_eq!(t("13:47").minutes_since_midnight(), 13 * 60 + 47);
    }

    #[test]
    fn window_edges_are_inclusive() {
        let w = window("08:00", "17:00");
        assert!(w.contains(t("08:00")));
        assert!(w.contains(t("17:00")));
        assert!(!w.contains(t("07:59")));
        assert!(!w.contains(t("17:01")));

        let night = window("23:00", "09:00");
        assert!(night.wraps_midnight());
        assert!(night.contains(t("23:00")));
        assert!(night.contains(t("00:00")));
        assert!(night.contains(t("09:00")));
        assert!(!night.contains(t("09:01")));
        assert!(!night.contains(t("22:59")));
        assert!(!night.contains(t("12:00")));
    }

    #[test]
    fn degenerate_window_is_a_single_instant() {
        for start in [t("00:00"), t("13:37"), t("23:59")] {
            let w = QuietWindow::new(start, start);
            for now in every_minute() {
                assert_eq!(w.contains(now), now == start, "window {w} at {now}");
            }
        }
    }

    #[test]
    fn non_wrapping_window_is_exactly_start_to_end() {
        let w = window("06:30", "18:45");
        for now in every_minute() {
            let expected = now >= w.start && now <= w.end;
            assert_eq!(is_within_window(now, w), expected, "at {now}");
        }
    }

    #[test]
    fn wrapping_window_covers_both_sides_of_midnight() {
        let w = window("22:00", "09:00");
        let inside = every_minute().filter(|now| w.contains(*now)).count();

        // 22:00..=23:59 plus 00:00..=09:00
        assert_eq!(inside, 120 + 9 * 60 + 1);

        for now in every_minute() {
            let expected = now >= w.start || now <= w.end;
            assert_eq!(w.contains(now), expected, "at {now}");
        }
    }

    #[test]
    fn window_display() {
        assert_eq!(window("22:00", "9:00").to_string(), "22:00-09:00");
    }
}
