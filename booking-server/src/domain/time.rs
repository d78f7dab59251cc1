//! Departure times and time ranges.
//!
//! The catalog stores departure times as zero-padded `HH:MM` strings and
//! search requests filter on them lexically. `DepartureTime` parses that
//! form strictly, and its derived ordering (hour, then minute) agrees with
//! lexical ordering of the padded string, so range filters behave the same
//! whether they are applied to the parsed or the textual form.

use std::fmt;

/// Error returned when parsing an invalid time or time range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct InvalidTime {
    reason: &'static str,
}

impl InvalidTime {
    fn new(reason: &'static str) -> Self {
        InvalidTime { reason }
    }
}

/// A scheduled departure time of day, to minute precision.
///
/// # Examples
///
/// ```
/// use booking_server::domain::DepartureTime;
///
/// let t = DepartureTime::parse("09:30").unwrap();
/// assert_eq!(t.to_string(), "09:30");
///
/// // Must be zero-padded HH:MM
/// assert!(DepartureTime::parse("9:30").is_err());
/// assert!(DepartureTime::parse("24:00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepartureTime {
    hour: u8,
    minute: u8,
}

impl DepartureTime {
    /// Parse a strict zero-padded `HH:MM` string.
    pub fn parse(s: &str) -> Result<Self, InvalidTime> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 {
            return Err(InvalidTime::new("must be exactly HH:MM"));
        }
        if bytes[2] != b':' {
            return Err(InvalidTime::new("missing ':' separator"));
        }
        for &b in [bytes[0], bytes[1], bytes[3], bytes[4]].iter() {
            if !b.is_ascii_digit() {
                return Err(InvalidTime::new("hours and minutes must be digits"));
            }
        }

        let hour = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        let minute = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');

        if hour > 23 {
            return Err(InvalidTime::new("hour out of range"));
        }
        if minute > 59 {
            return Err(InvalidTime::new("minute out of range"));
        }

        Ok(DepartureTime { hour, minute })
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// An inclusive range of departure times.
///
/// Both endpoints match: a train departing exactly at `start` or `end` is
/// inside the range. A range whose start is after its end matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DepartureTime,
    pub end: DepartureTime,
}

impl TimeRange {
    pub fn new(start: DepartureTime, end: DepartureTime) -> Self {
        TimeRange { start, end }
    }

    /// Parse a `HH:MM-HH:MM` string.
    pub fn parse(s: &str) -> Result<Self, InvalidTime> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| InvalidTime::new("must be HH:MM-HH:MM"))?;
        Ok(TimeRange {
            start: DepartureTime::parse(start)?,
            end: DepartureTime::parse(end)?,
        })
    }

    pub fn contains(&self, t: DepartureTime) -> bool {
        self.start <= t && t <= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
