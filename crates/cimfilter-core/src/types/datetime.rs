use time::{Date, Month, PrimitiveDateTime, Time};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{cmp::Ordering, fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

const TEXT_LEN: usize = 25;
const MICROS_PER_SECOND: u64 = 1_000_000;
const MICROS_PER_MINUTE: u64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: u64 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: u64 = 24 * MICROS_PER_HOUR;
const MAX_YEAR: i32 = 9_999;
const MAX_OFFSET_MINUTES: u16 = 999;
const MAX_INTERVAL_DAYS: u64 = 99_999_999;

///
/// DateTimeParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DateTimeParseError {
    #[error("datetime text must be {TEXT_LEN} ASCII characters, got {0}")]
    Length(usize),

    #[error("expected digit at position {0}")]
    Digit(usize),

    #[error("expected '.' at position 14")]
    Separator,

    #[error("unknown utc sign '{0}'")]
    Sign(char),

    #[error("interval must end with ':000'")]
    IntervalOffset,

    #[error("field {field} out of range: {value}")]
    Range { field: &'static str, value: u32 },
}

///
/// CimDateTime
///
/// Either a point in time with a minute offset from UTC, or an interval.
/// Textual form is fixed width:
///
/// timestamp  yyyymmddhhmmss.mmmmmmsutc
/// interval   ddddddddhhmmss.mmmmmm:000
///
/// Equality and ordering use the UTC-normalized microsecond count, so the
/// same instant written with two different offsets compares equal.
///

#[derive(Clone, Copy, Debug)]
pub enum CimDateTime {
    Timestamp { local: PrimitiveDateTime, utc_offset: i16 },
    Interval { micros: u64 },
}

impl CimDateTime {
    /// Build a timestamp from its local wall time and the offset in minutes.
    /// Fails when either part does not fit the fixed-width text form.
    pub fn timestamp(
        local: PrimitiveDateTime,
        utc_offset: i16,
    ) -> Result<Self, DateTimeParseError> {
        if !(0..=MAX_YEAR).contains(&local.year()) {
            return Err(DateTimeParseError::Range {
                field: "year",
                value: local.year().unsigned_abs(),
            });
        }
        if utc_offset.unsigned_abs() > MAX_OFFSET_MINUTES {
            return Err(DateTimeParseError::Range {
                field: "utc offset",
                value: u32::from(utc_offset.unsigned_abs()),
            });
        }

        Ok(Self::Timestamp { local, utc_offset })
    }

    /// Build an interval of `micros` microseconds (at most 99,999,999 days).
    pub fn interval(micros: u64) -> Result<Self, DateTimeParseError> {
        let days = micros / MICROS_PER_DAY;
        if days > MAX_INTERVAL_DAYS {
            return Err(DateTimeParseError::Range {
                field: "days",
                value: u32::try_from(days).unwrap_or(u32::MAX),
            });
        }

        Ok(Self::Interval { micros })
    }

    pub fn parse(text: &str) -> Result<Self, DateTimeParseError> {
        let bytes = text.as_bytes();
        if bytes.len() != TEXT_LEN || !text.is_ascii() {
            return Err(DateTimeParseError::Length(text.chars().count()));
        }
        if bytes[14] != b'.' {
            return Err(DateTimeParseError::Separator);
        }

        let micros = digits(bytes, 15, 21)?;
        match bytes[21] {
            b':' => {
                if &bytes[22..] != b"000" {
                    return Err(DateTimeParseError::IntervalOffset);
                }

                let days = u64::from(digits(bytes, 0, 8)?);
                let hours = range("hours", digits(bytes, 8, 10)?, 23)?;
                let minutes = range("minutes", digits(bytes, 10, 12)?, 59)?;
                let seconds = range("seconds", digits(bytes, 12, 14)?, 59)?;

                Ok(Self::Interval {
                    micros: days * MICROS_PER_DAY
                        + u64::from(hours) * MICROS_PER_HOUR
                        + u64::from(minutes) * MICROS_PER_MINUTE
                        + u64::from(seconds) * MICROS_PER_SECOND
                        + u64::from(micros),
                })
            }
            sign @ (b'+' | b'-') => {
                let year = digits(bytes, 0, 4)?;
                let month = range("month", digits(bytes, 4, 6)?, 12)?;
                let day = range("day", digits(bytes, 6, 8)?, 31)?;
                let hour = range("hours", digits(bytes, 8, 10)?, 23)?;
                let minute = range("minutes", digits(bytes, 10, 12)?, 59)?;
                let second = range("seconds", digits(bytes, 12, 14)?, 59)?;

                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let date = Month::try_from(month as u8)
                    .and_then(|month| Date::from_calendar_date(year as i32, month, day as u8))
                    .map_err(|_| DateTimeParseError::Range { field: "day", value: day })?;
                #[allow(clippy::cast_possible_truncation)]
                let time = Time::from_hms_micro(hour as u8, minute as u8, second as u8, micros)
                    .map_err(|_| DateTimeParseError::Range {
                        field: "time",
                        value: micros,
                    })?;
                let local = PrimitiveDateTime::new(date, time);

                #[allow(clippy::cast_possible_truncation)]
                let magnitude = digits(bytes, 22, 25)? as i16;
                let utc_offset = if sign == b'-' { -magnitude } else { magnitude };

                Ok(Self::Timestamp { local, utc_offset })
            }
            other => Err(DateTimeParseError::Sign(char::from(other))),
        }
    }

    #[must_use]
    pub const fn is_interval(&self) -> bool {
        matches!(self, Self::Interval { .. })
    }

    /// Normalized microsecond count: UTC micros since the epoch for a
    /// timestamp, total length for an interval.
    #[must_use]
    pub fn normalized_micros(&self) -> i128 {
        match self {
            Self::Timestamp { local, utc_offset } => {
                let local_micros = local.assume_utc().unix_timestamp_nanos() / 1_000;
                local_micros - i128::from(*utc_offset) * i128::from(MICROS_PER_MINUTE)
            }
            Self::Interval { micros } => i128::from(*micros),
        }
    }

    /// Ordering between two datetimes of the same form.
    /// A timestamp and an interval are incomparable.
    #[must_use]
    pub fn try_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_interval() != other.is_interval() {
            return None;
        }

        Some(self.normalized_micros().cmp(&other.normalized_micros()))
    }
}

fn digits(bytes: &[u8], start: usize, end: usize) -> Result<u32, DateTimeParseError> {
    bytes[start..end]
        .iter()
        .enumerate()
        .try_fold(0u32, |acc, (offset, b)| {
            if b.is_ascii_digit() {
                Ok(acc * 10 + u32::from(b - b'0'))
            } else {
                Err(DateTimeParseError::Digit(start + offset))
            }
        })
}

const fn range(field: &'static str, value: u32, max: u32) -> Result<u32, DateTimeParseError> {
    if value > max {
        Err(DateTimeParseError::Range { field, value })
    } else {
        Ok(value)
    }
}

impl fmt::Display for CimDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp { local, utc_offset } => {
                let sign = if *utc_offset < 0 { '-' } else { '+' };
                write!(
                    f,
                    "{:04}{:02}{:02}{:02}{:02}{:02}.{:06}{sign}{:03}",
                    local.year(),
                    u8::from(local.month()),
                    local.day(),
                    local.hour(),
                    local.minute(),
                    local.second(),
                    local.microsecond(),
                    utc_offset.unsigned_abs(),
                )
            }
            Self::Interval { micros } => {
                let days = micros / MICROS_PER_DAY;
                let hours = (micros % MICROS_PER_DAY) / MICROS_PER_HOUR;
                let minutes = (micros % MICROS_PER_HOUR) / MICROS_PER_MINUTE;
                let seconds = (micros % MICROS_PER_MINUTE) / MICROS_PER_SECOND;
                let fraction = micros % MICROS_PER_SECOND;

                write!(
                    f,
                    "{days:08}{hours:02}{minutes:02}{seconds:02}.{fraction:06}:000"
                )
            }
        }
    }
}

impl Eq for CimDateTime {}

impl PartialEq for CimDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.try_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for CimDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other)
    }
}

impl FromStr for CimDateTime {
    type Err = DateTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CimDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CimDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

///
/// TESTS
///
