//! One-hour slot label in `"HH:00"` form.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// The start hour of a one-hour slot.
///
/// Always rendered and parsed as a zero-padded `"HH:00"` string. Ordering
/// follows the hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourLabel(u8);

impl HourLabel {
    /// The 00:00 slot.
    pub const MIDNIGHT: Self = Self(0);

    /// Build a label from an hour of day (0-23).
    pub fn new(hour: u8) -> Result<Self, AppError> {
        if hour > 23 {
            return Err(AppError::validation(format!(
                "Hour must be between 0 and 23, got {hour}"
            )));
        }
        Ok(Self(hour))
    }

    /// Parse a strict `"HH:00"` label.
    pub fn parse(label: &str) -> Result<Self, AppError> {
        let invalid = || AppError::validation(format!("Invalid hour '{label}', expected HH:00"));
        let bytes = label.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' || &label[3..] != "00" {
            return Err(invalid());
        }
        if !bytes[..2].iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let hour: u8 = label[..2].parse().map_err(|_| invalid())?;
        Self::new(hour).map_err(|_| invalid())
    }

    /// Convert a stored start time back into a label.
    ///
    /// Fails for times that are not on the hour.
    pub fn from_time(time: NaiveTime) -> Result<Self, AppError> {
        if time.minute() != 0 || time.second() != 0 || time.nanosecond() != 0 {
            return Err(AppError::validation(format!(
                "Slot times must fall on the hour, got {time}"
            )));
        }
        Self::new(time.hour() as u8)
    }

    /// Hour of day.
    pub fn hour(self) -> u8 {
        self.0
    }

    /// Slot start as a time of day.
    pub fn start_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.0), 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Slot end, one hour after the start. The 23:00 slot ends at midnight.
    pub fn end_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt((u32::from(self.0) + 1) % 24, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// The label of the following hour, wrapping at midnight.
    pub fn next(self) -> Self {
        Self((self.0 + 1) % 24)
    }

    /// Every label from `first` to `last` inclusive.
    pub fn range(first: u8, last: u8) -> Vec<Self> {
        (first..=last.min(23)).map(Self).collect()
    }
}

/// Inclusive span of start hours, e.g. business hours 06:00 to 22:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    /// First start hour.
    pub first: HourLabel,
    /// Last start hour, inclusive.
    pub last: HourLabel,
}

impl HourRange {
    /// Range from `first` to `last` inclusive.
    pub fn new(first: HourLabel, last: HourLabel) -> Self {
        Self { first, last }
    }

    /// Whether the label is one of the range's start hours.
    pub fn contains(&self, label: HourLabel) -> bool {
        label >= self.first && label <= self.last
    }

    /// Every start hour in the range, ascending.
    pub fn labels(&self) -> Vec<HourLabel> {
        HourLabel::range(self.first.0, self.last.0)
    }

    /// Number of one-hour slots.
    pub fn len(&self) -> usize {
        self.labels().len()
    }

    /// Whether the range holds no slot.
    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }
}

impl fmt::Display for HourLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for HourLabel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HourLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HourLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|e| serde::de::Error::custom(e.message))
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::Type<sqlx::Postgres> for HourLabel {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <NaiveTime as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "sqlx")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for HourLabel {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <NaiveTime as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.start_time(), buf)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for HourLabel {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let time = <NaiveTime as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_time(time)?)
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::postgres::PgHasArrayType for HourLabel {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        <NaiveTime as sqlx::postgres::PgHasArrayType>::array_type_info()
    }
}
