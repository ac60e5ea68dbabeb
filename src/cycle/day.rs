//! Calendar-day normalization.
//!
//! Start dates arrive either as a bare `YYYY-MM-DD` (what a date picker sends)
//! or as a full RFC 3339 timestamp (what older clients stored). Both collapse to
//! a [`NaiveDate`] here, and every comparison or sort key downstream uses that
//! value only.

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid date '{0}' (expected YYYY-MM-DD or an RFC 3339 timestamp)")]
pub struct DayError(pub String);

/// Reduces `input` to the calendar day it names.
///
/// A timestamp keeps the date in its own offset: `2024-01-01T23:30:00-05:00`
/// is January 1st, even though it is already January 2nd in UTC.
pub fn parse_calendar_day(input: &str) -> Result<NaiveDate, DayError> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.date_naive())
        .map_err(|_| DayError(input.to_string()))
}

pub fn format_calendar_day(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub mod required {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_calendar_day(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_day(&raw).map_err(D::Error::custom)
    }
}

pub mod option {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&super::format_calendar_day(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_calendar_day(&raw)
                .map(Some)
                .map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}
