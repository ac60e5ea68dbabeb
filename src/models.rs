use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{NaiveDate, DateTime, Utc};

use crate::cycle::day;

pub const DEFAULT_CYCLE_LENGTH: i32 = 28;
pub const DEFAULT_PERIOD_DURATION: i32 = 5;

/// One user document: credential, current cycle profile and the cycle log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub cycle_data: CycleProfile,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            cycle_data: CycleProfile::default(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleProfile {
    #[serde(default, with = "day::option")]
    pub last_period_start: Option<NaiveDate>,
    #[serde(default = "default_cycle_length")]
    pub cycle_length: i32,
    #[serde(default = "default_period_duration")]
    pub period_duration: i32,
}

impl Default for CycleProfile {
    fn default() -> Self {
        Self {
            last_period_start: None,
            cycle_length: DEFAULT_CYCLE_LENGTH,
            period_duration: DEFAULT_PERIOD_DURATION,
        }
    }
}

fn default_cycle_length() -> i32 {
    DEFAULT_CYCLE_LENGTH
}

fn default_period_duration() -> i32 {
    DEFAULT_PERIOD_DURATION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(with = "day::required")]
    pub start_date: NaiveDate,
    pub cycle_length: i32,
    pub period_duration: i32,
}

impl HistoryEntry {
    /// The log entry a saved profile contributes, if it names a start date.
    pub fn from_profile(profile: &CycleProfile) -> Option<Self> {
        profile.last_period_start.map(|start_date| Self {
            start_date,
            cycle_length: profile.cycle_length,
            period_duration: profile.period_duration,
        })
    }
}

/// Profile submitted by an `update`; unlike [`CycleProfile`] the start date is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleUpdate {
    #[serde(with = "day::required")]
    pub last_period_start: NaiveDate,
    #[serde(default = "default_cycle_length", deserialize_with = "day_count::deserialize")]
    pub cycle_length: i32,
    #[serde(default = "default_period_duration", deserialize_with = "day_count::deserialize")]
    pub period_duration: i32,
}

/// Day counts from form inputs arrive as JSON numbers or as numeric strings (`"30"`).
mod day_count {
    use serde::{de::Error, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n,
            Raw::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| D::Error::custom(format!("expected a whole number of days, got '{text}'")))?,
        };
        i32::try_from(value).map_err(|_| D::Error::custom(format!("day count {value} is out of range")))
    }
}

impl From<CycleUpdate> for CycleProfile {
    fn from(update: CycleUpdate) -> Self {
        Self {
            last_period_start: Some(update.last_period_start),
            cycle_length: update.cycle_length,
            period_duration: update.period_duration,
        }
    }
}
