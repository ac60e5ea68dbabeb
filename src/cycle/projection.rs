use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::cycle::day;
use crate::models::CycleProfile;

/// Ovulation is placed this many days before the next period, whatever the cycle length.
pub const LUTEAL_PHASE_DAYS: i64 = 14;
pub const FERTILE_DAYS_BEFORE_OVULATION: i64 = 5;
pub const FERTILE_DAYS_AFTER_OVULATION: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleProjection {
    #[serde(with = "day::required")]
    pub next_period: NaiveDate,
    pub days_until_next_period: i64,
    #[serde(with = "day::required")]
    pub ovulation: NaiveDate,
    pub fertile_window: FertileWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FertileWindow {
    #[serde(with = "day::required")]
    pub start: NaiveDate,
    #[serde(with = "day::required")]
    pub end: NaiveDate,
}

/// Projects the next cycle from a single recorded start date.
///
/// `period_duration` does not influence the result. A start date far enough
/// in the past yields a negative `days_until_next_period`; the projection is
/// not rolled forward. Returns `None` only if the arithmetic leaves the
/// representable date range.
pub fn project(
    start: NaiveDate,
    cycle_length: i32,
    _period_duration: i32,
    today: NaiveDate,
) -> Option<CycleProjection> {
    let next_period = start.checked_add_signed(Duration::days(i64::from(cycle_length)))?;
    let ovulation = next_period.checked_sub_signed(Duration::days(LUTEAL_PHASE_DAYS))?;
    let fertile_window = FertileWindow {
        start: ovulation.checked_sub_signed(Duration::days(FERTILE_DAYS_BEFORE_OVULATION))?,
        end: ovulation.checked_add_signed(Duration::days(FERTILE_DAYS_AFTER_OVULATION))?,
    };

    Some(CycleProjection {
        next_period,
        days_until_next_period: (next_period - today).num_days(),
        ovulation,
        fertile_window,
    })
}

pub fn project_profile(profile: &CycleProfile, today: NaiveDate) -> Option<CycleProjection> {
    let start = profile.last_period_start?;
    project(start, profile.cycle_length, profile.period_duration, today)
}
