//! Cycle arithmetic: calendar-day handling, next-cycle projection and the
//! per-account cycle log.

pub mod day;
pub mod history;
pub mod projection;

pub use history::merge;
pub use projection::{project, project_profile, CycleProjection, FertileWindow};
