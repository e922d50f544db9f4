//! State management modules for the timeline viewer.
//!
//! This module contains state-only logic (no UI concerns):
//! - Schedule state (lanes, live event store, origin)
//! - View state (persisted preferences, control buffers)

mod schedule_state;
mod view_state;

pub use schedule_state::{ScheduleOrigin, ScheduleState};
pub use view_state::{ViewPreferences, ViewState};
