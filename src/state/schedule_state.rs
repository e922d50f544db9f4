//! Loaded schedule state management.
//!
//! Holds the lanes and the live event store of the schedule currently shown,
//! plus the random source used to append more programmes.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rhere::generator::DEFAULT_SEED;
use rhere::{EventId, Lane, LaneId, Schedule, SharedEvents};

/// Where the current schedule came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOrigin {
    File(PathBuf),
    Demo { seed: u64 },
}

/// State of the schedule being viewed.
pub struct ScheduleState {
    origin: Option<ScheduleOrigin>,
    lanes: Vec<Lane>,
    timeline_duration: u64,
    events: SharedEvents,
    rng: StdRng,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleState {
    pub fn new() -> Self {
        Self {
            origin: None,
            lanes: Vec::new(),
            timeline_duration: rhere::config::DEFAULT_TIMELINE_DURATION,
            events: SharedEvents::new(),
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Replaces the current schedule.
    ///
    /// The event store keeps its identity, so a widget built on a clone of it
    /// would see the new events; callers rebuild the widget anyway.
    ///
    /// # Arguments
    /// * `schedule` - Parsed or generated schedule
    /// * `origin` - File path or demo seed
    /// * `default_duration` - Timeline length used when the schedule has none
    pub fn load(&mut self, schedule: Schedule, origin: ScheduleOrigin, default_duration: u64) {
        let seed = match &origin {
            ScheduleOrigin::Demo { seed } => *seed,
            ScheduleOrigin::File(_) => DEFAULT_SEED,
        };
        self.timeline_duration = schedule
            .timeline_duration
            .filter(|d| *d > 0)
            .unwrap_or(default_duration);
        self.lanes = schedule.lanes;
        self.events.clear();
        self.events.extend(schedule.events);
        self.rng = StdRng::seed_from_u64(seed);
        self.origin = Some(origin);
    }

    pub fn clear(&mut self) {
        self.origin = None;
        self.lanes.clear();
        self.events.clear();
    }

    pub fn is_loaded(&self) -> bool {
        self.origin.is_some()
    }

    pub fn origin(&self) -> Option<&ScheduleOrigin> {
        self.origin.as_ref()
    }

    pub fn timeline_duration(&self) -> u64 {
        self.timeline_duration
    }

    /// Handle on the live event store.
    pub fn events(&self) -> &SharedEvents {
        &self.events
    }

    /// Lane ids in display order: declared lanes first, then any lane only
    /// referenced by events.
    pub fn lane_ids(&self) -> Vec<LaneId> {
        let mut ids: Vec<LaneId> = self.lanes.iter().map(|l| l.id).collect();
        let mut extra: Vec<LaneId> = self
            .events
            .lanes()
            .into_iter()
            .filter(|lane| !ids.contains(lane))
            .collect();
        extra.sort_unstable();
        ids.extend(extra);
        ids
    }

    pub fn lane_name(&self, lane: LaneId) -> String {
        self.lanes
            .iter()
            .find(|l| l.id == lane)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| format!("Lane {}", lane))
    }

    /// Id for the next appended event.
    pub fn next_event_id(&self) -> EventId {
        self.events.max_id().map_or(1, |id| id + 1)
    }

    /// Random source for appended programmes.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
