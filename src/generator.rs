use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::event::{EventId, LaneId, TimelineEvent};
use crate::schedule::{Lane, Schedule, SCHEDULE_VERSION};

pub const DEFAULT_LANES: u32 = 4;
pub const DEFAULT_EVENTS_PER_LANE: usize = 32;
pub const DEFAULT_TIMELINE_DURATION: u64 = 86_400;
pub const DEFAULT_SEED: u64 = 42;

// (genre, colour)
const GENRES: &[(&str, &str)] = &[
    ("News", "#d94f4f"),
    ("Series", "#4f7fd9"),
    ("Movie", "#8a4fd9"),
    ("Sport", "#3fae5a"),
    ("Kids", "#e0a030"),
    ("Documentary", "#2fa8a8"),
    ("Weather", "#7a7a7a"),
];

const TITLE_WORDS: &[&str] = &[
    "Morning", "Evening", "Late", "Live", "World", "City", "Wild", "Hidden",
    "Great", "Last", "Open", "Deep", "Northern", "Grand", "Quiet", "Bright",
];

/// Programme lengths in seconds
const SLOT_LENGTHS: &[i64] = &[300, 600, 900, 1800, 2700, 3600, 5400, 7200];

/// Generates random, TV-guide-like schedules.
///
/// Programmes on a lane follow each other back to back with occasional
/// short gaps. Output is fully determined by the seed.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    lanes: u32,
    events_per_lane: usize,
    timeline_duration: u64,
    seed: u64,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleGenerator {
    pub fn new() -> Self {
        Self {
            lanes: DEFAULT_LANES,
            events_per_lane: DEFAULT_EVENTS_PER_LANE,
            timeline_duration: DEFAULT_TIMELINE_DURATION,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_config(lanes: u32, events_per_lane: usize, timeline_duration: u64, seed: u64) -> Self {
        Self {
            lanes,
            events_per_lane,
            timeline_duration,
            seed,
        }
    }

    /// Builds the schedule in memory.
    ///
    /// A lane stops early once it reaches the end of the timeline, so it can
    /// hold fewer than `events_per_lane` events.
    pub fn generate(&self) -> Schedule {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut lanes = Vec::new();
        let mut events = Vec::new();
        let mut next_id: EventId = 1;

        for lane in 0..self.lanes {
            lanes.push(Lane {
                id: lane,
                name: format!("Channel {}", lane + 1),
            });

            let lane_events = generate_lane_events(&mut rng, lane, next_id, 0, self.events_per_lane)
                .into_iter()
                .take_while(|e| e.offset < self.timeline_duration as i64);
            for event in lane_events {
                next_id = event.id + 1;
                events.push(event);
            }
        }

        Schedule {
            version: SCHEDULE_VERSION.to_string(),
            timeline_duration: Some(self.timeline_duration),
            lanes,
            events,
        }
    }
}

/// Generates `count` consecutive programmes for one lane.
///
/// # Arguments
/// * `rng` - Random source
/// * `lane` - Lane the programmes go on
/// * `first_id` - Id of the first programme; later ones count up from it
/// * `start` - Earliest offset, in seconds, of the first programme
/// * `count` - Number of programmes
pub fn generate_lane_events(
    rng: &mut StdRng,
    lane: LaneId,
    first_id: EventId,
    start: i64,
    count: usize,
) -> Vec<TimelineEvent> {
    let mut events = Vec::with_capacity(count);
    let mut offset = start;

    for i in 0..count {
        // One programme in four is preceded by a short break
        if rng.gen_range(0..4) == 0 {
            offset += rng.gen_range(1..=4) * 60;
        }

        let duration = SLOT_LENGTHS[rng.gen_range(0..SLOT_LENGTHS.len())];
        let (genre, color) = GENRES[rng.gen_range(0..GENRES.len())];
        let title = format!(
            "{} {}",
            TITLE_WORDS[rng.gen_range(0..TITLE_WORDS.len())],
            genre
        );

        events.push(TimelineEvent {
            id: first_id + i as EventId,
            offset,
            duration,
            lane,
            data: serde_json::json!({
                "title": title,
                "genre": genre,
                "color": color,
            }),
        });
        offset += duration;
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_schedule() {
        let a = ScheduleGenerator::with_config(3, 10, 86_400, 7).generate();
        let b = ScheduleGenerator::with_config(3, 10, 86_400, 7).generate();
        assert_eq!(a, b);

        let c = ScheduleGenerator::with_config(3, 10, 86_400, 8).generate();
        assert_ne!(a.events, c.events);
    }

    #[test]
    fn test_generated_schedule_shape() {
        let schedule = ScheduleGenerator::with_config(2, 5, 86_400, 1).generate();
        assert_eq!(schedule.lanes.len(), 2);
        assert_eq!(schedule.lane_name(1), "Channel 2");
        assert_eq!(schedule.events.len(), 10);

        let ids: Vec<EventId> = schedule.events.iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_lane_events_do_not_overlap() {
        let mut rng = StdRng::seed_from_u64(3);
        let events = generate_lane_events(&mut rng, 2, 100, 600, 20);

        assert_eq!(events.len(), 20);
        assert_eq!(events[0].id, 100);
        assert!(events[0].offset >= 600);
        for pair in events.windows(2) {
            assert!(pair[1].offset >= pair[0].end());
            assert_eq!(pair[1].lane, 2);
        }
        assert!(events.iter().all(|e| e.data["color"].as_str().is_some()));
    }

    #[test]
    fn test_lanes_stop_at_timeline_end() {
        let schedule = ScheduleGenerator::with_config(1, 1000, 3600, 5).generate();
        assert!(schedule.events.len() < 1000);
        assert!(schedule.events.iter().all(|e| e.offset < 3600));
    }
}
