//! Live event sources.
//!
//! `Vec<TimelineEvent>` already works as a fixed source. The types here cover
//! the incremental case: a store the host keeps appending to (paged loading,
//! infinite scroll) and selector-style views over such a store.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{EventId, LaneId, TimelineEvent};
use crate::traits::EventSource;

/// Appendable event store shared between the host and the widget.
///
/// Cloning is cheap and every clone sees the same events.
#[derive(Debug, Clone, Default)]
pub struct SharedEvents {
    inner: Rc<RefCell<Vec<TimelineEvent>>>,
}

impl SharedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `events`.
    pub fn from_events(events: Vec<TimelineEvent>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(events)),
        }
    }

    /// Appends one event.
    pub fn push(&self, event: TimelineEvent) {
        self.inner.borrow_mut().push(event);
    }

    /// Appends a batch of events, e.g. one loaded page.
    pub fn extend(&self, events: impl IntoIterator<Item = TimelineEvent>) {
        self.inner.borrow_mut().extend(events);
    }

    /// Removes every event whose id matches.
    pub fn remove(&self, id: EventId) {
        self.inner.borrow_mut().retain(|e| e.id != id);
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Largest event id in the store, if any.
    pub fn max_id(&self) -> Option<EventId> {
        self.inner.borrow().iter().map(|e| e.id).max()
    }

    /// Distinct lanes referenced by the stored events, in first-seen order.
    pub fn lanes(&self) -> Vec<LaneId> {
        let mut lanes = Vec::new();
        for event in self.inner.borrow().iter() {
            if !lanes.contains(&event.lane) {
                lanes.push(event.lane);
            }
        }
        lanes
    }

    /// Latest end time (offset + duration) over all events of a lane.
    pub fn lane_end(&self, lane: LaneId) -> Option<i64> {
        self.inner
            .borrow()
            .iter()
            .filter(|e| e.lane == lane)
            .map(TimelineEvent::end)
            .max()
    }

    /// Returns a selector-style view keeping only the events matching `predicate`.
    pub fn select<F>(&self, predicate: F) -> FilteredEvents
    where
        F: Fn(&TimelineEvent) -> bool + 'static,
    {
        FilteredEvents {
            store: self.clone(),
            predicate: Box::new(predicate),
        }
    }
}

impl EventSource for SharedEvents {
    fn discover(&self) -> Vec<TimelineEvent> {
        self.inner.borrow().clone()
    }
}

/// A filtered view over a [`SharedEvents`] store.
///
/// The predicate is evaluated on each refresh, so events appended to the
/// store later are picked up when they match.
pub struct FilteredEvents {
    store: SharedEvents,
    predicate: Box<dyn Fn(&TimelineEvent) -> bool>,
}

impl FilteredEvents {
    /// Shorthand for a view restricted to one lane.
    pub fn lane(store: &SharedEvents, lane: LaneId) -> Self {
        store.select(move |e| e.lane == lane)
    }
}

impl std::fmt::Debug for FilteredEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredEvents")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl EventSource for FilteredEvents {
    fn discover(&self) -> Vec<TimelineEvent> {
        self.store
            .inner
            .borrow()
            .iter()
            .filter(|e| (self.predicate)(e))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(id: EventId, offset: i64, duration: i64, lane: LaneId) -> TimelineEvent {
        TimelineEvent::new(id, offset, duration).unwrap().with_lane(lane)
    }

    #[test]
    fn test_shared_events_clones_see_appends() {
        let store = SharedEvents::new();
        let handle = store.clone();
        assert!(store.is_empty());

        handle.push(ev(1, 0, 10, 0));
        handle.extend([ev(2, 10, 10, 0), ev(3, 0, 30, 1)]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.discover().len(), 3);
        assert_eq!(store.max_id(), Some(3));
    }

    #[test]
    fn test_remove_and_lane_end() {
        let store = SharedEvents::from_events(vec![ev(1, 0, 10, 0), ev(2, 50, 25, 0), ev(3, 0, 5, 2)]);
        assert_eq!(store.lane_end(0), Some(75));
        assert_eq!(store.lane_end(1), None);
        assert_eq!(store.lanes(), vec![0, 2]);

        store.remove(2);
        assert_eq!(store.lane_end(0), Some(10));

        store.clear();
        assert_eq!(store.max_id(), None);
    }

    #[test]
    fn test_filtered_events_requeried() {
        let store = SharedEvents::from_events(vec![ev(1, 0, 10, 0), ev(2, 0, 10, 1)]);
        let lane_one = FilteredEvents::lane(&store, 1);
        assert_eq!(lane_one.discover().iter().map(|e| e.id).collect::<Vec<_>>(), vec![2]);

        store.push(ev(3, 10, 10, 1));
        assert_eq!(lane_one.discover().iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_select_with_custom_predicate() {
        let store = SharedEvents::from_events(vec![ev(1, 0, 10, 0), ev(2, 0, 600, 0)]);
        let long_ones = store.select(|e| e.duration >= 60);
        assert_eq!(long_ones.discover().len(), 1);
    }
}
