//! Transition reporting.
//!
//! The engine delivers each real state transition exactly once; observers
//! receive the new state plus the metrics snapshot taken at transition time.
//! The `(state, metrics)` pair is immutable after construction.

use crate::types::{ActivityMetrics, ActivityState};

/// Receives `(state, metrics)` transitions. Implemented automatically for
/// closures, so a composition root can pass `|state, metrics| ...` directly.
pub trait StateObserver {
    fn on_state_change(&mut self, state: ActivityState, metrics: &ActivityMetrics);
}

impl<F> StateObserver for F
where
    F: FnMut(ActivityState, &ActivityMetrics),
{
    fn on_state_change(&mut self, state: ActivityState, metrics: &ActivityMetrics) {
        self(state, metrics)
    }
}

/// Observer that drops every transition. Useful when only pull-style reads
/// are wanted.
#[derive(Debug, Default)]
pub struct NullObserver;

impl StateObserver for NullObserver {
    fn on_state_change(&mut self, _state: ActivityState, _metrics: &ActivityMetrics) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut observer = |state: ActivityState, _metrics: &ActivityMetrics| {
                seen.push(state);
            };
            let metrics = ActivityMetrics {
                typing_speed: 0.0,
                idle_time_ms: 0,
                tab_switches: 0,
                file_changes: 0,
                time_in_file_ms: 0,
            };
            observer.on_state_change(ActivityState::Productive, &metrics);
        }
        assert_eq!(seen, vec![ActivityState::Productive]);
    }
}
