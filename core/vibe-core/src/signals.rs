//! Rolling interaction counters fed by host editor events.
//!
//! The aggregator is the single owner of the raw counters; nothing else
//! mutates them. All reads go through a metrics snapshot
//! ([`crate::metrics::snapshot`]), never through the fields directly.

use std::collections::VecDeque;

use crate::types::Millis;

/// Keystroke timestamps kept for instantaneous speed estimation.
pub const KEYSTROKE_WINDOW: usize = 10;

/// Rolling counters owned exclusively by the signal aggregator.
///
/// Mutated only by the event entry points below and by the scheduler's
/// periodic decay/reset calls. Single-threaded, non-reentrant semantics:
/// the caller serializes events against poll ticks.
#[derive(Debug, Clone)]
pub struct SignalAggregator {
    last_activity_at: Millis,
    last_file_switch_at: Millis,
    typing_chars: u64,
    tab_switches: u32,
    file_changes: u32,
    keystroke_times: VecDeque<Millis>,
}

impl SignalAggregator {
    /// Creates an aggregator anchored at `now`: idle time and time-in-file
    /// both start from zero.
    pub fn new(now: Millis) -> Self {
        Self {
            last_activity_at: now,
            last_file_switch_at: now,
            typing_chars: 0,
            tab_switches: 0,
            file_changes: 0,
            keystroke_times: VecDeque::with_capacity(KEYSTROKE_WINDOW),
        }
    }

    /// Records a content change of `changed_length` characters.
    ///
    /// Negative lengths (malformed host data) are treated as zero. A
    /// zero-length change resets the idle clock (the host did report a
    /// content change) but does not count as typing activity.
    ///
    /// Returns `true` when the change counted as typing, so the caller knows
    /// to restart the typing-burst debounce window.
    pub fn record_keystroke(&mut self, changed_length: i64, now: Millis) -> bool {
        self.last_activity_at = now;

        let delta = changed_length.max(0) as u64;
        if delta == 0 {
            return false;
        }

        self.typing_chars = self.typing_chars.saturating_add(delta);
        if self.keystroke_times.len() == KEYSTROKE_WINDOW {
            self.keystroke_times.pop_front();
        }
        self.keystroke_times.push_back(now);
        true
    }

    /// Records a file/tab switch: bumps both window counters and resets the
    /// time-in-file anchor.
    pub fn record_file_switch(&mut self, now: Millis) {
        self.tab_switches = self.tab_switches.saturating_add(1);
        self.file_changes = self.file_changes.saturating_add(1);
        self.last_file_switch_at = now;
        self.last_activity_at = now;
    }

    /// Records a window focus loss. Refreshes the last-activity anchor so the
    /// idle clock restarts, without touching any typing state.
    pub fn record_focus_loss(&mut self, now: Millis) {
        self.last_activity_at = now;
    }

    /// Periodic reset of the windowed counters (tab switches, file changes).
    /// Bounds growth and gives the classifier a sliding-window-like view
    /// without storing history.
    pub fn reset_window_counters(&mut self) {
        self.tab_switches = 0;
        self.file_changes = 0;
    }

    /// Clears the typing burst: accumulator and ring buffer. Called by the
    /// debounce timer once a quiet period confirms the burst ended.
    pub fn clear_typing_burst(&mut self) {
        self.typing_chars = 0;
        self.keystroke_times.clear();
    }

    pub fn last_activity_at(&self) -> Millis {
        self.last_activity_at
    }

    pub fn last_file_switch_at(&self) -> Millis {
        self.last_file_switch_at
    }

    pub fn tab_switches(&self) -> u32 {
        self.tab_switches
    }

    pub fn file_changes(&self) -> u32 {
        self.file_changes
    }

    pub fn keystroke_times(&self) -> &VecDeque<Millis> {
        &self.keystroke_times
    }

    /// Characters typed in the current burst (since the last debounce decay).
    pub fn typing_burst_chars(&self) -> u64 {
        self.typing_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystroke_updates_activity_and_ring() {
        let mut agg = SignalAggregator::new(1_000);
        assert!(agg.record_keystroke(3, 1_500));
        assert_eq!(agg.last_activity_at(), 1_500);
        assert_eq!(agg.keystroke_times().len(), 1);
        assert_eq!(agg.typing_burst_chars(), 3);
    }

    #[test]
    fn zero_length_change_resets_idle_but_not_typing() {
        let mut agg = SignalAggregator::new(0);
        assert!(!agg.record_keystroke(0, 5_000));
        assert_eq!(agg.last_activity_at(), 5_000);
        assert!(agg.keystroke_times().is_empty());
    }

    #[test]
    fn negative_length_is_clamped_to_zero() {
        let mut agg = SignalAggregator::new(0);
        assert!(!agg.record_keystroke(-42, 2_000));
        assert_eq!(agg.last_activity_at(), 2_000);
        assert!(agg.keystroke_times().is_empty());
    }

    #[test]
    fn ring_buffer_is_bounded() {
        let mut agg = SignalAggregator::new(0);
        for i in 0..25 {
            agg.record_keystroke(1, i * 100);
        }
        assert_eq!(agg.keystroke_times().len(), KEYSTROKE_WINDOW);
        // Oldest retained timestamp is from the 16th keystroke.
        assert_eq!(*agg.keystroke_times().front().unwrap(), 1_500);
    }

    #[test]
    fn file_switch_bumps_both_counters_and_anchors() {
        let mut agg = SignalAggregator::new(0);
        agg.record_file_switch(3_000);
        agg.record_file_switch(4_000);
        assert_eq!(agg.tab_switches(), 2);
        assert_eq!(agg.file_changes(), 2);
        assert_eq!(agg.last_file_switch_at(), 4_000);
        assert_eq!(agg.last_activity_at(), 4_000);
    }

    #[test]
    fn focus_loss_only_touches_activity() {
        let mut agg = SignalAggregator::new(0);
        agg.record_file_switch(1_000);
        agg.record_focus_loss(9_000);
        assert_eq!(agg.last_activity_at(), 9_000);
        assert_eq!(agg.last_file_switch_at(), 1_000);
        assert_eq!(agg.tab_switches(), 1);
    }

    #[test]
    fn window_reset_clears_counters_only() {
        let mut agg = SignalAggregator::new(0);
        agg.record_file_switch(1_000);
        agg.record_keystroke(5, 2_000);
        agg.reset_window_counters();
        assert_eq!(agg.tab_switches(), 0);
        assert_eq!(agg.file_changes(), 0);
        assert_eq!(agg.keystroke_times().len(), 1);
    }

    #[test]
    fn clear_typing_burst_drops_ring_and_accumulator() {
        let mut agg = SignalAggregator::new(0);
        for i in 0..5 {
            agg.record_keystroke(2, i * 50);
        }
        agg.clear_typing_burst();
        assert!(agg.keystroke_times().is_empty());
        assert_eq!(agg.typing_burst_chars(), 0);
    }
}
