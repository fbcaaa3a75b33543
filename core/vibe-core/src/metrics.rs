//! Metrics snapshot builder.
//!
//! Pure view over the aggregator: given the counters and `now`, produce an
//! [`ActivityMetrics`] record. Mutation (burst decay, window resets) is the
//! scheduler's job, never the snapshot's.

use std::collections::VecDeque;

use crate::signals::SignalAggregator;
use crate::types::{ActivityMetrics, Millis};

/// Builds a point-in-time metrics record. Pure given the aggregator state
/// and `now`; the aggregator is not mutated.
pub fn snapshot(agg: &SignalAggregator, now: Millis) -> ActivityMetrics {
    ActivityMetrics {
        typing_speed: typing_speed(agg.keystroke_times()),
        idle_time_ms: now.saturating_sub(agg.last_activity_at()),
        tab_switches: agg.tab_switches(),
        file_changes: agg.file_changes(),
        time_in_file_ms: now.saturating_sub(agg.last_file_switch_at()),
    }
}

/// Keystrokes-per-minute equivalent from the ring buffer of recent keystroke
/// timestamps: `60000 / average inter-keystroke interval`.
///
/// Fewer than two samples means no interval to measure, so speed is zero.
/// The average is clamped to 1ms so a same-millisecond burst stays finite.
fn typing_speed(times: &VecDeque<Millis>) -> f64 {
    let (Some(&first), Some(&last)) = (times.front(), times.back()) else {
        return 0.0;
    };
    if times.len() < 2 {
        return 0.0;
    }

    let span = last.saturating_sub(first) as f64;
    let intervals = (times.len() - 1) as f64;
    let avg_interval_ms = (span / intervals).max(1.0);

    60_000.0 / avg_interval_ms
}
