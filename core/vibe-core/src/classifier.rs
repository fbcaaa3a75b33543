//! Maps a metrics snapshot to an activity state.
//!
//! Ordered priority rules, first match wins. Procrastination (many tab
//! switches, little typing) outranks raw typing speed so a brief productive
//! burst cannot mask it; stuck is checked before idle because stuck covers
//! the 30s–180s idle band while idle is the open-ended tail.

use crate::types::{ActivityMetrics, ActivityState};

/// Tab switches within the reset window beyond which the session looks like
/// channel surfing.
pub const PROCRASTINATION_TAB_SWITCHES: u32 = 10;
/// Typing speed below which tab switching is not "working across files".
pub const PROCRASTINATION_MAX_TYPING_SPEED: f64 = 100.0;

/// Typing speed above which the session is productive outright.
pub const FAST_TYPING_SPEED: f64 = 200.0;
/// Idle ceiling for the fast-typing rule.
pub const FAST_TYPING_MAX_IDLE_MS: u64 = 10_000;

/// Minimum dwell time in one file before "stuck" applies.
pub const STUCK_MIN_TIME_IN_FILE_MS: u64 = 120_000;
/// Stuck covers the idle band (STUCK_MIN_IDLE_MS, IDLE_THRESHOLD_MS).
pub const STUCK_MIN_IDLE_MS: u64 = 30_000;

/// Idle floor: past this the session is idle no matter what else.
pub const IDLE_THRESHOLD_MS: u64 = 180_000;

/// Fallback split between productive and stuck.
pub const FALLBACK_TYPING_SPEED: f64 = 50.0;

/// Classifies a metrics snapshot. Deterministic and total: every input maps
/// to exactly one of the eight states.
///
/// The committed rule set never consults `previous` (the hysteresis lives in
/// the non-adjacent threshold bands) but the previous state is part of the
/// contract and kept in the signature for callers and future rules.
pub fn classify(metrics: &ActivityMetrics, _previous: ActivityState) -> ActivityState {
    if metrics.tab_switches > PROCRASTINATION_TAB_SWITCHES
        && metrics.typing_speed < PROCRASTINATION_MAX_TYPING_SPEED
    {
        return ActivityState::Procrastinating;
    }

    if metrics.typing_speed > FAST_TYPING_SPEED && metrics.idle_time_ms < FAST_TYPING_MAX_IDLE_MS {
        return ActivityState::Productive;
    }

    if metrics.time_in_file_ms > STUCK_MIN_TIME_IN_FILE_MS
        && metrics.idle_time_ms > STUCK_MIN_IDLE_MS
        && metrics.idle_time_ms < IDLE_THRESHOLD_MS
    {
        return ActivityState::Stuck;
    }

    if metrics.idle_time_ms > IDLE_THRESHOLD_MS {
        return ActivityState::Idle;
    }

    if metrics.typing_speed > FALLBACK_TYPING_SPEED {
        ActivityState::Productive
    } else {
        ActivityState::Stuck
    }
}
