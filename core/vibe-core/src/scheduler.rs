//! Named, cancellable timer deadlines.
//!
//! The engine owns four timer categories; each has at most one pending
//! deadline. The host (or a test) drives time forward and the queue hands
//! back due timers in deterministic order: earliest deadline first, ties
//! broken by a fixed kind priority so a poll tick sharing an instant with a
//! counter reset always observes the post-reset counters.

use crate::types::Millis;

/// The four timer categories the engine schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Periodic counter-window reset (tab switches, file changes).
    CounterReset,
    /// One-shot typing-burst decay after a quiet period.
    TypingDebounce,
    /// One-shot overlay cool-down back to productive.
    OverlayRevert,
    /// Periodic snapshot-classify-report tick.
    Poll,
}

/// Firing order for simultaneous deadlines. Resets and decays run before the
/// poll so the tick sees settled counters; the overlay revert runs after the
/// poll so a tick coinciding with the end of a cool-down is still suppressed
/// by the active overlay and the revert has the last word at that instant.
const FIRE_ORDER: [TimerKind; 4] = [
    TimerKind::CounterReset,
    TimerKind::TypingDebounce,
    TimerKind::Poll,
    TimerKind::OverlayRevert,
];

/// One deadline slot per [`TimerKind`]. Scheduling a kind replaces its
/// pending deadline; cancelling a kind with no deadline is a no-op.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    deadlines: [Option<Millis>; 4],
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(kind: TimerKind) -> usize {
        match kind {
            TimerKind::CounterReset => 0,
            TimerKind::TypingDebounce => 1,
            TimerKind::OverlayRevert => 2,
            TimerKind::Poll => 3,
        }
    }

    /// Schedules (or reschedules) `kind` to fire at `at`.
    pub fn schedule(&mut self, kind: TimerKind, at: Millis) {
        self.deadlines[Self::slot(kind)] = Some(at);
    }

    /// Cancels a pending deadline. Idempotent.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.deadlines[Self::slot(kind)] = None;
    }

    /// Cancels everything. Idempotent; used by dispose.
    pub fn cancel_all(&mut self) {
        self.deadlines = [None; 4];
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<Millis> {
        self.deadlines[Self::slot(kind)]
    }

    /// Removes and returns the next timer due at or before `now`, or `None`
    /// when nothing is due. Callers loop until exhaustion to drain a time
    /// step.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerKind, Millis)> {
        let mut best: Option<(TimerKind, Millis)> = None;
        for &kind in &FIRE_ORDER {
            if let Some(at) = self.deadline(kind) {
                if at <= now && best.map_or(true, |(_, b)| at < b) {
                    best = Some((kind, at));
                }
            }
        }
        if let Some((kind, _)) = best {
            self.cancel(kind);
        }
        best
    }
}
