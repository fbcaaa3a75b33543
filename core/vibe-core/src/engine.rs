//! VibeEngine - the owned composition of aggregator, classifier, overlay,
//! and scheduler.
//!
//! The engine is:
//! - **Synchronous**: no async runtime; every entry point returns immediately.
//! - **Clock-injected**: callers pass `now` in milliseconds, so tests drive a
//!   virtual clock and hosts pass wall time.
//! - **Single-owner**: one instance, owned by the composition root. No
//!   ambient singletons. Multi-threaded hosts wrap it in a `Mutex`.
//!
//! Time flows through two entry points: `handle_event` for host telemetry and
//! `advance_to` for pure time passage. Both first fire any timers that came
//! due, in deadline order, exactly as a cooperative host event loop would
//! have interleaved them.

use tracing::debug;

use crate::classifier::classify;
use crate::config::EngineConfig;
use crate::metrics::snapshot;
use crate::notify::StateObserver;
use crate::overlay::BuildTestOverlay;
use crate::scheduler::{TimerKind, TimerQueue};
use crate::signals::SignalAggregator;
use crate::types::{ActivityMetrics, ActivityState, EditorEvent, Millis};

/// The activity-state inference engine.
///
/// Converts noisy editor telemetry into a stable activity state and reports
/// each transition exactly once through the observer.
pub struct VibeEngine {
    config: EngineConfig,
    aggregator: SignalAggregator,
    overlay: BuildTestOverlay,
    timers: TimerQueue,
    observer: Box<dyn StateObserver + Send>,
    state: ActivityState,
    now: Millis,
    disposed: bool,
}

impl VibeEngine {
    /// Creates an engine anchored at `now`, starting in `idle` with the poll
    /// and counter-reset timers armed. No transition is reported at startup.
    pub fn new(config: EngineConfig, observer: Box<dyn StateObserver + Send>, now: Millis) -> Self {
        let mut timers = TimerQueue::new();
        timers.schedule(TimerKind::Poll, now + config.poll_interval_ms);
        timers.schedule(
            TimerKind::CounterReset,
            now + config.counter_reset_interval_ms,
        );

        Self {
            config,
            aggregator: SignalAggregator::new(now),
            overlay: BuildTestOverlay::new(),
            timers,
            observer,
            state: ActivityState::Idle,
            now,
            disposed: false,
        }
    }

    /// Advances the clock to `now`, firing every timer due on the way in
    /// deadline order. A `now` earlier than the engine's clock is clamped;
    /// time never runs backwards.
    pub fn advance_to(&mut self, now: Millis) {
        if self.disposed {
            return;
        }
        let now = now.max(self.now);
        while let Some((kind, at)) = self.timers.pop_due(now) {
            self.fire(kind, at);
        }
        self.now = now;
    }

    /// Applies one host event at `now`. Timers due before the event fire
    /// first, matching the serialized callback order of a cooperative host.
    pub fn handle_event(&mut self, event: EditorEvent, now: Millis) {
        if self.disposed {
            return;
        }
        self.advance_to(now);
        let now = self.now;

        match event {
            EditorEvent::TextChanged { changed_length } => {
                if self.aggregator.record_keystroke(changed_length, now) {
                    self.timers.schedule(
                        TimerKind::TypingDebounce,
                        now + self.config.typing_debounce_ms,
                    );
                }
            }
            EditorEvent::EditorSwitched => self.aggregator.record_file_switch(now),
            EditorEvent::FocusLost => self.aggregator.record_focus_loss(now),
            EditorEvent::TaskStarted { task_name } => {
                if let Some(forced) = self.overlay.on_task_started(&task_name) {
                    self.timers.cancel(TimerKind::OverlayRevert);
                    self.force_state(forced, now);
                }
            }
            EditorEvent::TaskEnded { task_name } => {
                if self.overlay.on_task_ended(&task_name) {
                    // Classifier authority resumes at the next poll tick.
                    self.timers.cancel(TimerKind::OverlayRevert);
                }
            }
            EditorEvent::TestRunStarted => {
                let forced = self.overlay.on_test_run_started();
                self.timers.cancel(TimerKind::OverlayRevert);
                self.force_state(forced, now);
            }
            EditorEvent::TestRunFinished { passed, failed } => {
                let forced = self.overlay.on_test_run_finished(passed, failed);
                self.timers
                    .schedule(TimerKind::OverlayRevert, now + self.config.test_revert_ms);
                self.force_state(forced, now);
            }
        }
    }

    /// Forces a state from outside the classifier (test harness, host
    /// command). Reported through the same once-per-transition discipline:
    /// forcing the current state is a no-op.
    pub fn manual_state_change(&mut self, state: ActivityState, now: Millis) {
        if self.disposed {
            return;
        }
        self.advance_to(now);
        self.force_state(state, self.now);
    }

    /// The state currently reported to collaborators.
    pub fn current_state(&self) -> ActivityState {
        self.state
    }

    /// Pull-style metrics read. Does not mutate the engine or fire timers.
    pub fn metrics_snapshot(&self, now: Millis) -> ActivityMetrics {
        snapshot(&self.aggregator, now.max(self.now))
    }

    /// Cancels all timers and silences the engine. Safe to call repeatedly
    /// and from any state; every entry point is a no-op afterwards.
    pub fn dispose(&mut self) {
        self.timers.cancel_all();
        self.disposed = true;
    }

    fn fire(&mut self, kind: TimerKind, at: Millis) {
        match kind {
            TimerKind::Poll => {
                self.timers
                    .schedule(TimerKind::Poll, at + self.config.poll_interval_ms);
                if self.overlay.is_active() {
                    return;
                }
                let metrics = snapshot(&self.aggregator, at);
                let next = classify(&metrics, self.state);
                if next != self.state {
                    self.transition(next, &metrics);
                }
            }
            TimerKind::CounterReset => {
                self.timers.schedule(
                    TimerKind::CounterReset,
                    at + self.config.counter_reset_interval_ms,
                );
                self.aggregator.reset_window_counters();
            }
            TimerKind::TypingDebounce => self.aggregator.clear_typing_burst(),
            TimerKind::OverlayRevert => {
                // Cool-down complete: back to productive regardless of what
                // the classifier thought before the run.
                self.overlay.clear();
                self.force_state(ActivityState::Productive, at);
            }
        }
    }

    fn force_state(&mut self, state: ActivityState, now: Millis) {
        if state != self.state {
            let metrics = snapshot(&self.aggregator, now);
            self.transition(state, &metrics);
        }
    }

    fn transition(&mut self, state: ActivityState, metrics: &ActivityMetrics) {
        self.state = state;
        debug!(state = ?state, idle_ms = metrics.idle_time_ms, typing_speed = metrics.typing_speed, "activity state changed");
        self.observer.on_state_change(state, metrics);
    }
}
