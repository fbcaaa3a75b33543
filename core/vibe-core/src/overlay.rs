//! Build/test overlay state machine.
//!
//! A higher-priority layer driven by task and test lifecycle events. While
//! active it owns the reported state; the classifier's poll ticks are
//! suspended until the overlay returns to `Idle`. Last event wins: a new
//! lifecycle event supersedes any pending revert.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ActivityState;

static BUILD_TASK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)build|compile").unwrap());
static TEST_TASK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)test").unwrap());

/// Outcome of a finished test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed,
}

/// Overlay phases. `Idle` means the classifier has authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    #[default]
    Idle,
    Building,
    TestingInProgress,
    TestsResolved(TestOutcome),
}

/// The overlay state machine proper. The engine owns the revert timer; this
/// type only tracks the phase and answers which state each event forces.
#[derive(Debug, Clone, Default)]
pub struct BuildTestOverlay {
    phase: OverlayPhase,
}

impl BuildTestOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Whether the overlay currently overrides the classifier.
    pub fn is_active(&self) -> bool {
        self.phase != OverlayPhase::Idle
    }

    /// Task started. Build-like names force `building`; test-like names force
    /// `testing` (a name matching both counts as a build). Other tasks leave
    /// the overlay untouched.
    pub fn on_task_started(&mut self, task_name: &str) -> Option<ActivityState> {
        if BUILD_TASK_RE.is_match(task_name) {
            self.phase = OverlayPhase::Building;
            Some(ActivityState::Building)
        } else if TEST_TASK_RE.is_match(task_name) {
            self.phase = OverlayPhase::TestingInProgress;
            Some(ActivityState::Testing)
        } else {
            None
        }
    }

    /// Task ended. A matching name returns the overlay to `Idle` and the
    /// classifier resumes at its next poll tick. Returns `true` when the
    /// overlay was cleared.
    pub fn on_task_ended(&mut self, task_name: &str) -> bool {
        if self.phase == OverlayPhase::Idle {
            return false;
        }
        if BUILD_TASK_RE.is_match(task_name) || TEST_TASK_RE.is_match(task_name) {
            self.phase = OverlayPhase::Idle;
            true
        } else {
            false
        }
    }

    /// A test run started; forces `testing` for its duration.
    pub fn on_test_run_started(&mut self) -> ActivityState {
        self.phase = OverlayPhase::TestingInProgress;
        ActivityState::Testing
    }

    /// A test run finished. All green (at least one pass, zero failures)
    /// resolves to passed; anything else, including an empty run, resolves
    /// to failed.
    pub fn on_test_run_finished(&mut self, passed: u32, failed: u32) -> ActivityState {
        let outcome = if failed == 0 && passed > 0 {
            TestOutcome::Passed
        } else {
            TestOutcome::Failed
        };
        self.phase = OverlayPhase::TestsResolved(outcome);
        match outcome {
            TestOutcome::Passed => ActivityState::TestPassed,
            TestOutcome::Failed => ActivityState::TestFailed,
        }
    }

    /// The revert timer fired (or the engine is clearing the overlay):
    /// classifier authority resumes.
    pub fn clear(&mut self) {
        self.phase = OverlayPhase::Idle;
    }
}
