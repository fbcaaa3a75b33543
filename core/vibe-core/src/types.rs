//! Core value types shared by the engine and its clients.
//!
//! Everything here is a plain serde-friendly value. The wire names are
//! snake_case throughout; `EventRecord` is the line format used by recorded
//! telemetry logs (one JSON object per line).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engine-internal time, in milliseconds. All entry points take an explicit
/// `now` so tests can drive a virtual clock.
pub type Millis = u64;

/// The classifier's current best guess at what the developer is doing.
///
/// Closed set: exactly one state is current at any time, and every
/// (state, event) pair has a defined successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    #[default]
    Idle,
    Productive,
    Stuck,
    Procrastinating,
    Testing,
    Building,
    TestPassed,
    TestFailed,
}

impl ActivityState {
    /// Whether this state is forced by the build/test overlay rather than
    /// inferred from interaction metrics.
    pub fn is_overlay_driven(&self) -> bool {
        matches!(
            self,
            Self::Testing | Self::Building | Self::TestPassed | Self::TestFailed
        )
    }
}

/// Point-in-time interaction metrics, immutable once produced.
///
/// `idle_time_ms` and `time_in_file_ms` grow monotonically between input
/// events and reset to zero exactly on the qualifying event (keystroke;
/// file switch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    /// Keystrokes-per-minute equivalent, from the keystroke ring buffer.
    pub typing_speed: f64,
    /// Milliseconds since the last recorded input.
    pub idle_time_ms: Millis,
    /// Tab switches since the last periodic counter reset.
    pub tab_switches: u32,
    /// File changes since the last periodic counter reset.
    pub file_changes: u32,
    /// Milliseconds since the active file last changed.
    pub time_in_file_ms: Millis,
}

/// Host editor telemetry, reduced to the closed set of events the engine
/// understands. Unknown host payload fields are the adapter's problem; by the
/// time an event reaches the engine it is one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    /// A document content change. `changed_length` is the length of the
    /// inserted text; missing or negative values are treated as zero
    /// (cursor-only moves never count as typing).
    TextChanged {
        #[serde(default)]
        changed_length: i64,
    },
    /// The active editor (file/tab) changed.
    EditorSwitched,
    /// The editor window lost focus.
    FocusLost,
    /// A task started. The name is matched against the build and test
    /// patterns case-insensitively.
    TaskStarted { task_name: String },
    /// A task ended.
    TaskEnded { task_name: String },
    /// A test run started (before any results are known).
    TestRunStarted,
    /// A test run finished with per-test counts.
    TestRunFinished {
        #[serde(default)]
        passed: u32,
        #[serde(default)]
        failed: u32,
    },
}

/// One line of a recorded telemetry log: a wall-clock timestamp plus the
/// event itself, flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: EditorEvent,
}

impl EventRecord {
    /// Milliseconds since the Unix epoch, clamped at zero for pre-epoch
    /// timestamps so the engine clock stays unsigned.
    pub fn at_millis(&self) -> Millis {
        self.at.timestamp_millis().max(0) as Millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_state_serializes_snake_case() {
        let json = serde_json::to_string(&ActivityState::TestPassed).unwrap();
        assert_eq!(json, "\"test_passed\"");

        let parsed: ActivityState = serde_json::from_str("\"procrastinating\"").unwrap();
        assert_eq!(parsed, ActivityState::Procrastinating);
    }

    #[test]
    fn activity_state_default_is_idle() {
        assert_eq!(ActivityState::default(), ActivityState::Idle);
    }

    #[test]
    fn overlay_driven_states() {
        assert!(ActivityState::Testing.is_overlay_driven());
        assert!(ActivityState::Building.is_overlay_driven());
        assert!(ActivityState::TestPassed.is_overlay_driven());
        assert!(ActivityState::TestFailed.is_overlay_driven());
        assert!(!ActivityState::Productive.is_overlay_driven());
        assert!(!ActivityState::Idle.is_overlay_driven());
    }

    #[test]
    fn text_changed_defaults_missing_length_to_zero() {
        let event: EditorEvent = serde_json::from_str(r#"{"type": "text_changed"}"#).unwrap();
        assert_eq!(event, EditorEvent::TextChanged { changed_length: 0 });
    }

    #[test]
    fn text_changed_accepts_negative_length() {
        // Malformed host payloads must parse; the aggregator clamps them.
        let event: EditorEvent =
            serde_json::from_str(r#"{"type": "text_changed", "changed_length": -4}"#).unwrap();
        assert_eq!(event, EditorEvent::TextChanged { changed_length: -4 });
    }

    #[test]
    fn task_event_round_trips() {
        let event = EditorEvent::TaskStarted {
            task_name: "npm run build".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"task_started\""));
        let parsed: EditorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn event_record_parses_flattened_line() {
        let line = r#"{"at": "2026-03-01T09:00:00Z", "type": "test_run_finished", "passed": 12, "failed": 0}"#;
        let record: EventRecord = serde_json::from_str(line).unwrap();
        assert_eq!(
            record.event,
            EditorEvent::TestRunFinished {
                passed: 12,
                failed: 0
            }
        );
        assert!(record.at_millis() > 0);
    }
}
