//! Replay driver: feeds a recorded telemetry log through the engine on a
//! virtual clock derived from the record timestamps.
//!
//! The log format is JSONL: one [`EventRecord`] per line, blank lines
//! skipped. Replay is strict: a malformed line aborts with the line number,
//! since a recorded log that fails to parse is a recording bug worth
//! surfacing, not something to paper over.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;

use vibe_core::{
    ActivityMetrics, ActivityState, EngineConfig, EventRecord, Millis, Result, VibeEngine,
    VibeError,
};

/// One reported transition, stamped with the record time the harness was
/// processing when the transition surfaced.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub observed_at: DateTime<Utc>,
    pub state: ActivityState,
    pub metrics: ActivityMetrics,
}

/// Replay outcome printed as the JSON summary.
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub final_state: ActivityState,
    pub transitions: Vec<Transition>,
}

/// A transition line for live mode, echoing the `state_changed` message the
/// engine's original host pushed to its UI.
#[derive(Debug, Serialize)]
pub struct StateChangeLine {
    pub command: &'static str,
    pub state: ActivityState,
    pub metrics: ActivityMetrics,
}

impl StateChangeLine {
    pub fn new(state: ActivityState, metrics: ActivityMetrics) -> Self {
        Self {
            command: "state_changed",
            state,
            metrics,
        }
    }
}

/// Parses a JSONL telemetry log. Blank lines are skipped; the first
/// malformed line fails the whole parse with its line number.
pub fn parse_records(content: &str) -> Result<Vec<EventRecord>> {
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: EventRecord = serde_json::from_str(line).map_err(|e| VibeError::Json {
            context: format!("Failed to parse event record on line {}", index + 1),
            source: e,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Replays parsed records through a fresh engine and collects the summary.
///
/// The virtual clock starts at the first record's timestamp and, after the
/// last record, advances by the revert interval so a trailing test verdict
/// cool-down settles instead of freezing the summary mid-overlay.
pub fn replay_records(records: &[EventRecord], config: EngineConfig) -> ReplaySummary {
    let transitions: Arc<Mutex<Vec<Transition>>> = Arc::new(Mutex::new(Vec::new()));
    let cursor = Arc::new(AtomicU64::new(
        records.first().map(EventRecord::at_millis).unwrap_or(0),
    ));

    let sink = Arc::clone(&transitions);
    let observer_cursor = Arc::clone(&cursor);
    let observer = move |state: ActivityState, metrics: &ActivityMetrics| {
        let observed_at = millis_to_datetime(observer_cursor.load(Ordering::Relaxed));
        if let Ok(mut sink) = sink.lock() {
            sink.push(Transition {
                observed_at,
                state,
                metrics: metrics.clone(),
            });
        }
    };

    let start = records.first().map(EventRecord::at_millis).unwrap_or(0);
    let mut engine = VibeEngine::new(config.clone(), Box::new(observer), start);

    for record in records {
        cursor.store(record.at_millis(), Ordering::Relaxed);
        engine.handle_event(record.event.clone(), record.at_millis());
    }

    if let Some(last) = records.last() {
        let settle = last.at_millis() + config.test_revert_ms;
        cursor.store(settle, Ordering::Relaxed);
        engine.advance_to(settle);
    }

    let final_state = engine.current_state();
    engine.dispose();

    let transitions = transitions
        .lock()
        .map(|t| t.clone())
        .unwrap_or_default();
    ReplaySummary {
        events: records.len(),
        final_state,
        transitions,
    }
}

/// Reads, parses, and replays a telemetry log file.
pub fn replay_file(path: &Path, config: EngineConfig) -> Result<ReplaySummary> {
    let content = fs::read_to_string(path).map_err(|e| VibeError::Io {
        context: format!("Failed to read event log {}", path.display()),
        source: e,
    })?;
    let records = parse_records(&content)?;
    Ok(replay_records(&records, config))
}

fn millis_to_datetime(ms: Millis) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms as i64).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LOG: &str = r#"
{"at": "2026-03-01T09:00:00Z", "type": "editor_switched"}
{"at": "2026-03-01T09:00:01Z", "type": "text_changed", "changed_length": 5}

{"at": "2026-03-01T09:00:02Z", "type": "test_run_started"}
{"at": "2026-03-01T09:00:04Z", "type": "test_run_finished", "passed": 7, "failed": 0}
"#;

    #[test]
    fn parse_skips_blank_lines() {
        let records = parse_records(LOG).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn parse_reports_line_number_on_failure() {
        let err = parse_records("{\"at\": \"2026-03-01T09:00:00Z\", \"type\": \"editor_switched\"}\nnot json\n")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 2"), "unexpected error: {message}");
    }

    #[test]
    fn replay_settles_trailing_cooldown() {
        let records = parse_records(LOG).unwrap();
        let summary = replay_records(&records, EngineConfig::default());

        assert_eq!(summary.events, 4);
        // testing -> test_passed -> productive (settled revert).
        let states: Vec<ActivityState> =
            summary.transitions.iter().map(|t| t.state).collect();
        assert_eq!(
            states,
            vec![
                ActivityState::Testing,
                ActivityState::TestPassed,
                ActivityState::Productive,
            ]
        );
        assert_eq!(summary.final_state, ActivityState::Productive);
    }

    #[test]
    fn replay_of_empty_log_reports_nothing() {
        let summary = replay_records(&[], EngineConfig::default());
        assert_eq!(summary.events, 0);
        assert!(summary.transitions.is_empty());
        assert_eq!(summary.final_state, ActivityState::Idle);
    }

    #[test]
    fn replay_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{LOG}").unwrap();

        let summary = replay_file(file.path(), EngineConfig::default()).unwrap();
        assert_eq!(summary.events, 4);
        assert_eq!(summary.final_state, ActivityState::Productive);
    }

    #[test]
    fn replay_file_missing_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = replay_file(&dir.path().join("absent.jsonl"), EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, VibeError::Io { .. }));
    }

    #[test]
    fn state_change_line_serializes_command() {
        let line = StateChangeLine::new(
            ActivityState::Building,
            ActivityMetrics {
                typing_speed: 0.0,
                idle_time_ms: 0,
                tab_switches: 0,
                file_changes: 0,
                time_in_file_ms: 0,
            },
        );
        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"command\":\"state_changed\""));
        assert!(json.contains("\"state\":\"building\""));
    }
}
