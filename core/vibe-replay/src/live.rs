//! Live mode: drive the engine from stdin events in real time.
//!
//! Each stdin line is a bare [`EditorEvent`] JSON object, stamped with wall
//! time on arrival. The engine sits behind a `Mutex`: keystroke events and
//! timer pumping arrive from different threads, and the engine itself is not
//! thread-safe. A background thread pumps `advance_to` so poll ticks and
//! reverts fire during input lulls. Live input is lenient: a malformed line
//! is logged and skipped, the stream keeps flowing.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use vibe_core::{
    ActivityMetrics, ActivityState, EditorEvent, EngineConfig, Millis, VibeEngine,
};

use crate::player::StateChangeLine;

/// Pump cadence for timer firing between input events.
const PUMP_INTERVAL: Duration = Duration::from_millis(250);

/// Runs the live loop until stdin closes. Transitions are printed to stdout
/// as JSON lines.
pub fn run(config: EngineConfig) -> io::Result<()> {
    let start = Instant::now();
    let observer = |state: ActivityState, metrics: &ActivityMetrics| {
        match serde_json::to_string(&StateChangeLine::new(state, metrics.clone())) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!(error = %e, "Failed to serialize transition"),
        }
    };

    let engine = Arc::new(Mutex::new(VibeEngine::new(config, Box::new(observer), 0)));
    let running = Arc::new(AtomicBool::new(true));

    let pump_engine = Arc::clone(&engine);
    let pump_running = Arc::clone(&running);
    let pump = thread::spawn(move || {
        while pump_running.load(Ordering::Relaxed) {
            thread::sleep(PUMP_INTERVAL);
            if let Ok(mut engine) = pump_engine.lock() {
                engine.advance_to(elapsed_ms(start));
            }
        }
    });

    info!("Live mode started; reading events from stdin");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<EditorEvent>(trimmed) {
            Ok(event) => {
                if let Ok(mut engine) = engine.lock() {
                    engine.handle_event(event, elapsed_ms(start));
                }
            }
            Err(e) => warn!(error = %e, "Skipping malformed event line"),
        }
    }

    running.store(false, Ordering::Relaxed);
    let _ = pump.join();

    if let Ok(mut engine) = engine.lock() {
        let final_state = engine.current_state();
        engine.dispose();
        info!(state = ?final_state, "Live mode finished");
    }
    Ok(())
}

fn elapsed_ms(start: Instant) -> Millis {
    start.elapsed().as_millis() as Millis
}
