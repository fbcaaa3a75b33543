//! # vibe-core
//!
//! Activity-state inference engine: converts noisy, bursty editor telemetry
//! (keystrokes, idle gaps, tab switches, task/test events) into a stable,
//! debounced activity state with a build/test overlay on top.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Hosts wrap with threads or
//!   async if needed.
//! - **Not thread-safe**: Clients provide their own synchronization
//!   (`Mutex`, `RwLock`) when events and ticks arrive from multiple threads.
//! - **Clock-injected**: Every entry point takes `now` in milliseconds, so a
//!   virtual clock drives deterministic tests.
//! - **No ambient singletons**: The composition root owns the one
//!   [`VibeEngine`] instance.
//!
//! ## Quick Start
//!
//! ```rust
//! use vibe_core::{ActivityMetrics, ActivityState, EditorEvent, EngineConfig, VibeEngine};
//!
//! let observer = |state: ActivityState, _metrics: &ActivityMetrics| {
//!     println!("state -> {state:?}");
//! };
//! let mut engine = VibeEngine::new(EngineConfig::default(), Box::new(observer), 0);
//! engine.handle_event(EditorEvent::TextChanged { changed_length: 3 }, 250);
//! engine.advance_to(5_000);
//! ```

// Public modules
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod notify;
pub mod overlay;
pub mod scheduler;
pub mod signals;
pub mod types;

// Re-export commonly used items at crate root
pub use classifier::classify;
pub use config::EngineConfig;
pub use engine::VibeEngine;
pub use error::{Result, VibeError};
pub use metrics::snapshot;
pub use notify::{NullObserver, StateObserver};
pub use overlay::{BuildTestOverlay, OverlayPhase, TestOutcome};
pub use scheduler::{TimerKind, TimerQueue};
pub use signals::SignalAggregator;
pub use types::{ActivityMetrics, ActivityState, EditorEvent, EventRecord, Millis};
