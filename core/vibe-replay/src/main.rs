//! vibe-replay: CLI harness for the Vibe activity-state engine.
//!
//! Stands in for the host editor: feeds recorded or live telemetry into the
//! engine and reports the transitions it produces.
//!
//! ## Subcommands
//!
//! - `replay`: Deterministic replay of a JSONL event log on a virtual clock
//! - `live`: Real-time drive from stdin events

mod live;
mod logging;
mod player;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use vibe_core::EngineConfig;

#[derive(Parser)]
#[command(name = "vibe-replay")]
#[command(about = "Vibe activity engine replay harness")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded telemetry log (JSONL, one event record per line)
    Replay {
        /// Path to the event log
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Optional engine config JSON (timer intervals)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Drive the engine from stdin events in real time
    Live {
        /// Optional engine config JSON (timer intervals)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _logging_guard = logging::init(matches!(cli.command, Commands::Live { .. }));

    match cli.command {
        Commands::Replay { file, config } => {
            let config = match load_config(config) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load config");
                    return ExitCode::FAILURE;
                }
            };
            match player::replay_file(&file, config) {
                Ok(summary) => match serde_json::to_string_pretty(&summary) {
                    Ok(json) => {
                        println!("{json}");
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize summary");
                        ExitCode::FAILURE
                    }
                },
                Err(e) => {
                    tracing::error!(error = %e, "Replay failed");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Live { config } => {
            let config = match load_config(config) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load config");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = live::run(config) {
                tracing::error!(error = %e, "Live mode failed");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

fn load_config(path: Option<PathBuf>) -> vibe_core::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(&path),
        None => Ok(EngineConfig::default()),
    }
}
