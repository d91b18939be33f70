//! buffscope-index-worker - Subprocess for building buff lookup indexes.
//!
//! Builds the interval index for one fight and side off the caller's process,
//! so a large event set never stalls the interactive side.
//!
//! Usage: buffscope-index-worker <events_file> [config_file]
//!
//! Output: JSON to stdout with the index summary and per-ability uptime.

mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use buffscope_core::{
    ConfigError, CoordinatorError, CoreConfig, TaskCoordinator, TaskKey, TaskState,
};
use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;

use output::{FightEvents, IndexWorkerOutput};

/// How often to log while a build is still running
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
enum WorkerError {
    #[error("failed to read events file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse events file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error("index build failed: {0}")]
    Build(String),

    #[error("failed to serialize output")]
    Serialize(#[source] serde_json::Error),
}

/// Initialize logging, writing to BUFFSCOPE_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("BUFFSCOPE_LOG_PATH") {
        if let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        tracing::error!("Usage: buffscope-index-worker <events_file> [config_file]");
        std::process::exit(1);
    }

    let events_path = PathBuf::from(&args[1]);
    let config_path = args.get(2).map(PathBuf::from);

    match run(&events_path, config_path.as_deref()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!(error = %e, "Index worker failed");
            std::process::exit(1);
        }
    }
}

fn run(events_path: &Path, config_path: Option<&Path>) -> Result<String, WorkerError> {
    let timer = Instant::now();

    let config = match config_path {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig::load(),
    };
    let fight = load_fight(events_path)?;

    let key = TaskKey::for_events(fight.side, fight.fight_id, &fight.events);
    tracing::info!(task = %key, events = fight.events.len(), "Loaded fight events");

    let mut coordinator = TaskCoordinator::new(&config)?;
    coordinator.submit(key, fight.events, fight.window);

    let state = loop {
        let state = coordinator.pump_blocking(PROGRESS_LOG_INTERVAL);
        if let TaskState::Running { phase } = &state {
            tracing::info!(task = %key, phase = phase.label(), "Still building");
            continue;
        }
        break state;
    };

    let index = match state {
        TaskState::Done(index) => index,
        TaskState::Failed(message) => return Err(WorkerError::Build(message)),
        other => {
            return Err(WorkerError::Build(format!("task ended while {}", other.name())));
        }
    };

    let mut output = IndexWorkerOutput::new(key, &index);
    output.elapsed_ms = timer.elapsed().as_millis();

    serde_json::to_string(&output).map_err(WorkerError::Serialize)
}

fn load_fight(path: &Path) -> Result<FightEvents, WorkerError> {
    let contents = fs::read_to_string(path).map_err(|e| WorkerError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| WorkerError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_writes_summary() {
        let json = r#"{
            "fightId": 4,
            "side": "friendly",
            "window": { "start": 0, "end": 15000 },
            "events": [
                { "timestamp": 0, "abilityId": 5, "targetId": 1, "type": "applybuff" },
                { "timestamp": 5000, "abilityId": 5, "targetId": 1, "type": "refreshbuff" },
                { "timestamp": 12000, "abilityId": 5, "targetId": 1, "type": "removebuff" },
                { "timestamp": 3000, "abilityId": 5, "targetId": 2, "type": "applybuff" },
                { "timestamp": 1000, "abilityId": 8, "targetId": 3, "type": "applybuff" },
                { "timestamp": 4000, "abilityId": 8, "targetId": 3, "type": "fade" },
                { "timestamp": 4000, "abilityId": 8, "type": "applybuff" }
            ]
        }"#;
        let events_path = std::env::temp_dir().join(format!(
            "buffscope-worker-events-{}.json",
            std::process::id()
        ));
        let config_path = std::env::temp_dir().join(format!(
            "buffscope-worker-config-{}.toml",
            std::process::id()
        ));
        fs::write(&events_path, json).unwrap();
        fs::write(&config_path, "worker_threads = 1\n").unwrap();

        let result = run(&events_path, Some(&config_path));
        let _ = fs::remove_file(&events_path);
        let _ = fs::remove_file(&config_path);

        let output: IndexWorkerOutput = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(output.task_key.fight_id, 4);
        assert_eq!(output.summary.abilities, 2);
        assert_eq!(output.summary.intervals, 3);
        assert_eq!(output.abilities[0].ability_id, 5);
        assert_eq!(output.abilities[0].uptime_ms, 15_000);
        assert_eq!(output.abilities[0].uptime_pct, "100.0%");
        assert_eq!(output.abilities[1].ability_id, 8);
        assert_eq!(output.abilities[1].uptime, "0:03.0");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let path = std::env::temp_dir().join("buffscope-worker-missing.json");
        let err = load_fight(&path).unwrap_err();
        assert!(matches!(err, WorkerError::Read { .. }));
    }
}
