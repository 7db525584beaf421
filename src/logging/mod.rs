//! Logging setup driven by environment variables.
//!
//! - `LOG_MODE`: "stdout" (default) or "file"
//! - `LOG_LEVEL`: trace | debug | info | warn | error (default "info")
//! - `LOG_FILE_PATH`: file mode only; the date is appended so files roll
//!   daily (default "logs/mint-client.log")

use chrono::Utc;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, File},
    path::Path,
};

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Rolls the configured path by appending today's UTC date before the
/// extension: `logs/mint-client.log` becomes `logs/mint-client-2026-08-07.log`.
fn rolled_file_path(base: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d");
    match base.strip_suffix(".log") {
        Some(stem) => format!("{stem}-{date}.log"),
        None => format!("{base}-{date}.log"),
    }
}

pub fn setup_logging() {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
    let level = parse_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

    if log_mode.to_lowercase() == "file" {
        let base = env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/mint-client.log".to_string());
        let path = rolled_file_path(&base);

        if let Some(parent) = Path::new(&path).parent() {
            create_dir_all(parent).expect("Failed to create log directory");
        }
        let log_file = File::create(&path)
            .unwrap_or_else(|e| panic!("Unable to create log file {path}: {e}"));

        WriteLogger::init(level, Config::default(), log_file)
            .expect("Failed to initialize file logger");
    } else {
        SimpleLogger::init(level, Config::default()).expect("Failed to initialize logger");
    }
}
