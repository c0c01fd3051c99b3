//! Tracing subscriber setup.
//!
//! Filter priority: `DECK_LOG`, then `RUST_LOG`, then the `[log] level`
//! config value, then the level implied by `-v` / `-q`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "DECK_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Where log lines go. The TUI owns the terminal, so it logs to a file.
#[derive(Debug, Clone)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
}

/// Default TUI log file.
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("deck.log")
}

fn env_directive() -> Option<String> {
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
}

pub fn build_env_filter(verbosity: Verbosity, config_level: Option<&str>) -> EnvFilter {
    let directive = env_directive()
        .or_else(|| config_level.map(str::to_owned))
        .unwrap_or_else(|| verbosity.default_level().to_string().to_lowercase());
    EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_level().to_string().to_lowercase()))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: Verbosity, config_level: Option<&str>, sink: &LogSink) -> std::io::Result<()> {
    let filter = build_env_filter(verbosity, config_level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let result = match sink {
        LogSink::Stderr => builder
            .with_writer(std::io::stderr)
            .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
            .try_init(),
        LogSink::File(path) => {
            let file = open_log(path)?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).try_init()
        }
    };
    // Already initialised (tests, repeated calls) is fine.
    let _ = result;
    Ok(())
}

fn open_log(path: &Path) -> std::io::Result<std::fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}
