use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::Level;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    prelude::*,
    Registry,
};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Plain,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    File,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct LogConfig {
    /// Log level, e.g. "info", "debug", "trace". `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub output: LogOutput,
    /// A log file, or a directory in which a dated file is created.
    /// Required if output is "file".
    #[serde(default)]
    pub file_path: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
        }
    }
}

/// Parses a level name, falling back to INFO for anything unrecognized.
pub fn parse_level(level: &str) -> Level {
    Level::from_str(level).unwrap_or(Level::INFO)
}

/// Resolves the file to write to. A directory gets `ethwatch-<date>.log` inside it.
pub fn resolve_log_path(path: &Path, today: NaiveDate) -> PathBuf {
    if path.is_dir() {
        path.join(format!("ethwatch-{}.log", today.format("%Y-%m-%d")))
    } else {
        path.to_path_buf()
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(parse_level(&config.level)).into())
    })
}

/// Installs the global tracing subscriber described by `config`.
pub fn init(config: &LogConfig) -> Result<()> {
    let subscriber = Registry::default().with(build_filter(config));

    match config.output {
        LogOutput::File => {
            let file_path = config
                .file_path
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Log output is 'file' but 'file_path' is not specified"))?;
            let path = resolve_log_path(Path::new(file_path), Local::now().date_naive());
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            match config.format {
                LogFormat::Json => subscriber
                    .with(fmt::layer().with_writer(log_file).with_ansi(false).json())
                    .try_init()?,
                LogFormat::Plain => subscriber
                    .with(fmt::layer().with_writer(log_file).with_ansi(false))
                    .try_init()?,
            }
        }
        LogOutput::Stdout => match config.format {
            LogFormat::Json => subscriber
                .with(fmt::layer().with_writer(std::io::stdout).json())
                .try_init()?,
            LogFormat::Plain => subscriber
                .with(fmt::layer().with_writer(std::io::stdout).pretty())
                .try_init()?,
        },
    };

    Ok(())
}
