#![deny(missing_docs)]
//! Shared logging utilities for the catalog workspace.
//!
//! Components never touch a global logger directly. They receive a
//! [`LogContext`] at construction and append human-readable lines to one of
//! two named channels: [`Channel::App`] for progress and [`Channel::Error`]
//! for failures. The default sink forwards to the `log` facade using the
//! channel name as the log target, so [`initialize`] can route each channel to
//! its own file.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Log target used for the application channel.
pub const APP_TARGET: &str = "app";
/// Log target used for the error channel.
pub const ERROR_TARGET: &str = "error";

/// One of the two named log streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Progress and informational output.
    App,
    /// Failures: unavailable pages, rejected items, I/O errors.
    Error,
}

impl Channel {
    /// The `log` target this channel is written to.
    pub fn target(self) -> &'static str {
        match self {
            Channel::App => APP_TARGET,
            Channel::Error => ERROR_TARGET,
        }
    }
}

/// Destination for log lines.
pub trait LogSink: Send + Sync {
    /// Append one line to `channel`.
    fn write(&self, channel: Channel, level: Level, message: &str);
}

/// Forwards every line to the global `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn write(&self, channel: Channel, level: Level, message: &str) {
        log::log!(target: channel.target(), level, "{message}");
    }
}

/// A recorded log line, as captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Channel the line was written to.
    pub channel: Channel,
    /// Severity.
    pub level: Level,
    /// Formatted message.
    pub message: String,
}

/// Keeps every line in memory. Intended for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<LogLine>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far.
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Lines written to a single channel.
    pub fn channel(&self, channel: Channel) -> Vec<LogLine> {
        self.lines()
            .into_iter()
            .filter(|line| line.channel == channel)
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, channel: Channel, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(LogLine {
                channel,
                level,
                message: message.to_string(),
            });
        }
    }
}

/// Handle passed to every component that logs.
#[derive(Clone)]
pub struct LogContext {
    sink: Arc<dyn LogSink>,
}

impl LogContext {
    /// Wrap an arbitrary sink.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Context writing through the `log` facade.
    pub fn facade() -> Self {
        Self::new(Arc::new(FacadeSink))
    }

    /// Context backed by a fresh [`MemorySink`], returned alongside it.
    pub fn memory() -> (Self, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Self::new(sink.clone()), sink)
    }

    /// Write a pre-formatted line.
    pub fn write(&self, channel: Channel, level: Level, args: fmt::Arguments<'_>) {
        self.sink.write(channel, level, &args.to_string());
    }

    /// Info line on the application channel.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.write(Channel::App, Level::Info, args);
    }

    /// Debug line on the application channel.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.write(Channel::App, Level::Debug, args);
    }

    /// Warning on the application channel.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.write(Channel::App, Level::Warn, args);
    }

    /// Error line on the error channel.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.write(Channel::Error, Level::Error, args);
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::facade()
    }
}

impl fmt::Debug for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogContext").finish_non_exhaustive()
    }
}

/// Logs an info-level message on the application channel.
#[macro_export]
macro_rules! catalog_info {
    ($log:expr, $($arg:tt)*) => {{
        $log.info(format_args!($($arg)*));
    }};
}

/// Logs a debug-level message on the application channel.
#[macro_export]
macro_rules! catalog_debug {
    ($log:expr, $($arg:tt)*) => {{
        $log.debug(format_args!($($arg)*));
    }};
}

/// Logs a warning on the application channel.
#[macro_export]
macro_rules! catalog_warn {
    ($log:expr, $($arg:tt)*) => {{
        $log.warn(format_args!($($arg)*));
    }};
}

/// Logs an error on the error channel.
#[macro_export]
macro_rules! catalog_error {
    ($log:expr, $($arg:tt)*) => {{
        $log.error(format_args!($($arg)*));
    }};
}

/// Where the global logger writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Terminal only.
    Terminal,
    /// Terminal plus the per-channel files.
    Both(PathBuf),
}

/// Global logger settings applied once at process start.
#[derive(Debug, Clone)]
pub struct LogSetup {
    /// Destination of the log lines.
    pub destination: LogDestination,
    /// Lowest level written.
    pub level: LevelFilter,
}

impl Default for LogSetup {
    fn default() -> Self {
        Self {
            destination: LogDestination::Terminal,
            level: LevelFilter::Info,
        }
    }
}

/// Install the global logger described by `setup`.
///
/// File loggers that cannot be created are reported on stderr and skipped.
/// Calling this twice is harmless: the second call is ignored.
pub fn initialize(setup: &LogSetup) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        setup.level,
        build_config(None),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let LogDestination::Both(dir) = &setup.destination {
        loggers.extend(create_channel_logger(dir, Channel::App, setup.level));
        loggers.extend(create_channel_logger(dir, Channel::Error, setup.level));
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config(target: Option<&'static str>) -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error);
    if let Some(target) = target {
        builder.add_filter_allow_str(target);
    }
    builder.build()
}

fn create_channel_logger(
    dir: &Path,
    channel: Channel,
    level: LevelFilter,
) -> Option<Box<dyn SharedLogger>> {
    if let Err(err) = fs::create_dir_all(dir) {
        eprintln!("Warning: Could not create log directory {:?}: {}", dir, err);
        return None;
    }
    let path = dir.join(format!("{}.log", channel.target()));
    match File::create(&path) {
        Ok(file) => Some(WriteLogger::new(
            level,
            build_config(Some(channel.target())),
            file,
        )),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
