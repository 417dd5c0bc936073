use crate::error::{BedrockError, Result};
use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

static LAMBDA_LOGGER: Lazy<LambdaLogger> = Lazy::new(LambdaLogger::new);

/// Installs the logger. Calling it again only swaps the configuration,
/// so warm containers and tests can re-initialise freely.
pub fn init_with_config(config: LoggerConfig) -> Result<()> {
    let level = config.min_level.to_level_filter();
    LAMBDA_LOGGER.update_config(config)?;

    if log::set_logger(&*LAMBDA_LOGGER).is_err() {
        log::debug!("Logger already installed, configuration replaced");
    }

    log::set_max_level(level);
    Ok(())
}

/// Tags every following entry with the invocation's request id.
pub fn set_request_id(request_id: Option<String>) {
    if let Ok(mut current) = LAMBDA_LOGGER.request_id.lock() {
        *current = request_id;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

/// One emitted line. Serialized as-is when JSON output is on, which is
/// what CloudWatch Logs Insights queries against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String, module: String, file: String, line: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            message,
            module,
            file,
            line,
            request_id: None,
            duration_ms: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_file_location: true,
            show_module: true,
            include_timestamp: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            output_json: false,
            ..Default::default()
        }
    }

    /// `LOG_FORMAT=pretty` selects the development preset, anything else
    /// the production one. `LOG_LEVEL` overrides the preset's level.
    pub fn from_env() -> Self {
        let base = match env::var("LOG_FORMAT").ok().as_deref() {
            Some("pretty") => Self::development(),
            _ => Self::production(),
        };

        match env::var("LOG_LEVEL").ok().as_deref().and_then(LogLevel::parse) {
            Some(level) => base.with_level(level),
            None => base,
        }
    }
}

pub struct LambdaLogger {
    config: Mutex<LoggerConfig>,
    request_id: Mutex<Option<String>>,
}

impl LambdaLogger {
    fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            request_id: Mutex::new(None),
        }
    }

    fn update_config(&self, new_config: LoggerConfig) -> Result<()> {
        let mut config = self
            .config
            .lock()
            .map_err(|e| BedrockError::ConfigError(format!("Logger config poisoned: {}", e)))?;
        *config = new_config;
        Ok(())
    }

    fn format_console_output(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        let mut output = String::new();

        if config.include_timestamp {
            let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
            if config.show_colors {
                output.push_str(&format!("{} ", timestamp.bright_black()));
            } else {
                output.push_str(&format!("{} ", timestamp));
            }
        }

        let level = entry.level.as_str();
        if config.show_colors {
            output.push_str(&format!("[{}] ", level.color(entry.level.color()).bold()));
        } else {
            output.push_str(&format!("[{}] ", level));
        }

        if config.show_module && !entry.module.is_empty() {
            if config.show_colors {
                output.push_str(&format!("{}::", entry.module.bright_blue()));
            } else {
                output.push_str(&format!("{}::", entry.module));
            }
        }

        output.push_str(&entry.message);

        if let Some(request_id) = &entry.request_id {
            if config.show_colors {
                output.push_str(&format!(" [req:{}]", request_id.bright_yellow()));
            } else {
                output.push_str(&format!(" [req:{}]", request_id));
            }
        }

        if let Some(duration) = entry.duration_ms {
            output.push_str(&format!(" [{}ms]", duration));
        }

        if config.show_file_location {
            let location = format!("{}:{}", entry.file, entry.line);
            if config.show_colors {
                output.push_str(&format!(" ({})", location.bright_black()));
            } else {
                output.push_str(&format!(" ({})", location));
            }
        }

        output
    }

    fn create_log_entry(&self, record: &Record) -> LogEntry {
        LogEntry::new(
            LogLevel::from_level(record.level()),
            record.args().to_string(),
            record.module_path().unwrap_or("unknown").to_string(),
            record.file().unwrap_or("unknown").to_string(),
            record.line().unwrap_or(0),
        )
        .with_request_id(self.current_request_id())
    }

    fn current_request_id(&self) -> Option<String> {
        self.request_id.lock().ok().and_then(|id| id.clone())
    }

    /// Writes an already-built entry, bypassing the `log` macros so that
    /// structured fields such as `duration_ms` survive.
    fn emit(&self, entry: &LogEntry) {
        if let Ok(config) = self.config.lock() {
            if entry.level >= config.min_level {
                println!("{}", self.render(entry, &config));
            }
        }
    }

    fn render(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            serde_json::to_string(entry).unwrap_or_default()
        } else {
            self.format_console_output(entry, config)
        }
    }
}

impl log::Log for LambdaLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_level(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.emit(&self.create_log_entry(record));
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Logs how long a scope took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn completion_entry(&self) -> LogEntry {
        LogEntry::new(
            LogLevel::Info,
            format!("Timer '{}' completed", self.name),
            module_path!().to_string(),
            file!().to_string(),
            line!(),
        )
        .with_request_id(LAMBDA_LOGGER.current_request_id())
        .with_duration(self.elapsed())
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if log::log_enabled!(Level::Info) {
            LAMBDA_LOGGER.emit(&self.completion_entry());
        }
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LogEntry {
        LogEntry::new(
            LogLevel::Warn,
            "prompt missing".to_string(),
            "titan_image_lambda::handler".to_string(),
            "src/handler.rs".to_string(),
            42,
        )
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogLevel::from_level(Level::Error), LogLevel::Error);
    }

    #[test]
    fn test_logger_config() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.show_colors);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.show_colors);
        assert!(prod_config.output_json);
    }

    #[test]
    fn test_plain_console_format() {
        let logger = LambdaLogger::new();
        let config = LoggerConfig::new().with_colors(false);
        let line = logger.format_console_output(
            &entry().with_request_id(Some("req-1".to_string())),
            &config,
        );

        assert!(line.contains("[WARN] titan_image_lambda::handler::prompt missing"));
        assert!(line.contains("[req:req-1]"));
        assert!(line.ends_with("(src/handler.rs:42)"));
    }

    #[test]
    fn test_json_format() {
        let logger = LambdaLogger::new();
        let line = logger.render(
            &entry().with_duration(Duration::from_millis(15)),
            &LoggerConfig::production(),
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["level"], "WARN");
        assert_eq!(value["message"], "prompt missing");
        assert_eq!(value["duration_ms"], 15);
        assert!(value.get("request_id").is_none());
    }

    #[test]
    fn test_timer_entry_carries_duration() {
        let timer = timer("bedrock invoke_model");
        std::thread::sleep(Duration::from_millis(5));

        let entry = timer.completion_entry();
        let value: serde_json::Value =
            serde_json::from_str(&LambdaLogger::new().render(&entry, &LoggerConfig::production()))
                .unwrap();

        assert_eq!(value["message"], "Timer 'bedrock invoke_model' completed");
        assert_eq!(value["level"], "INFO");
        assert!(value["duration_ms"].as_u64().unwrap() >= 5);
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("LOG_FORMAT", "pretty");
        env::remove_var("LOG_LEVEL");
        let config = LoggerConfig::from_env();
        assert!(!config.output_json);
        assert!(config.show_colors);
        assert_eq!(config.min_level, LogLevel::Debug);

        env::set_var("LOG_LEVEL", "error");
        assert_eq!(LoggerConfig::from_env().min_level, LogLevel::Error);

        env::set_var("LOG_FORMAT", "json");
        env::set_var("LOG_LEVEL", "verbose");
        let config = LoggerConfig::from_env();
        assert!(config.output_json);
        assert_eq!(config.min_level, LogLevel::Info);

        env::remove_var("LOG_FORMAT");
        env::remove_var("LOG_LEVEL");
    }

    #[test]
    fn test_logger_initialization_is_repeatable() {
        assert!(init_with_config(LoggerConfig::development()).is_ok());
        assert!(init_with_config(LoggerConfig::production()).is_ok());
    }
}
