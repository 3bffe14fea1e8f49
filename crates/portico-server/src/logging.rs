//! Logging configuration and initialization.
//!
//! Structured logging with preset levels, per-target overrides via CLI
//! flags, JSON output for log aggregation, and RUST_LOG fallback.

use std::collections::HashMap;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Production: only important events.
    #[default]
    Production,
    /// Debug: detailed info for troubleshooting.
    Debug,
    /// Quiet: warnings and errors only.
    Quiet,
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Per-target level overrides (e.g., "archive" -> DEBUG).
    pub overrides: HashMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Create a new LogConfig from CLI arguments.
    pub fn from_cli(debug: bool, quiet: bool, log_overrides: Vec<String>, format: LogFormat) -> Self {
        let preset = if quiet {
            LogPreset::Quiet
        } else if debug {
            LogPreset::Debug
        } else {
            LogPreset::Production
        };

        // Overrides come as "target=level", comma-separable. Targets are
        // prefixed with "portico::" unless already qualified.
        let mut overrides = HashMap::new();
        for override_str in log_overrides {
            for part in override_str.split(',') {
                if let Some((target, level_str)) = part.split_once('=') {
                    let target = target.trim();
                    let full_target = if target.starts_with("portico::") || target == "tower_http" {
                        target.to_string()
                    } else {
                        format!("portico::{}", target)
                    };

                    if let Ok(level) = parse_level(level_str.trim()) {
                        overrides.insert(full_target, level);
                    }
                }
            }
        }

        Self {
            preset,
            overrides,
            format,
        }
    }

    /// Build an EnvFilter from this configuration.
    pub fn build_filter(&self) -> EnvFilter {
        // RUST_LOG wins over everything else.
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }

        let mut directives: Vec<String> = match self.preset {
            LogPreset::Production => vec![
                "portico::startup=info".into(),
                "portico::api=info".into(),
                "portico::archive=info".into(),
                "portico::keys=info".into(),
                "portico::ai=info".into(),
                "portico::activity=warn".into(),
                "tower_http=warn".into(),
            ],
            LogPreset::Debug => vec!["portico=debug".into(), "tower_http=debug".into()],
            LogPreset::Quiet => vec!["portico=warn".into(), "tower_http=error".into()],
        };

        for (target, level) in &self.overrides {
            directives.push(format!("{}={}", target, level_to_str(*level)));
        }

        let filter_str = directives.join(",");
        EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn parse_level(s: &str) -> Result<Level, ()> {
    match s.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(()),
    }
}

fn level_to_str(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("invalid".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_preset_priority() {
        // Quiet wins over debug.
        let config = LogConfig::from_cli(true, true, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Quiet);

        let config = LogConfig::from_cli(true, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Debug);

        let config = LogConfig::from_cli(false, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Production);
    }

    #[test]
    fn test_override_parsing() {
        let config = LogConfig::from_cli(
            false,
            false,
            vec!["archive=debug".into(), "ai=trace,tower_http=info".into()],
            LogFormat::Text,
        );

        assert_eq!(config.overrides.get("portico::archive"), Some(&Level::DEBUG));
        assert_eq!(config.overrides.get("portico::ai"), Some(&Level::TRACE));
        assert_eq!(config.overrides.get("tower_http"), Some(&Level::INFO));
    }
}
