use clap::ValueEnum;
use std::io::IsTerminal;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    /// Whether colors should be emitted on standard output
    #[must_use]
    pub fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Shape of the per-repository results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Ndjson,

    /// Aligned table for the terminal
    Console,
}

/// Initialize the logger; `RUST_LOG` takes precedence over `log_level`.
pub fn init_logging(log_level: LogLevel) {
    let Some(level) = default_filter(log_level, std::env::var_os("RUST_LOG").is_some()) else {
        return;
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a second initialization (e.g., from tests) is harmless
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Filter used when `RUST_LOG` is unset, or `None` when no logger is needed at all.
const fn default_filter(log_level: LogLevel, rust_log_set: bool) -> Option<&'static str> {
    match log_level {
        LogLevel::None if rust_log_set => Some("off"),
        LogLevel::None => None,
        LogLevel::Error => Some("error"),
        LogLevel::Warn => Some("warn"),
        LogLevel::Info => Some("info"),
        LogLevel::Debug => Some("debug"),
        LogLevel::Trace => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_color_modes() {
        assert!(ColorMode::Always.use_colors());
        assert!(!ColorMode::Never.use_colors());
    }

    #[test]
    fn test_rust_log_still_applies_without_log_level() {
        assert_eq!(default_filter(LogLevel::None, false), None);
        assert_eq!(default_filter(LogLevel::None, true), Some("off"));
        assert_eq!(default_filter(LogLevel::Debug, false), Some("debug"));
        assert_eq!(default_filter(LogLevel::Warn, true), Some("warn"));
    }

    #[test]
    fn test_init_logging_twice_is_fine() {
        init_logging(LogLevel::Warn);
        init_logging(LogLevel::Debug);
        init_logging(LogLevel::None);
    }
}
