//! Injected console logger.
//!
//! Components receive a `&Logger` instead of reaching for ambient console
//! state. Messages are forwarded to `tracing` for structured capture and, when
//! not suppressed, printed for the person running the tool. Warnings and
//! errors are never suppressed.

use testkit::config::EnvironmentConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct Logger {
    quiet: bool,
    verbose: bool,
}

impl Logger {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }

    /// Default instance honoring the environment's quiet flag.
    pub fn from_env() -> Self {
        Self::for_config(&EnvironmentConfig::from_env())
    }

    pub fn for_config(config: &EnvironmentConfig) -> Self {
        Self {
            quiet: config.quiet,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => {
                tracing::debug!("{message}");
                if self.verbose && !self.quiet {
                    println!("   {message}");
                }
            }
            LogLevel::Info => {
                tracing::info!("{message}");
                if !self.quiet {
                    println!("   {message}");
                }
            }
            LogLevel::Success => {
                tracing::info!("{message}");
                if !self.quiet {
                    println!("✅ {message}");
                }
            }
            LogLevel::Warn => {
                tracing::warn!("{message}");
                eprintln!("⚠️  {message}");
            }
            LogLevel::Error => {
                tracing::error!("{message}");
                eprintln!("❌ {message}");
            }
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Success, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logger_is_not_quiet() {
        let logger = Logger::default();
        assert!(!logger.quiet);
        assert!(!logger.verbose);
    }

    #[test]
    fn test_logger_for_quiet_config() {
        let config = EnvironmentConfig::default().with_quiet(true);
        let logger = Logger::for_config(&config);
        assert!(logger.quiet);
    }

    #[test]
    fn test_with_verbose() {
        let logger = Logger::default().with_verbose(true);
        assert!(logger.verbose);
    }
}
