//! Logging for `jlc` runs.
//!
//! `JLC_LOG` takes `RUST_LOG`-style directives and falls back to `RUST_LOG`
//! itself; nothing is installed when neither is set. `JLC_LOG_FORMAT` picks
//! the layout:
//!
//! - `text` (default): one line per event
//! - `tree`: the pass's phase spans (`collect_lambdas`, `finalize_groups`, ...)
//!   as an indented hierarchy
//! - `json`: one object per event, for tooling
//!
//! ```bash
//! JLC_LOG=debug JLC_LOG_FORMAT=tree jlc program.json
//! JLC_LOG="jlc_lambda::collector=trace" jlc program.json
//! ```
//!
//! Everything is written to stderr; stdout carries `--print` and `--json`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const JLC_LOG: &str = "JLC_LOG";
const JLC_LOG_FORMAT: &str = "JLC_LOG_FORMAT";
const RUST_LOG: &str = "RUST_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Resolved logging settings, separate from installing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingSettings {
    /// Filter directives, e.g. `info,jlc_lambda::collector=trace`.
    pub directives: String,
    pub format: LogFormat,
}

impl TracingSettings {
    /// Settings from the three variables' values; `None` when logging is off.
    ///
    /// A set `JLC_LOG` wins over `RUST_LOG`, even when empty.
    pub fn from_vars(
        jlc_log: Option<&str>,
        rust_log: Option<&str>,
        format: Option<&str>,
    ) -> Option<Self> {
        let directives = jlc_log.or(rust_log)?;
        Some(Self {
            directives: directives.trim().to_string(),
            format: format.map(LogFormat::parse).unwrap_or_default(),
        })
    }

    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok();
        Self::from_vars(
            var(JLC_LOG).as_deref(),
            var(RUST_LOG).as_deref(),
            var(JLC_LOG_FORMAT).as_deref(),
        )
    }

    /// Unparseable directives are skipped rather than rejected.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::builder().parse_lossy(&self.directives)
    }

    /// Install these settings as the global subscriber.
    pub fn install(&self) -> Result<(), TryInitError> {
        let filter = self.filter();
        match self.format {
            LogFormat::Tree => Registry::default()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_indent_lines(true)
                        .with_deferred_spans(true)
                        .with_targets(true),
                )
                .try_init(),
            LogFormat::Json => Registry::default()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
            LogFormat::Text => Registry::default()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init(),
        }
    }
}

/// Install logging from the environment, if requested.
///
/// A subscriber installed earlier (by an embedding program) is left in place.
pub fn init_tracing() {
    if let Some(settings) = TracingSettings::from_env() {
        let _ = settings.install();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Text);
    }

    #[test]
    fn test_logging_is_off_without_directives() {
        assert_eq!(TracingSettings::from_vars(None, None, Some("tree")), None);
    }

    #[test]
    fn test_jlc_log_wins_over_rust_log() {
        let settings = TracingSettings::from_vars(Some(" debug "), Some("trace"), None)
            .expect("logging on");
        assert_eq!(settings.directives, "debug");
        assert_eq!(settings.format, LogFormat::Text);

        let settings =
            TracingSettings::from_vars(Some(""), Some("trace"), None).expect("logging on");
        assert_eq!(settings.directives, "");
    }

    #[test]
    fn test_rust_log_and_format() {
        let settings = TracingSettings::from_vars(None, Some("jlc_lambda=trace"), Some("json"))
            .expect("logging on");
        assert_eq!(settings.directives, "jlc_lambda=trace");
        assert_eq!(settings.format, LogFormat::Json);
    }
}
