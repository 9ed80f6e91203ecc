//! Logging infrastructure for DocQuery.
//!
//! Initializes the tracing subscriber for structured logging. Logs go to
//! stderr so that answers printed on stdout stay machine-readable.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "docquery_knowledge=trace")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use docquery_core::logging::init_logging;
///
/// init_logging(None, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let env_filter = build_filter(log_level)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Resolve the filter from the explicit level, `RUST_LOG`, or `info`.
fn build_filter(log_level: Option<&str>) -> AppResult<EnvFilter> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", filter_str, e)))
}

fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter(Some("debug")).is_ok());
        assert!(build_filter(Some("docquery_knowledge=trace,warn")).is_ok());
    }

    #[test]
    fn test_init_logging() {
        // Only one subscriber per process; a second init reports an error
        let _ = init_logging(Some("warn"), true);
        assert!(matches!(
            init_logging(Some("warn"), true),
            Err(AppError::Config(_))
        ));
    }
}
