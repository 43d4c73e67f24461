//! Tracing subscriber setup

use skyline_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Filter directive used when RUST_LOG is unset
fn default_directive(config: &LoggingConfig, verbose: bool) -> String {
    let level = if verbose {
        "debug"
    } else if config.is_valid_level() {
        config.level.as_str()
    } else {
        "warn"
    };
    format!("warn,skyline_core={level},skyline={level}")
}

/// Install the global subscriber; logs go to stderr so stdout stays parseable
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config, verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        let config = LoggingConfig::default();
        assert_eq!(
            default_directive(&config, false),
            "warn,skyline_core=warn,skyline=warn"
        );
        assert_eq!(
            default_directive(&config, true),
            "warn,skyline_core=debug,skyline=debug"
        );

        let bogus = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(
            default_directive(&bogus, false),
            "warn,skyline_core=warn,skyline=warn"
        );
    }
}
