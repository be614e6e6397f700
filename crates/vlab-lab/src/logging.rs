#![forbid(unsafe_code)]

//! Tracing subscriber setup for the terminal host.
//!
//! Logs go to stderr so they never interleave with the page printed on
//! stdout. `RUST_LOG` wins over the configured level.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` if set and valid, else `fallback`, else `info`.
#[must_use]
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.level))
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    if installed {
        tracing::debug!(target: "vlab.lab", level = %config.level, json = config.json, "tracing ready");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_fallback_degrades_to_info() {
        let filter = env_filter("this is [not a filter");
        assert!(!filter.to_string().is_empty());
    }
}
