//! Logging setup
//!
//! Logs go to stderr so report output on stdout stays clean. `RUST_LOG`
//! overrides the verbosity flags.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,pdump=info,pdump_cli=info",
        2 => "warn,pdump=debug,pdump_cli=debug",
        _ => "warn,pdump=trace,pdump_cli=trace",
    }
}

pub fn init(verbosity: u8) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbosity).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0), "warn");
        assert!(default_filter(1).contains("pdump=info"));
        assert!(default_filter(2).contains("pdump=debug"));
        assert!(default_filter(9).contains("pdump=trace"));
    }
}
