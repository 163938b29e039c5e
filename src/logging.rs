use tracing::Level;
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan},
    EnvFilter,
};

/// Filter from `RUST_LOG`, with `log_level` added as the default directive.
/// An unparsable level falls back to `info`.
pub fn env_filter(log_level: &str) -> EnvFilter {
    let directive: Directive = log_level.parse().unwrap_or_else(|_| Level::INFO.into());
    EnvFilter::from_default_env().add_directive(directive)
}

/// Install the global fmt subscriber. Span close events carry load and
/// build timings.
pub fn init(log_level: &str) {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter(log_level))
        .with_span_events(FmtSpan::CLOSE)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_falls_back_to_info() {
        assert!(env_filter("gasdash=loud").to_string().contains("info"));
        assert!(env_filter("debug").to_string().contains("debug"));
    }

    #[test]
    fn init_twice_is_harmless() {
        init("debug");
        init("warn");
    }
}
