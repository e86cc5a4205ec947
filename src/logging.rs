//! Tracing setup for hosts embedding the engine.
//!
//! The engine itself only emits `tracing` events. Hosts that want them on
//! stderr call [`init`] once with an explicit filter directive string.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter: engine state transitions, nothing per-event.
pub const DEFAULT_DIRECTIVES: &str = "spark_page=debug";

/// Install a fmt subscriber filtered by `directives` (e.g. `"spark_page=trace"`).
///
/// Returns `false` if a global subscriber was already installed, which makes
/// repeated calls from tests harmless.
pub fn init(directives: &str) -> bool {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init("spark_page=trace");
        assert!(!init(DEFAULT_DIRECTIVES));
    }
}
