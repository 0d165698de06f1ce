use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn setup_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime());

    if config.log_json {
        builder
            .json()
            .with_current_span(true)
            .with_target(true)
            .init();
    } else {
        builder.compact().init();
    }
}
