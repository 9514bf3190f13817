use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directives when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info,sqlx=warn,async_nats=warn";

/// Initialize tracing subscriber with compact human-readable output on stdout.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info` with noisy driver targets lowered to `warn`
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set
/// - Keeps targets so log pipelines can route by crate
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the subscriber from `LOG_FORMAT` (`json` or anything else for compact).
pub fn init_logging_from_env() {
    match std::env::var("LOG_FORMAT") {
        Ok(f) if f.eq_ignore_ascii_case("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}
