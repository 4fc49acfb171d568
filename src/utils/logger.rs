use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "golf_team_builder";

// RUST_LOG 優先；否則只調整本 crate 的等級
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = match level {
            "debug" | "trace" => format!("{}={},info", CRATE_TARGET, level),
            _ => format!("{}={}", CRATE_TARGET, level),
        };
        EnvFilter::new(directive)
    })
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(if verbose { "debug" } else { "info" }, false);
}

/// Installs the global subscriber. With `json` every event is one JSON line on
/// stderr, so stdout stays free for the run summary.
pub fn init_logger(level: &str, json: bool) {
    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(env_filter(level));
    if json {
        registry.with(layer.with_writer(std::io::stderr).json()).init();
    } else {
        registry.with(layer.compact()).init();
    }
}
