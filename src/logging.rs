use env_logger::Env;

/// Initialize env_logger with an `info` default; `RUST_LOG` overrides.
/// Safe to call more than once (later calls are no-ops), so tests can use it
/// freely.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();
}
