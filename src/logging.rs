/// stderr logger, `info` unless `RUST_LOG` says otherwise. Safe to call twice.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .format_timestamp_secs()
        .try_init();
}
