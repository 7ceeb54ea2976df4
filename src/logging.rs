/// Initializes the global `tracing` subscriber from `RUST_LOG`, falling back
/// to `info` level for this crate and `warn` for everything else.
pub fn init() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,strand_align=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}
