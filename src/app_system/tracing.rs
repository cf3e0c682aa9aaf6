/// Configure tracing once at application startup.
///
/// Verbosity comes from `RUST_LOG` and defaults to `info`:
/// ```bash
/// RUST_LOG=debug storefront
/// RUST_LOG=storefront::catalog_actor=debug,storefront::favorites=warn storefront
/// ```
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
