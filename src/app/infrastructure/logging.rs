use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "SIMPLE_MD_LOG";

/// Install the global stderr subscriber.
///
/// `verbose` forces `debug` for this crate; otherwise the filter comes from
/// `SIMPLE_MD_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("simple_md=debug,warn")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
