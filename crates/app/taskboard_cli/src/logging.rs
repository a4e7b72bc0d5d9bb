use tracing_subscriber::EnvFilter;

/// Log to stderr; stdout carries command output only.
pub fn init(verbose: bool) {
    let default = if verbose {
        "info,taskboard_client=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(verbose)
        .init();
}
