use tracing_subscriber::EnvFilter;

/// Our crates log at `level`, everything else at warn.
/// `RUST_LOG` replaces the whole filter when it is set.
pub fn init(level: &str) {
    let directives = format!(
        "warn,livevod={level},storage={level},http_log={level},tower_http={level}"
    );
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(directives)))
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .init();
}
