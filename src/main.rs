use clap::Parser;
use tracing::{debug, error, info, warn};

use livevod::config::Config;

#[derive(Parser)]
#[command(version)]
struct Args {
    /// Set config file path
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let cfg = Config::parse(args.config);

    livevod::log::init(&cfg.log.level);
    warn!("set log level : {}", cfg.log.level);
    debug!("config : {:?}", cfg);

    let listener = match tokio::net::TcpListener::bind(cfg.http.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("bind {}: {}", cfg.http.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = livevod::serve(cfg, listener, shutdown_signal()).await {
        error!("Application error: {:?}", e);
        std::process::exit(1);
    }
    info!("Server shutdown");
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (Ok(mut terminate), Ok(mut interrupt)) = (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) else {
        error!("failed to install signal handlers");
        return;
    };

    let name = tokio::select! {
        _ = terminate.recv() => "SIGTERM",
        _ = interrupt.recv() => "SIGINT",
    };
    debug!("Received signal: {}", name);
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        debug!("Received signal: CTRL_C");
    }
}
