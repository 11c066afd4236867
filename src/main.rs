use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use riskboard::adapter::inbound::cli::command::{Cli, ColorChoice};
use riskboard::adapter::inbound::cli::{self, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    if let Err(e) = cli::execute(cli.command, shutdown_rx).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Resolves on Ctrl-C, or on SIGTERM where available (`docker stop`).
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{signal as unix_signal, SignalKind};
        match unix_signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(e) => tracing::warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    }
    if signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
