use clap::Parser;
use groupkeeper::{
    app::Application,
    config::AppConfig,
    telemetry::{build_telemetry, default_filter, register_telemetry},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config setup
    dotenvy::dotenv().ok();

    let app_config = AppConfig::parse();

    // Setup telemetry
    let telemetry = build_telemetry(
        app_config.stage,
        env!("CARGO_CRATE_NAME").into(),
        default_filter(),
        std::io::stdout,
    );
    register_telemetry(telemetry);

    let app = Application::build(app_config).await?;

    // Run on tokio multi-thread
    let (close_tx, close_rx) = tokio::sync::oneshot::channel();
    let bot_handle = tokio::spawn(async move { app.run_gracefully(close_rx).await });

    let signal = shutdown_signal().await;
    tracing::info!(signal, "shutting down");

    // Send shutdown signal to the dispatcher
    _ = close_tx.send(());

    // Wait for in-flight updates to finish
    _ = bot_handle.await;

    Ok(())
}

/// Resolves with the name of the first termination signal received.
async fn shutdown_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    {
        _ = tokio::signal::ctrl_c().await;
        "ctrl-c"
    }
}
