// Reefboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Create mpsc channels and the shutdown signal
// 4. Spawn the live feed task
// 5. Spawn the app orchestrator task
// 6. Run the TUI (blocking until user quits)
// 7. Cleanup on exit

use std::sync::Arc;

use reefboard::app;
use reefboard::config;
use reefboard::feed;
use reefboard::fetch::HttpSnapshotSource;
use reefboard::tui;

use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Reefboard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: event={}, backend={}, live feed {}",
        config.event_name,
        config.http_url,
        if config.ws_url.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    // 3. Create channels and the shutdown signal
    let (feed_tx, feed_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // 4. Spawn the live feed task
    let ws_url = config.ws_url.clone();
    let feed_handle = tokio::spawn(feed::run(
        ws_url,
        config.max_backoff_ms,
        feed_tx,
        shutdown_rx,
    ));

    // 5. Spawn the app orchestrator task
    let source = Arc::new(HttpSnapshotSource::new(
        &config.http_url,
        config.bearer_token.clone(),
    ));
    let app_state = app::AppState::new(source, ui_tx);
    let poll_interval = std::time::Duration::from_secs(config.poll_interval_secs);
    let app_handle = tokio::spawn(app_state.run(feed_rx, cmd_rx, poll_interval));

    // 6. Run the TUI event loop (blocking until user quits)
    info!("Dashboard ready");
    if let Err(e) = tui::run(ui_rx, cmd_tx, config.event_name, config.deadline).await {
        error!("TUI error: {e}");
    }

    // 7. Cleanup: stop the feed, then wait for the orchestrator (with timeout)
    let _ = shutdown_tx.send(true);
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;
    feed_handle.abort();

    info!("Reefboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by
/// the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("reefboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reefboard=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
