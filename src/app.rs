// Application orchestrator: owns the authoritative scoreboard state and the
// central event loop wiring the live feed, the REST fetcher, and the TUI
// together.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::feed::FeedEvent;
use crate::fetch::{FetchError, SnapshotSource};
use crate::scoreboard::{self, Scoreboard};
use crate::wire::{Aggregate, ApiTeam};

/// Health of the live channel, as shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// WebSocket connected; updates are pushed in real time.
    Live,
    /// Live channel down; running on REST polling until it recovers.
    Degraded,
    /// No live endpoint configured; REST polling is the only source.
    Unconfigured,
}

/// State pushed from the orchestrator to the TUI, on change only.
#[derive(Debug, PartialEq)]
pub enum UiUpdate {
    Scoreboard(Box<Scoreboard>),
    LinkStatus(LinkStatus),
    Banner(Option<String>),
}

/// Commands from the TUI back to the orchestrator.
#[derive(Debug, PartialEq)]
pub enum UserCommand {
    Quit,
    Refresh,
}

struct FetchResult {
    /// Value of the update sequence when the fetch was started.
    seq: u64,
    result: Result<(Vec<ApiTeam>, Option<Aggregate>), FetchError>,
}

pub struct AppState<S> {
    source: Arc<S>,
    /// Last known good view-model. Never cleared, only replaced.
    scoreboard: Scoreboard,
    link_status: LinkStatus,
    banner: Option<String>,
    /// Bumped on every applied snapshot. A fetch started at sequence N is
    /// discarded unless the sequence is still N when it completes, so a slow
    /// REST response never clobbers fresher live data.
    seq: u64,
    ui_tx: mpsc::Sender<UiUpdate>,
    fetch_tx: mpsc::Sender<FetchResult>,
    fetch_rx: mpsc::Receiver<FetchResult>,
}

impl<S: SnapshotSource + 'static> AppState<S> {
    pub fn new(source: Arc<S>, ui_tx: mpsc::Sender<UiUpdate>) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel(8);
        Self {
            source,
            scoreboard: Scoreboard::default(),
            link_status: LinkStatus::Degraded,
            banner: None,
            seq: 0,
            ui_tx,
            fetch_tx,
            fetch_rx,
        }
    }

    /// Run the central event loop until the TUI asks to quit or every input
    /// channel closes.
    pub async fn run(
        mut self,
        mut feed_rx: mpsc::Receiver<FeedEvent>,
        mut cmd_rx: mpsc::Receiver<UserCommand>,
        poll_interval: std::time::Duration,
    ) {
        let mut poll = tokio::time::interval(poll_interval);
        let mut feed_open = true;

        loop {
            tokio::select! {
                event = feed_rx.recv(), if feed_open => {
                    match event {
                        Some(event) => self.on_feed_event(event).await,
                        None => {
                            // Feed task ended (Unconfigured or shutdown);
                            // keep running on the poll timer alone.
                            feed_open = false;
                        }
                    }
                }
                Some(result) = self.fetch_rx.recv() => {
                    self.on_fetch_result(result).await;
                }
                command = cmd_rx.recv() => {
                    match command {
                        Some(UserCommand::Refresh) => {
                            info!("Manual refresh requested");
                            self.spawn_fetch();
                        }
                        Some(UserCommand::Quit) | None => break,
                    }
                }
                _ = poll.tick() => {
                    // The first tick fires immediately and doubles as the
                    // startup fetch.
                    self.spawn_fetch();
                }
            }
        }

        info!("Orchestrator shutting down");
    }

    async fn on_feed_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Connected => {
                info!("Live feed connected");
                self.set_link_status(LinkStatus::Live).await;
                self.set_banner(None).await;
            }
            FeedEvent::Snapshot { teams, aggregate } => {
                self.apply_snapshot(teams, aggregate).await;
            }
            FeedEvent::RefreshRequested => {
                debug!("Backend requested a scoreboard refetch");
                self.spawn_fetch();
            }
            FeedEvent::Disconnected { code, reason } => {
                warn!("Live feed lost (code {code:?}, reason {reason:?})");
                self.set_link_status(LinkStatus::Degraded).await;
                let detail = reason.unwrap_or_else(|| "connection lost".to_string());
                self.set_banner(Some(format!("Live feed down: {detail} (retrying)")))
                    .await;
            }
            FeedEvent::Unconfigured => {
                self.set_link_status(LinkStatus::Unconfigured).await;
                self.set_banner(Some(
                    "No live feed configured; updating by polling only".to_string(),
                ))
                .await;
            }
        }
    }

    async fn on_fetch_result(&mut self, result: FetchResult) {
        if result.seq != self.seq {
            debug!("Discarding stale snapshot fetch");
            return;
        }
        match result.result {
            Ok((teams, aggregate)) => {
                self.apply_snapshot(teams, aggregate).await;
            }
            Err(FetchError::Unauthorized) => {
                warn!("Snapshot fetch rejected: not authenticated");
                self.set_banner(Some(
                    "Not authenticated with the scoreboard backend".to_string(),
                ))
                .await;
            }
            Err(e) => {
                warn!("Snapshot fetch failed: {e}");
                self.set_banner(Some(format!("Snapshot fetch failed: {e}")))
                    .await;
            }
        }
    }

    /// Start a background snapshot fetch stamped with the current sequence.
    fn spawn_fetch(&self) {
        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();
        let seq = self.seq;
        tokio::spawn(async move {
            let result = source.fetch_snapshot().await;
            let _ = tx.send(FetchResult { seq, result }).await;
        });
    }

    async fn apply_snapshot(&mut self, teams: Vec<ApiTeam>, aggregate: Option<Aggregate>) {
        self.seq += 1;
        let board = scoreboard::reconcile(teams, aggregate);
        if board != self.scoreboard {
            self.scoreboard = board.clone();
            let _ = self.ui_tx.send(UiUpdate::Scoreboard(Box::new(board))).await;
        }
    }

    async fn set_link_status(&mut self, status: LinkStatus) {
        if status != self.link_status {
            self.link_status = status;
            let _ = self.ui_tx.send(UiUpdate::LinkStatus(status)).await;
        }
    }

    async fn set_banner(&mut self, banner: Option<String>) {
        if banner != self.banner {
            self.banner = banner.clone();
            let _ = self.ui_tx.send(UiUpdate::Banner(banner)).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
