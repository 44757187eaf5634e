// WebSocket live-feed client: connect, pump frames, reconnect with
// exponential backoff. The reconnect loop owns the only retry timer, so at
// most one reconnect attempt is ever pending.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

use crate::wire::{self, Aggregate, ApiTeam, Frame};

const BASE_DELAY_MS: u64 = 1_000;

/// Default reconnect backoff ceiling, overridable via `feed.max_backoff_ms`.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;

/// Events emitted by the feed task to the orchestrator.
#[derive(Debug, PartialEq)]
pub enum FeedEvent {
    /// The WebSocket connection is open.
    Connected,
    /// A full scoreboard snapshot arrived over the live channel.
    Snapshot {
        teams: Vec<ApiTeam>,
        aggregate: Option<Aggregate>,
    },
    /// The backend asked us to refetch the scoreboard via REST.
    RefreshRequested,
    /// The connection was lost; the feed will retry on its own.
    Disconnected {
        code: Option<u16>,
        reason: Option<String>,
    },
    /// No feed endpoint is configured; the feed task has stopped for good.
    Unconfigured,
}

/// Reconnect delay for the given attempt number: 1s, 2s, 4s, ... capped at
/// `max_ms`. The attempt counter resets only when a connection actually
/// opens.
pub fn backoff_delay(attempt: u32, max_ms: u64) -> Duration {
    let exp = 1u64 << attempt.min(15);
    Duration::from_millis((BASE_DELAY_MS * exp).min(max_ms.max(BASE_DELAY_MS)))
}

/// Why a frame pump stopped reading.
#[derive(Debug, PartialEq)]
pub enum ReadOutcome {
    /// The peer closed or the transport failed; carries close details when
    /// the peer sent them.
    Lost {
        code: Option<u16>,
        reason: Option<String>,
    },
    /// The stream ended without an explicit close.
    Finished,
}

/// Abstraction over the connect step so the reconnect loop can be driven by
/// a scripted connector in tests.
#[async_trait]
pub trait FeedConnector: Send + Sync {
    type Read: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + Unpin
        + Send;

    async fn connect(&self) -> anyhow::Result<Self::Read>;
}

/// Production connector: a real WebSocket handshake against the configured
/// endpoint.
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

#[async_trait]
impl FeedConnector for WsConnector {
    type Read = futures_util::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

    async fn connect(&self) -> anyhow::Result<Self::Read> {
        let (ws_stream, _response) = tokio_tungstenite::connect_async(self.url.as_str()).await?;
        let (_write, read) = ws_stream.split();
        Ok(read)
    }
}

/// Run the feed task. When no endpoint is configured this emits
/// [`FeedEvent::Unconfigured`] once and returns; there is nothing to retry.
pub async fn run(
    ws_url: Option<String>,
    max_backoff_ms: u64,
    tx: mpsc::Sender<FeedEvent>,
    shutdown: watch::Receiver<bool>,
) {
    match ws_url.filter(|u| !u.trim().is_empty()) {
        Some(url) => {
            info!("Live feed connecting to {url}");
            run_with_connector(WsConnector::new(url), max_backoff_ms, tx, shutdown).await;
        }
        None => {
            warn!("No live feed endpoint configured; REST polling only");
            let _ = tx.send(FeedEvent::Unconfigured).await;
        }
    }
}

/// The reconnect loop: connect, pump until the connection drops, back off,
/// repeat. Returns when shutdown is signalled or the event channel closes.
pub async fn run_with_connector<C>(
    connector: C,
    max_backoff_ms: u64,
    tx: mpsc::Sender<FeedEvent>,
    mut shutdown: watch::Receiver<bool>,
) where
    C: FeedConnector,
{
    let mut attempt: u32 = 0;

    loop {
        let read = tokio::select! {
            result = connector.connect() => result,
            _ = shutdown.changed() => return,
        };

        match read {
            Ok(stream) => {
                attempt = 0;
                if tx.send(FeedEvent::Connected).await.is_err() {
                    return;
                }

                let outcome = tokio::select! {
                    outcome = pump_frames(stream, &tx) => match outcome {
                        Ok(o) => o,
                        Err(()) => return,
                    },
                    _ = shutdown.changed() => return,
                };

                let (code, reason) = match outcome {
                    ReadOutcome::Lost { code, reason } => (code, reason),
                    ReadOutcome::Finished => (None, None),
                };
                if tx
                    .send(FeedEvent::Disconnected { code, reason })
                    .await
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => {
                warn!("Live feed connect failed: {e}");
                if tx
                    .send(FeedEvent::Disconnected {
                        code: None,
                        reason: Some(e.to_string()),
                    })
                    .await
                    .is_err()
                {
                    return;
                }
            }
        }

        let delay = backoff_delay(attempt, max_backoff_ms);
        attempt += 1;
        info!("Reconnecting in {}ms (attempt {attempt})", delay.as_millis());
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => return,
        }
    }
}

/// Read frames from an open connection, classify them, and forward feed
/// events. Generic over the stream type so it can be tested with in-memory
/// frame scripts. Returns `Err(())` if the event channel is closed.
///
/// Malformed frames are logged and dropped; they never end the read loop.
pub async fn pump_frames<St>(
    mut stream: St,
    tx: &mpsc::Sender<FeedEvent>,
) -> Result<ReadOutcome, ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let event = match wire::classify_frame(text.as_str()) {
                    Frame::Refresh => FeedEvent::RefreshRequested,
                    Frame::Snapshot { teams, aggregate } => {
                        FeedEvent::Snapshot { teams, aggregate }
                    }
                    Frame::Ignored => {
                        warn!("Dropping unrecognized feed frame ({} bytes)", text.len());
                        continue;
                    }
                };
                if tx.send(event).await.is_err() {
                    return Err(());
                }
            }
            Ok(Message::Close(frame)) => {
                let (code, reason) = match frame {
                    Some(f) => (
                        Some(u16::from(f.code)),
                        Some(f.reason.to_string()).filter(|r| !r.is_empty()),
                    ),
                    None => (None, None),
                };
                info!("Feed closed by server (code {code:?})");
                return Ok(ReadOutcome::Lost { code, reason });
            }
            Err(e) => {
                warn!("Feed read error: {e}");
                return Ok(ReadOutcome::Lost {
                    code: None,
                    reason: Some(e.to_string()),
                });
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }
    Ok(ReadOutcome::Finished)
}
