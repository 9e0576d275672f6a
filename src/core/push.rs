use crate::events::{
    app_event::{AppEvent, ConnectionStatus},
    push_event::{OutboundSignal, PushEvent},
};
use eyre::eyre;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

/// Cloneable sender for outbound push signals. Signals raised while the
/// connection is down are discarded when it comes back; the reducer re-sends
/// what a fresh connection needs.
#[derive(Clone, Debug)]
pub struct PushHandle {
    tx: mpsc::UnboundedSender<OutboundSignal>,
}

impl PushHandle {
    pub fn send(&self, signal: OutboundSignal) {
        if self.tx.send(signal).is_err() {
            tracing::error!("Push client is gone, dropping outbound signal");
        }
    }
}

enum SessionEnd {
    /// The socket went away; reconnect.
    Lost,
    /// The app is shutting down.
    Shutdown,
}

pub struct PushClient {
    url: String,
    reconnect_delay: Duration,
    event_tx: mpsc::Sender<AppEvent>,
    signals: mpsc::UnboundedReceiver<OutboundSignal>,
}

impl PushClient {
    pub fn new(
        url: String,
        reconnect_delay: Duration,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> (Self, PushHandle) {
        let (tx, signals) = mpsc::unbounded_channel();
        let client = Self {
            url,
            reconnect_delay,
            event_tx,
            signals,
        };
        (client, PushHandle { tx })
    }

    async fn report(&self, status: ConnectionStatus) -> bool {
        self.event_tx.send(AppEvent::PushStatus(status)).await.is_ok()
    }

    /// Keeps a connection open until the app shuts down, reconnecting after
    /// `reconnect_delay` whenever it drops.
    pub async fn run(mut self) {
        loop {
            if !self.report(ConnectionStatus::Connecting).await {
                return;
            }
            tracing::info!("Connecting to push channel at {}", self.url);

            let end = match self.session().await {
                Ok(end) => end,
                Err(e) => {
                    tracing::error!("Push channel error: {:#}", e);
                    SessionEnd::Lost
                }
            };
            if let SessionEnd::Shutdown = end {
                tracing::info!("Push client shutting down");
                return;
            }

            if !self.report(ConnectionStatus::Disconnected).await {
                return;
            }
            tracing::warn!(
                "Push channel lost, reconnecting in {}s",
                self.reconnect_delay.as_secs()
            );
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    fn discard_queued(&mut self) -> usize {
        let mut discarded = 0;
        while self.signals.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }

    async fn session(&mut self) -> Result<SessionEnd, eyre::Report> {
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        tracing::info!("WebSocket handshake has been successfully completed");
        let stale = self.discard_queued();
        if stale > 0 {
            tracing::debug!("Discarded {} signal(s) queued while disconnected", stale);
        }
        if !self.report(ConnectionStatus::Connected).await {
            return Ok(SessionEnd::Shutdown);
        }
        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => {
                    let Some(msg) = msg else {
                        return Ok(SessionEnd::Lost);
                    };
                    match msg? {
                        WsMessage::Text(text) => {
                            if let Some(event) = decode_frame(&text) {
                                if self.event_tx.send(AppEvent::Push(event)).await.is_err() {
                                    return Ok(SessionEnd::Shutdown);
                                }
                            }
                        }
                        WsMessage::Close(frame) => {
                            tracing::info!("Websocket closed: {:?}", frame);
                            return Ok(SessionEnd::Lost);
                        }
                        _ => {}
                    }
                }
                signal = self.signals.recv() => {
                    let Some(signal) = signal else {
                        return Ok(SessionEnd::Shutdown);
                    };
                    let json = serde_json::to_string(&signal)
                        .map_err(|e| eyre!("Failed to encode {:?}: {}", signal, e))?;
                    tracing::debug!("Sending push signal {}", json);
                    write.send(WsMessage::Text(json.into())).await?;
                }
            }
        }
    }
}

fn decode_frame(text: &str) -> Option<PushEvent> {
    match PushEvent::decode(text) {
        Ok(Some(PushEvent::ServerGreeting(greeting))) => {
            tracing::info!("Push server says: {}", greeting);
            None
        }
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Skipping malformed push frame: {}", e);
            None
        }
    }
}
