use crate::types;
use anyhow::Result;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use types::events::client::{StartEvent, StopEvent};

mod config;
mod consts;
mod stats;
mod utils;

pub use config::{Config, ConfigBuilder};
pub use stats::Stats;

pub type ClientTx = tokio::sync::mpsc::Sender<types::ClientEvent>;
type ServerTx = tokio::sync::broadcast::Sender<types::ServerEvent>;
pub type ServerRx = tokio::sync::broadcast::Receiver<types::ServerEvent>;

/// The operations the call layer needs from a voice connection.
///
/// Implemented by [`Client`]; adapters are generic over it so the socket can
/// be replaced by a mock in tests.
#[async_trait]
pub trait VoiceClient: Send + Sync {
    async fn start(
        &mut self,
        assistant: types::Assistant,
        overrides: types::AssistantOverrides,
    ) -> Result<()>;

    async fn stop(&mut self) -> Result<()>;

    async fn server_events(&mut self) -> Result<ServerRx>;

    fn stats(&self) -> Result<Stats>;
}

// Holds the channel capacity, client/server transmitters, configuration,
// call stats guarded by a Mutex and whether the socket has gone away.
pub struct Client {
    capacity: usize,
    config: Config,
    c_tx: Option<ClientTx>,
    s_tx: Option<ServerTx>,
    stats: Arc<Mutex<Stats>>,
    closed: Arc<AtomicBool>,
}

impl Client {
    fn new(capacity: usize, config: Config) -> Self {
        Self {
            capacity,
            config,
            c_tx: None,
            s_tx: None,
            stats: Arc::new(Mutex::new(Stats::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    async fn connect(&mut self) -> Result<()> {
        if self.c_tx.is_some() {
            return Err(anyhow::anyhow!("already connected"));
        }

        let request = utils::build_request(&self.config)?;
        let (ws_stream, _) = tokio_tungstenite::connect_async(request).await?;
        let (mut write, mut read) = ws_stream.split();

        let (c_tx, mut c_rx) = tokio::sync::mpsc::channel(self.capacity);
        let (s_tx, _) = tokio::sync::broadcast::channel(self.capacity);

        self.c_tx = Some(c_tx.clone());
        self.s_tx = Some(s_tx.clone());

        let closed = self.closed.clone();
        // Writer: serialize queued client events onto the socket.
        tokio::spawn(async move {
            while let Some(event) = c_rx.recv().await {
                match serde_json::to_string(&event) {
                    Ok(text) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            tracing::error!("failed to send message: {}", e);
                            closed.store(true, Ordering::SeqCst);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("failed to serialize event: {}", e);
                    }
                }
            }
        });

        let stats = self.stats.clone();
        let closed = self.closed.clone();
        // Reader: parse text frames into server events and broadcast them.
        // A close frame or a read error ends the call from our side.
        tokio::spawn(async move {
            while let Some(message) = read.next().await {
                let message = match message {
                    Err(e) => {
                        tracing::error!("failed to read message: {}", e);
                        closed.store(true, Ordering::SeqCst);
                        let close_event = types::ServerEvent::Close {
                            reason: Some(e.to_string()),
                        };
                        if let Err(e) = s_tx.send(close_event) {
                            tracing::debug!("no subscribers for close event: {}", e);
                        }
                        break;
                    }
                    Ok(message) => message,
                };
                match message {
                    Message::Text(text) => match serde_json::from_str::<types::ServerEvent>(&text) {
                        Ok(event) => {
                            tracing::debug!("received event: {}", event.name());
                            match stats.lock() {
                                Ok(mut stats_guard) => stats_guard.record(&event),
                                Err(_) => tracing::error!("failed to update stats"),
                            }
                            if matches!(event, types::ServerEvent::Unknown) {
                                tracing::debug!("ignoring unhandled event: {:?}", text);
                                continue;
                            }
                            if let Err(e) = s_tx.send(event) {
                                tracing::error!("failed to send event: {}", e);
                            }
                        }
                        Err(e) => {
                            tracing::error!("failed to deserialize event: {}, text=> {:?}", e, text);
                        }
                    },
                    Message::Binary(bin) => {
                        tracing::warn!("unexpected binary message: {} bytes", bin.len());
                    }
                    Message::Close(reason) => {
                        tracing::info!("connection closed: {:?}", reason);
                        closed.store(true, Ordering::SeqCst);
                        let close_event = types::ServerEvent::Close {
                            reason: reason.map(|v| format!("{:?}", v)),
                        };
                        if let Err(e) = s_tx.send(close_event) {
                            tracing::error!("failed to send close event: {}", e);
                        }
                        break;
                    }
                    _ => {}
                }
            }
            closed.store(true, Ordering::SeqCst);
            drop(c_tx);
            drop(s_tx);
        });
        Ok(())
    }

    /// Whether the socket was closed by either side or failed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> Result<Stats> {
        if let Ok(stats_guard) = self.stats.lock() {
            Ok(stats_guard.clone())
        } else {
            Err(anyhow::anyhow!("failed to get stats"))
        }
    }

    async fn send_client_event(&mut self, event: types::ClientEvent) -> Result<()> {
        if self.is_closed() {
            return Err(anyhow::anyhow!("connection closed"));
        }
        match self.c_tx {
            Some(ref tx) => {
                tx.send(event).await?;
                Ok(())
            }
            None => Err(anyhow::anyhow!("not connected yet")),
        }
    }
}

#[async_trait]
impl VoiceClient for Client {
    async fn start(
        &mut self,
        assistant: types::Assistant,
        overrides: types::AssistantOverrides,
    ) -> Result<()> {
        let event = types::ClientEvent::Start(StartEvent::new(assistant).with_overrides(overrides));
        self.send_client_event(event).await
    }

    async fn stop(&mut self) -> Result<()> {
        self.send_client_event(types::ClientEvent::Stop(StopEvent::new()))
            .await
    }

    async fn server_events(&mut self) -> Result<ServerRx> {
        match self.s_tx {
            Some(ref tx) => Ok(tx.subscribe()),
            None => Err(anyhow::anyhow!("not connected yet")),
        }
    }

    fn stats(&self) -> Result<Stats> {
        Client::stats(self)
    }
}

pub async fn connect_with_config(capacity: usize, config: Config) -> Result<Client> {
    let mut client = Client::new(capacity, config);
    client.connect().await?;
    Ok(client)
}

pub async fn connect() -> Result<Client> {
    connect_with_config(1024, Config::new()).await
}
