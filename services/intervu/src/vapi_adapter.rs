use anyhow::{Context, Result};
use async_trait::async_trait;
use intervu_core::generic_types::{SessionEvent, SessionEventKind, SessionStartConfig};
use intervu_core::voice_session::{ListenerId, ListenerRegistry, SessionHandler, VoiceSession};
use intervu_types::ServerEvent;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use voice_realtime::{ServerRx, Stats, VoiceClient};

/// An adapter that implements the generic `VoiceSession` trait for the
/// `voice_realtime::Client`. It is generic over `VoiceClient` so the socket can
/// be mocked in tests.
pub struct VapiAdapter<C: VoiceClient> {
    client: tokio::sync::Mutex<C>,
    listeners: Arc<ListenerRegistry>,
    pump: JoinHandle<()>,
}

impl VapiAdapter<voice_realtime::Client> {
    pub async fn connect(config: voice_realtime::Config) -> Result<Self> {
        let client = voice_realtime::connect_with_config(1024, config)
            .await
            .context("Failed to connect to the voice API")?;
        Self::with_client(client).await
    }
}

impl<C: VoiceClient> VapiAdapter<C> {
    /// Subscribes to the client's server events and starts forwarding them to
    /// registered listeners.
    pub async fn with_client(mut client: C) -> Result<Self> {
        let server_rx = client
            .server_events()
            .await
            .context("Failed to subscribe to voice server events")?;
        let listeners = Arc::new(ListenerRegistry::new());
        let pump = tokio::spawn(pump_events(server_rx, listeners.clone()));
        Ok(Self {
            client: tokio::sync::Mutex::new(client),
            listeners,
            pump,
        })
    }

    /// Counters for everything received on this connection so far.
    pub async fn stats(&self) -> Result<Stats> {
        self.client.lock().await.stats()
    }
}

#[async_trait]
impl<C: VoiceClient> VoiceSession for VapiAdapter<C> {
    async fn start(&self, config: SessionStartConfig) -> Result<()> {
        self.client
            .lock()
            .await
            .start(config.assistant, config.overrides)
            .await
            .context("Adapter failed to start the call")
    }

    async fn stop(&self) -> Result<()> {
        self.client
            .lock()
            .await
            .stop()
            .await
            .context("Adapter failed to stop the call")
    }

    fn on(&self, kind: SessionEventKind, handler: SessionHandler) -> ListenerId {
        self.listeners.add(kind, handler)
    }

    fn off(&self, kind: SessionEventKind, id: ListenerId) {
        if !self.listeners.remove(kind, id) {
            tracing::debug!("listener {:?} for {} was already removed", id, kind.as_str());
        }
    }
}

impl<C: VoiceClient> Drop for VapiAdapter<C> {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Maps a wire event to the provider-independent session event.
/// A closed socket ends the call.
pub fn to_session_event(event: ServerEvent) -> Option<SessionEvent> {
    let event = match event {
        ServerEvent::CallStart(_) => SessionEvent::CallStart,
        ServerEvent::CallEnd(data) => {
            tracing::debug!("call ended: {:?}", data.ended_reason());
            SessionEvent::CallEnd
        }
        ServerEvent::Close { reason } => {
            tracing::info!("voice connection closed: {:?}", reason);
            SessionEvent::CallEnd
        }
        ServerEvent::SpeechStart => SessionEvent::SpeechStart,
        ServerEvent::SpeechEnd => SessionEvent::SpeechEnd,
        ServerEvent::Message(data) => SessionEvent::Message(data.into_message()),
        ServerEvent::Error(e) => SessionEvent::Error(match e.code() {
            Some(code) => format!("{} ({})", e.message(), code),
            None => e.message().to_string(),
        }),
        ServerEvent::Unknown => return None,
    };
    Some(event)
}

async fn pump_events(mut server_rx: ServerRx, listeners: Arc<ListenerRegistry>) {
    loop {
        match server_rx.recv().await {
            Ok(event) => {
                let closed = matches!(event, ServerEvent::Close { .. });
                if let Some(event) = to_session_event(event) {
                    listeners.emit(&event);
                }
                if closed {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("voice event pump lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
    tracing::debug!("voice event pump stopped");
}
