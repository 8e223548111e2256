use crate::generic_types::{SessionEvent, SessionEventKind, SessionStartConfig};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// A callback registered for one kind of session event.
pub type SessionHandler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Handle returned by [`VoiceSession::on`], used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A voice call provider shared by the whole process.
///
/// Implementations emit [`SessionEvent`]s to the handlers registered with
/// `on` until they are removed with `off`. Controllers never hold on to
/// handlers directly; they go through a [`ListenerScope`].
#[async_trait]
pub trait VoiceSession: Send + Sync {
    async fn start(&self, config: SessionStartConfig) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    fn on(&self, kind: SessionEventKind, handler: SessionHandler) -> ListenerId;

    fn off(&self, kind: SessionEventKind, id: ListenerId);
}

/// Listener bookkeeping for [`VoiceSession`] implementations.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<SessionEventKind, Vec<(ListenerId, SessionHandler)>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, kind: SessionEventKind, handler: SessionHandler) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push((id, handler));
        id
    }

    /// Returns whether a listener was actually removed.
    pub fn remove(&self, kind: SessionEventKind, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(handlers) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        before != handlers.len()
    }

    /// Calls every handler registered for the event's kind, in registration order.
    pub fn emit(&self, event: &SessionEvent) {
        // Handlers run outside the lock so they may register or remove listeners.
        let handlers: Vec<SessionHandler> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.kind())
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn listener_count(&self, kind: SessionEventKind) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    pub fn total_listeners(&self) -> usize {
        SessionEventKind::ALL
            .iter()
            .map(|kind| self.listener_count(*kind))
            .sum()
    }
}

/// Scoped registration of one listener per event kind.
///
/// Every registered handler forwards its event into a channel. Dropping the
/// scope removes all of them, whichever way the owner exits.
pub struct ListenerScope {
    session: Option<Arc<dyn VoiceSession>>,
    registrations: Vec<(SessionEventKind, ListenerId)>,
}

impl ListenerScope {
    pub fn attach(session: Arc<dyn VoiceSession>, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        let registrations = SessionEventKind::ALL
            .iter()
            .map(|&kind| {
                let tx = tx.clone();
                let handler: SessionHandler = Arc::new(move |event: &SessionEvent| {
                    if tx.send(event.clone()).is_err() {
                        tracing::debug!("dropping {} event, controller is gone", event.kind().as_str());
                    }
                });
                (kind, session.on(kind, handler))
            })
            .collect();
        tracing::debug!("attached session listeners");
        Self {
            session: Some(session),
            registrations,
        }
    }

    /// A scope that holds no listeners.
    pub fn detached() -> Self {
        Self {
            session: None,
            registrations: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl Drop for ListenerScope {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            for (kind, id) in self.registrations.drain(..) {
                session.off(kind, id);
            }
            tracing::debug!("detached session listeners");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RegistryOnly {
        registry: ListenerRegistry,
    }

    #[async_trait]
    impl VoiceSession for RegistryOnly {
        async fn start(&self, _config: SessionStartConfig) -> Result<()> {
            Ok(())
        }

        async fn stop(&self) -> Result<()> {
            Ok(())
        }

        fn on(&self, kind: SessionEventKind, handler: SessionHandler) -> ListenerId {
            self.registry.add(kind, handler)
        }

        fn off(&self, kind: SessionEventKind, id: ListenerId) {
            self.registry.remove(kind, id);
        }
    }

    #[test]
    fn test_emit_only_reaches_matching_kind() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        registry.add(
            SessionEventKind::SpeechStart,
            Arc::new(move |event: &SessionEvent| sink.lock().unwrap().push(event.clone())),
        );

        registry.emit(&SessionEvent::SpeechEnd);
        registry.emit(&SessionEvent::SpeechStart);

        assert_eq!(*seen.lock().unwrap(), vec![SessionEvent::SpeechStart]);
    }

    #[test]
    fn test_remove_unknown_listener_is_noop() {
        let registry = ListenerRegistry::new();
        let id = registry.add(SessionEventKind::Error, Arc::new(|_: &SessionEvent| {}));
        assert!(!registry.remove(SessionEventKind::CallEnd, id));
        assert!(registry.remove(SessionEventKind::Error, id));
        assert!(!registry.remove(SessionEventKind::Error, id));
    }

    #[test]
    fn test_scope_attaches_and_detaches_all_kinds() {
        let session = Arc::new(RegistryOnly {
            registry: ListenerRegistry::new(),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();

        let scope = ListenerScope::attach(session.clone(), tx);
        assert_eq!(scope.len(), 6);
        for kind in SessionEventKind::ALL {
            assert_eq!(session.registry.listener_count(kind), 1);
        }

        session.registry.emit(&SessionEvent::CallStart);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::CallStart);

        drop(scope);
        assert_eq!(session.registry.total_listeners(), 0);

        session.registry.emit(&SessionEvent::CallEnd);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_repeated_scopes_never_accumulate_listeners() {
        let session = Arc::new(RegistryOnly {
            registry: ListenerRegistry::new(),
        });
        for _ in 0..3 {
            let (tx, _rx) = mpsc::unbounded_channel();
            let _scope = ListenerScope::attach(session.clone(), tx);
            assert_eq!(session.registry.total_listeners(), 6);
        }
        assert_eq!(session.registry.total_listeners(), 0);
    }
}
