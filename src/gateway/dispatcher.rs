use axum::extract::ws::Utf8Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};

use super::events::ServerEvent;
use super::session::{ChatSession, SessionId};

/// Owns the set of live connections and their outbound queues.
///
/// Delivery never waits: each connection has a bounded queue drained by its
/// own socket task, and an event for a full or closed queue is dropped.
pub struct Dispatcher {
    sessions: DashMap<SessionId, mpsc::Sender<Utf8Bytes>>,
    next_id: AtomicU64,
    outbound_capacity: usize,
}

impl Dispatcher {
    pub fn new(outbound_capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(1),
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    /// Register a new connection. The returned receiver yields the frames
    /// to write to its socket.
    pub fn open_session(&self) -> (ChatSession, mpsc::Receiver<Utf8Bytes>) {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.outbound_capacity);
        self.sessions.insert(id, tx);
        (ChatSession::new(id), rx)
    }

    /// Returns false if the session was already gone.
    pub fn remove_session(&self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn is_live(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.sessions.len()
    }

    /// Queue `event` for one session. Returns whether it was queued.
    pub fn send_to(&self, id: SessionId, event: &ServerEvent) -> bool {
        let Some(frame) = encode(event) else {
            return false;
        };
        match self.sessions.get(&id) {
            Some(tx) => deliver(id, &tx, frame),
            None => false,
        }
    }

    /// Queue `event` for every live session except `origin`. Returns the
    /// number of sessions it was queued for.
    pub fn broadcast_except(&self, origin: SessionId, event: &ServerEvent) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };
        self.sessions
            .iter()
            .filter(|entry| *entry.key() != origin)
            .filter(|entry| deliver(*entry.key(), entry.value(), frame.clone()))
            .count()
    }
}

fn encode(event: &ServerEvent) -> Option<Utf8Bytes> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json.into()),
        Err(e) => {
            tracing::error!("failed to encode chat event: {e}");
            None
        }
    }
}

fn deliver(id: SessionId, tx: &mpsc::Sender<Utf8Bytes>, frame: Utf8Bytes) -> bool {
    match tx.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::debug!(session_id = %id, "outbound queue full, dropping event");
            false
        }
        Err(TrySendError::Closed(_)) => false,
    }
}
