use std::fmt;

use super::events::{event_name, ClientFrame, InboundEvent};

/// Opaque connection identifier assigned by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Named(String),
    Closed,
}

/// Returned by [`ChatSession::interpret`] for frames that are not a
/// recognized client event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

/// State of one chat connection.
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    state: SessionState,
}

impl ChatSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Parse a raw text frame into a client event. Closed sessions reject
    /// everything.
    pub fn interpret(&self, raw: &str) -> Result<InboundEvent, Rejected> {
        if self.state == SessionState::Closed {
            return Err(Rejected);
        }
        let frame: ClientFrame = serde_json::from_str(raw).map_err(|_| Rejected)?;
        let text_payload = || match frame.data {
            Some(serde_json::Value::String(ref s)) => Ok(s.clone()),
            _ => Err(Rejected),
        };

        match frame.event.as_str() {
            event_name::NEW_MESSAGE => Ok(InboundEvent::Message {
                text: text_payload()?,
            }),
            event_name::ADD_USER => Ok(InboundEvent::AddUser {
                name: text_payload()?,
            }),
            event_name::TYPING => Ok(InboundEvent::Typing),
            event_name::STOP_TYPING => Ok(InboundEvent::StopTyping),
            _ => Err(Rejected),
        }
    }

    /// Move to `Named`. Returns false without changing anything unless the
    /// session is still unauthenticated.
    pub fn mark_named(&mut self, name: impl Into<String>) -> bool {
        if self.state != SessionState::Unauthenticated {
            return false;
        }
        self.state = SessionState::Named(name.into());
        true
    }

    pub fn is_named(&self) -> bool {
        matches!(self.state, SessionState::Named(_))
    }

    pub fn name(&self) -> Option<&str> {
        match &self.state {
            SessionState::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Move to `Closed`, returning the name the session held, if any.
    /// Calling it again returns `None`.
    pub fn close(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }
}
