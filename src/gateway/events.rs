use serde::{Deserialize, Serialize};

/// Event names used on the wire.
pub mod event_name {
    pub const NEW_MESSAGE: &str = "new message";
    pub const ADD_USER: &str = "add user";
    pub const TYPING: &str = "typing";
    pub const STOP_TYPING: &str = "stop typing";
    pub const LOGIN: &str = "login";
    pub const USER_JOINED: &str = "user joined";
    pub const USER_LEFT: &str = "user left";
}

/// Frame envelope sent by clients: `{"event": "...", "data": ...}`.
#[derive(Debug, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// A client event after interpretation by its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message { text: String },
    AddUser { name: String },
    Typing,
    StopTyping,
}

/// Events the server pushes to connections, serialized with the same
/// envelope as [`ClientFrame`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "new message")]
    NewMessage { username: String, message: String },
    #[serde(rename = "login")]
    Login {
        #[serde(rename = "numUsers")]
        num_users: usize,
    },
    #[serde(rename = "user joined")]
    UserJoined {
        username: String,
        #[serde(rename = "numUsers")]
        num_users: usize,
    },
    #[serde(rename = "typing")]
    Typing { username: String },
    #[serde(rename = "stop typing")]
    StopTyping { username: String },
    #[serde(rename = "user left")]
    UserLeft {
        username: String,
        #[serde(rename = "numUsers")]
        num_users: usize,
    },
}
