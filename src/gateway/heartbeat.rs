use std::time::Duration;

/// How often the server pings each connection.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);
/// A connection silent for longer than this is treated as disconnected.
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self {
            interval: HEARTBEAT_INTERVAL,
            timeout: HEARTBEAT_TIMEOUT,
        }
    }
}
