use std::path::PathBuf;
use std::time::Duration;

use crate::gateway::heartbeat::Heartbeat;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:chat.db?mode=rwc";
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub public_dir: PathBuf,
    /// Capacity of each connection's outbound queue. Events for a session
    /// whose queue is full are dropped.
    pub outbound_buffer: usize,
    pub heartbeat: Heartbeat,
}

impl Config {
    pub fn from_env() -> Self {
        let outbound_buffer = std::env::var("CHAT_OUTBOUND_BUFFER")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_OUTBOUND_BUFFER);

        let defaults = Heartbeat::default();
        let heartbeat = Heartbeat {
            interval: secs_from_env("CHAT_HEARTBEAT_INTERVAL").unwrap_or(defaults.interval),
            timeout: secs_from_env("CHAT_HEARTBEAT_TIMEOUT").unwrap_or(defaults.timeout),
        };

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            public_dir: std::env::var("CHAT_PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public")),
            outbound_buffer,
            heartbeat,
        }
    }
}

fn secs_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
