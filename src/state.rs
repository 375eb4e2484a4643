use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::gateway::dispatcher::Dispatcher;
use crate::gateway::heartbeat::Heartbeat;
use crate::gateway::router::BroadcastRouter;
use crate::presence::PresenceRegistry;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub chat: Arc<BroadcastRouter>,
    pub public_dir: PathBuf,
    pub heartbeat: Heartbeat,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        let presence = Arc::new(PresenceRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(config.outbound_buffer));

        Self {
            db,
            chat: Arc::new(BroadcastRouter::new(presence, dispatcher)),
            public_dir: config.public_dir.clone(),
            heartbeat: config.heartbeat,
        }
    }
}
