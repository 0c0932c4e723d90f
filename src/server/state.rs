use axum::extract::FromRef;

use crate::clock::Clock;
use crate::directory_store::DirectoryStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedDirectoryStore = Arc<dyn DirectoryStore>;
pub type SharedClock = Arc<dyn Clock>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub store: GuardedDirectoryStore,
    pub clock: SharedClock,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, store: GuardedDirectoryStore, clock: SharedClock) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            store,
            clock,
            hash: env!("GIT_HASH").to_string(),
        }
    }
}

impl FromRef<ServerState> for GuardedDirectoryStore {
    fn from_ref(input: &ServerState) -> Self {
        input.store.clone()
    }
}

impl FromRef<ServerState> for SharedClock {
    fn from_ref(input: &ServerState) -> Self {
        input.clock.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
