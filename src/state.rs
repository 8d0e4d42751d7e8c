use std::sync::Arc;

use crate::config::Config;
use crate::gate::LoginGate;
use crate::session::MemorySessionStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub gate: LoginGate,
    pub sessions: MemorySessionStore,
}
