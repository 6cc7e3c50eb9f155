use std::sync::Arc;

use cs_domain::config::Config;
use cs_load::LoadSession;

use crate::runtime::Advisor;

/// Everything an interactive session needs.
///
/// - **config**: the resolved configuration
/// - **session**: load state, persisted on every confirmed mutation
/// - **advisor**: debounced advisory runtime observing the session
pub struct AppState {
    pub config: Arc<Config>,
    pub session: LoadSession,
    pub advisor: Advisor,
}

impl AppState {
    /// Stop background work. The session needs no flush: every mutation
    /// is already written through.
    pub async fn shutdown(self) {
        self.advisor.shutdown().await;
    }
}
