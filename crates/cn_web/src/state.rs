use std::sync::Arc;
use cn_agent::Agent;
use reqwest::Client;

/// Shared by all requests. The agent is stateless between tasks and the
/// client pools connections internally, so neither needs a lock.
pub struct AppState {
    pub agent: Arc<dyn Agent>,
    pub client: Client,
}

impl AppState {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            agent,
            client: Client::new(),
        }
    }
}
