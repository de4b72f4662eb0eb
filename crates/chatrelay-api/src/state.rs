use std::sync::Arc;

use chatrelay_llm::ChatClient;

use crate::queue::MessagePublisher;

/// Shared application state passed to all handlers.
///
/// Both collaborators are behind trait objects so tests can substitute a
/// stub completion backend and a recording publisher.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn ChatClient>,
    pub queue: Arc<dyn MessagePublisher>,
}

impl AppState {
    pub fn new(client: Arc<dyn ChatClient>, queue: Arc<dyn MessagePublisher>) -> Self {
        Self { client, queue }
    }
}
