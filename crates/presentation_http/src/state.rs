//! Application state shared across handlers

use std::sync::Arc;

use application::ChatService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat service for single answers and event streams
    pub chat_service: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat_service: ChatService) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
        }
    }
}
