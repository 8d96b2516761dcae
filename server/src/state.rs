use std::sync::Arc;

use crate::repository::EventRepository;
use crate::services::EventService;

/// Shared handler state. Cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
}

impl AppState {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self {
            events: EventService::new(repository),
        }
    }
}
