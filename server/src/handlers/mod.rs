pub mod events;

pub use events::{create_event, delete_event, get_event, list_events, update_event};

pub const HEALTH_MESSAGE: &str = "Backend connected successfully";

pub async fn health_check() -> &'static str {
    HEALTH_MESSAGE
}
