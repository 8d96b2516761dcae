pub mod dto;
pub mod event;

pub use dto::{EventDto, EventPayload};
pub use event::Event;
