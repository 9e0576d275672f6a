pub mod app_event;
pub mod push_event;
