pub mod chat_table;
pub mod command;
pub mod config;
pub mod effects;
pub mod notifications;
pub mod reducer;
pub mod render;
pub mod state;
pub mod view_sync;
