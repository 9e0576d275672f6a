pub mod chat;
pub mod de;
pub mod notice;
pub mod stats;
