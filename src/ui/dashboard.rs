pub mod charts;
pub mod chat_table;
pub mod notices;
pub mod stats;
pub mod transcript;
