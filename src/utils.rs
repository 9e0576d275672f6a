pub mod format;
pub mod text_processing;
