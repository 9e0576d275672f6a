pub mod app_layout;
pub mod dashboard;
pub mod fonts;
