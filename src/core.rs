pub mod api;
pub mod asset_cache;
pub mod push;
