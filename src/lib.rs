pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod garage;
pub mod history;
pub mod prediction;
pub mod state;
