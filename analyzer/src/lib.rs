pub mod classify;
pub mod collection;
pub mod config;
pub mod metrics;
pub mod render;
pub mod segment;
pub mod source;
