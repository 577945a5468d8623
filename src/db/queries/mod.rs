//! Database queries

pub mod client;
pub mod deal;
pub mod instagram;
pub mod task;
