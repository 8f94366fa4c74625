pub mod config;
pub mod phase;
