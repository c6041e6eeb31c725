// Domain module - Types shared across the CLI, core and infrastructure layers
pub mod config;
pub mod error;
pub mod item;
