//! Configuration loading

mod config;

pub use config::{ApiConfig, ConfigError};
