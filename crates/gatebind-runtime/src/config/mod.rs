//! Configuration module for the gatebind runtime.
//!
//! This module provides figment-based configuration loading and validation
//! for logging and the binding pipeline.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{
    BindingConfig, GatebindConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, SpanEventConfig,
};
pub use validation::validate_config;
