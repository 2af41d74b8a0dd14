//! Configuration module for the Trellis runtime.
//!
//! This module provides figment-based configuration loading and validation
//! for logging and config-declared routes.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, RouteConfig, RouterConfig,
    SpanEventConfig,
};
pub use validation::{parse_method, validate_config};
