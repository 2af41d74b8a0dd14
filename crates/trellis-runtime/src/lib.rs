//! Trellis Runtime - the application-facing layer of the Trellis router.
//!
//! This crate provides:
//! - The [`Router`] facade: verb registration, groups, controllers and
//!   dispatch to a publisher
//! - Layered configuration loading (`ConfigLoader`) including
//!   config-declared routes
//! - Logging configuration
//!
//! ```ignore
//! use trellis_runtime::{Router, config::load_config, logging};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let mut router = Router::new();
//!     router.register_controller::<HomeController>();
//!     router.load_routes(&config.routes)?;
//!     router.get("/health", || "ok");
//!
//!     // Hand `router` to the host server and call `router.dispatch(request)`
//!     // for every parsed request.
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod logging;
pub mod router;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, RouteConfig, RouterConfig};
pub use logging::{LoggingBuilder, SpanEvents};
pub use router::{GroupAttributes, GroupBuilder, RouteBuilder, Router};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient logging imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
