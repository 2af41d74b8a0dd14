//! # Trellis
//!
//! A request router with type-directed handler injection.
//!
//! ## Overview
//!
//! Trellis sits between a host HTTP server and application code. The host
//! parses the wire protocol; Trellis matches the parsed request against a
//! table of path patterns, resolves the handler, supplies its parameters from
//! their declared types, calls it and hands the return value to a publisher.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐     ┌────────┐     ┌─────────────┐     ┌────────────┐     ┌───────────┐
//! │   Host   │────▶│ Router │────▶│ Route table │────▶│ Middleware │────▶│  Handler  │
//! │  server  │     │        │     │  (first     │     │   chain    │     │ (injected │
//! └──────────┘     └────────┘     │   match)    │     └────────────┘     │   args)   │
//!                       ▲         └─────────────┘                        └─────┬─────┘
//!                       │                                                      │
//!                       └──────────────────── Publisher ◀──────────────────────┘
//! ```
//!
//! - **Router**: registration facade and dispatch entry point
//! - **Route table**: ordered `{param}` patterns with optional domain constraints
//! - **Callable resolver**: closures, `"Class@method"` strings and
//!   class/method pairs, resolved lazily against registered controllers
//! - **Argument resolver**: injects the matched route, the request (by
//!   interface or concrete type) or declared defaults
//! - **Publisher**: stdout by default, in-memory for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trellis::prelude::*;
//!
//! fn show(route: MatchedRoute, request: BoxedRequest) -> String {
//!     format!("{} {}", request.method(), route.parameter("id").unwrap_or_default())
//! }
//!
//! fn main() -> Result<(), DispatchError> {
//!     let mut router = Router::new();
//!     router.get("/users/{id}", show).name("users.show");
//!
//!     let request = http::Request::builder()
//!         .uri("http://example.com/users/42")
//!         .body(())
//!         .unwrap();
//!     router.dispatch(std::sync::Arc::new(request))
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use trellis_core as core;
pub use trellis_framework as framework;
pub use trellis_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    // Router facade - main entry point
    pub use trellis_runtime::{GroupAttributes, Router};

    // Messages and outputs
    pub use trellis_core::{BoxedRequest, HttpMessage, IntoOutput, Output};

    // Extractors - for handler parameters
    pub use trellis_framework::{MatchedRoute, Request};

    // Handlers and controllers
    pub use trellis_framework::{Actions, Controller, Function, HandlerRef};

    // Middleware
    pub use trellis_framework::{Middleware, Next, RequestContext, from_fn};

    // Publishers
    pub use trellis_framework::{Publisher, StdoutPublisher, TrapPublisher, WritePublisher};

    // Errors
    pub use trellis_framework::{DispatchError, DispatchResult, InvalidCallableError, RouteNotFoundError};
}
