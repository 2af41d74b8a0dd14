//! Type-directed parameter injection.
//!
//! Handler parameters are supplied by their declared type, never by name. The
//! set of injectable types is deliberately closed:
//!
//! | declared type          | receives                                   |
//! |------------------------|--------------------------------------------|
//! | [`MatchedRoute`]       | the route the request matched              |
//! | [`BoxedRequest`]       | the inbound HTTP message (by interface)    |
//! | [`Request<T>`]         | the same message, by its concrete type `T` |
//! | anything else          | the parameter's declared default, if any   |
//!
//! The declared type of a parameter is described by the [`Inject`] trait,
//! which every handler parameter type implements.
//!
//! ```rust,ignore
//! fn show(route: MatchedRoute, request: BoxedRequest) -> String {
//!     format!("{} {}", request.method(), route.uri())
//! }
//!
//! // `greeting` has no injectable source, so it takes its declared default.
//! let greet = Function::new(|greeting: String| greeting).with_default(0, "Hello");
//! ```
//!
//! [`MatchedRoute`]: crate::route::MatchedRoute
//! [`BoxedRequest`]: trellis_core::BoxedRequest

pub mod inject;
pub mod request;
pub mod value;

pub use inject::{Argument, Inject, ParamType};
pub use request::Request;
