//! # Trellis Framework
//!
//! Routing, handler resolution and dispatch for the Trellis request router.
//!
//! This layer provides:
//! - An ordered route table with `{name}` path parameters and optional domain
//!   constraints
//! - Lazy handler references (`"Class@method"` strings, class/method pairs,
//!   inline closures) and a registry of controllers to resolve them against
//! - Type-directed argument injection of the matched route and the message
//! - Per-route middleware
//! - A dispatcher that ties these together and hands the output to a
//!   publisher
//!
//! The framework is synchronous and holds no global state: everything a
//! dispatch needs is either in the [`Dispatcher`] or passed to it.

pub mod arguments;
pub mod callable;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod middleware;
pub mod publisher;
pub mod route;
pub mod table;

pub use arguments::resolve_arguments;
pub use callable::{Action, Actions, CallableResolver, Controller, HandlerRef, IntoHandlerRef};
pub use context::RequestContext;
pub use dispatcher::{DispatchState, Dispatcher};
pub use error::{DispatchError, DispatchResult, InvalidCallableError, RouteNotFoundError, UrlError};
pub use extractor::{Argument, Inject, ParamType, Request};
pub use handler::{CallError, Function, IntoAction, IntoFunction, Parameter, Signature};
pub use middleware::{FromFn, Middleware, Next, from_fn};
pub use publisher::{Publisher, StdoutPublisher, TrapPublisher, WritePublisher};
pub use route::{MatchedRoute, Route, RouteMethod};
pub use table::RouteTable;
