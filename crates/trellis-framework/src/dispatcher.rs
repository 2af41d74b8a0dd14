//! Request dispatcher for the Trellis framework.
//!
//! The [`Dispatcher`] takes one inbound message through its whole lifecycle:
//!
//! 1. The route table is searched in registration order for the first route
//!    accepting the request's method, path and host
//! 2. The route's handler reference is resolved to a [`Function`]
//! 3. The route middleware runs, ending in the handler call, whose arguments
//!    are resolved from the matched route and the message
//! 4. The output is handed to the [`Publisher`]
//!
//! ```rust,ignore
//! use trellis_framework::{Dispatcher, Route, HandlerRef, StdoutPublisher};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .routes_mut()
//!     .add(Route::new(Method::GET, "/", HandlerRef::function(|| "Hello")));
//!
//! dispatcher.dispatch(Arc::new(request), &StdoutPublisher)?;
//! ```

use std::fmt;

use tracing::{Level, debug, span, trace};
use trellis_core::{BoxedRequest, Output, normalize_path};

use crate::arguments::resolve_arguments;
use crate::callable::CallableResolver;
use crate::context::RequestContext;
use crate::error::{DispatchError, DispatchResult, InvalidCallableError};
use crate::handler::{CallError, Function};
use crate::middleware::Next;
use crate::publisher::Publisher;
use crate::table::RouteTable;

/// The stages a single dispatch moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// A request was received and nothing has run yet.
    Idle,
    /// Searching the route table.
    Matching,
    /// A route matched; its handler is being resolved and run.
    Invoking,
    /// The output was handed to the publisher.
    Published,
    /// The dispatch ended in an error.
    Failed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Matching => "matching",
            Self::Invoking => "invoking",
            Self::Published => "published",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Matches requests to routes and runs their handlers.
///
/// The dispatcher only reads its table and resolver while dispatching, so a
/// shared reference can serve any number of requests concurrently.
#[derive(Default, Clone)]
pub struct Dispatcher {
    routes: RouteTable,
    callables: CallableResolver,
}

impl Dispatcher {
    /// Creates a dispatcher with no routes and no controllers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher from an existing table and resolver.
    pub fn from_parts(routes: RouteTable, callables: CallableResolver) -> Self {
        Self { routes, callables }
    }

    /// The route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The route table, for registration.
    pub fn routes_mut(&mut self) -> &mut RouteTable {
        &mut self.routes
    }

    /// The controller registry.
    pub fn callables(&self) -> &CallableResolver {
        &self.callables
    }

    /// The controller registry, for registration.
    pub fn callables_mut(&mut self) -> &mut CallableResolver {
        &mut self.callables
    }

    /// Routes a request and runs its handler, returning the output without
    /// publishing it.
    pub fn handle(&self, request: BoxedRequest) -> DispatchResult<Output> {
        let method = request.method().clone();
        let path = normalize_path(request.path());
        let span = span!(Level::DEBUG, "dispatch", method = %method, path = %path);
        let _enter = span.enter();

        enter(DispatchState::Idle);
        enter(DispatchState::Matching);
        self.run(request, &path)
            .inspect_err(|_| enter(DispatchState::Failed))
    }

    /// Routes a request, runs its handler and publishes the output.
    pub fn dispatch(&self, request: BoxedRequest, publisher: &dyn Publisher) -> DispatchResult<()> {
        let output = self.handle(request)?;

        publisher.publish(&output).map_err(|err| {
            enter(DispatchState::Failed);
            DispatchError::Publish(err)
        })?;

        enter(DispatchState::Published);
        Ok(())
    }

    fn run(&self, request: BoxedRequest, path: &str) -> DispatchResult<Output> {
        let matched = self
            .routes
            .match_route(request.method(), path, request.host())
            .inspect_err(|err| debug!(error = %err, "No route matched"))?;

        enter(DispatchState::Invoking);
        trace!(
            route = matched.name().unwrap_or("unnamed"),
            pattern = matched.path(),
            "Route matched"
        );

        let function = self
            .callables
            .resolve(matched.route().handler())
            .inspect_err(|err| debug!(error = %err, "Invalid callable"))?;

        let ctx = RequestContext::new(matched, request);
        let endpoint = |ctx: &RequestContext| invoke(&function, ctx);
        Next::new(ctx.route().route().middleware(), &endpoint).run(&ctx)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("route_count", &self.routes.len())
            .field("callables", &self.callables)
            .finish()
    }
}

/// Resolves the handler's arguments and calls it.
fn invoke(function: &Function, ctx: &RequestContext) -> DispatchResult<Output> {
    let arguments = resolve_arguments(function.signature(), ctx)
        .inspect_err(|err| debug!(error = %err, "Invalid callable"))?;

    function.call(arguments).map_err(|err| match err {
        CallError::Argument { position, expected } => {
            let err = InvalidCallableError::ArgumentType {
                handler: function.label().to_string(),
                position,
                expected,
            };
            debug!(error = %err, "Invalid callable");
            err.into()
        }
        CallError::Handler(err) => DispatchError::Handler(err),
    })
}

fn enter(state: DispatchState) {
    trace!(%state, "Dispatch state");
}
