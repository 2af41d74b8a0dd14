//! Route middleware.
//!
//! Middleware attached to a route runs in registration order around the
//! handler call. Each one receives the [`RequestContext`] and a [`Next`]
//! handle: calling [`Next::run`] continues the chain (and lets the middleware
//! wrap the result), returning without calling it short-circuits the handler.
//!
//! ```rust,ignore
//! let auth = from_fn(|ctx: &RequestContext, next: Next<'_>| {
//!     if ctx.request().headers().contains_key("authorization") {
//!         next.run(ctx)
//!     } else {
//!         Ok(Output::new("unauthorized"))
//!     }
//! });
//!
//! router.get("/admin", admin).middleware(auth);
//! ```

use std::fmt;
use std::sync::Arc;

use trellis_core::Output;

use crate::context::RequestContext;
use crate::error::DispatchResult;

/// A wrapper around handler invocation.
pub trait Middleware: Send + Sync + 'static {
    /// Handles the request, optionally delegating to the rest of the chain.
    fn handle(&self, ctx: &RequestContext, next: Next<'_>) -> DispatchResult<Output>;
}

/// The rest of the middleware chain, ending in the handler call.
pub struct Next<'a> {
    middleware: &'a [Arc<dyn Middleware>],
    endpoint: &'a dyn Fn(&RequestContext) -> DispatchResult<Output>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        middleware: &'a [Arc<dyn Middleware>],
        endpoint: &'a dyn Fn(&RequestContext) -> DispatchResult<Output>,
    ) -> Self {
        Self {
            middleware,
            endpoint,
        }
    }

    /// Runs the next middleware, or the handler once the chain is exhausted.
    pub fn run(self, ctx: &RequestContext) -> DispatchResult<Output> {
        match self.middleware.split_first() {
            Some((first, rest)) => first.handle(ctx, Next::new(rest, self.endpoint)),
            None => (self.endpoint)(ctx),
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// Middleware built from a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

impl<F> Middleware for FromFn<F>
where
    F: Fn(&RequestContext, Next<'_>) -> DispatchResult<Output> + Send + Sync + 'static,
{
    fn handle(&self, ctx: &RequestContext, next: Next<'_>) -> DispatchResult<Output> {
        (self.0)(ctx, next)
    }
}

/// Creates middleware from a closure.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&RequestContext, Next<'_>) -> DispatchResult<Output> + Send + Sync + 'static,
{
    FromFn(f)
}
