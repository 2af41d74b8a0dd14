//! The request-scoped dispatch context.
//!
//! One [`RequestContext`] is created per dispatch, after a route has matched,
//! and lives exactly as long as that dispatch. It is what middleware sees and
//! what handler arguments are resolved from.

use trellis_core::BoxedRequest;

use crate::route::MatchedRoute;

/// The matched route and the inbound message for a single dispatch.
#[derive(Debug, Clone)]
pub struct RequestContext {
    route: MatchedRoute,
    request: BoxedRequest,
}

impl RequestContext {
    /// Creates a context for one dispatch.
    pub fn new(route: MatchedRoute, request: BoxedRequest) -> Self {
        Self { route, request }
    }

    /// The matched route, with its bound parameters.
    pub fn route(&self) -> &MatchedRoute {
        &self.route
    }

    /// The inbound message.
    pub fn request(&self) -> &BoxedRequest {
        &self.request
    }
}
