//! Routes and per-request route bindings.
//!
//! A [`Route`] is registered once and then shared read-only by every dispatch.
//! A successful match never writes into it; instead it produces a
//! [`MatchedRoute`], a per-request value pairing the shared route with the
//! parameters captured from that request's path. Handlers ask for a
//! `MatchedRoute` to introspect the route they were reached through.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::Method;
use tracing::warn;
use trellis_core::{PathPattern, strip_port};

use crate::callable::HandlerRef;
use crate::middleware::Middleware;

/// Which request methods a route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMethod {
    /// Exactly this method.
    Only(Method),
    /// Any method.
    Any,
}

impl RouteMethod {
    /// Tests a request method against this filter.
    pub fn accepts(&self, method: &Method) -> bool {
        match self {
            Self::Only(expected) => expected == method,
            Self::Any => true,
        }
    }
}

impl From<Method> for RouteMethod {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Only(method) => write!(f, "{method}"),
            Self::Any => f.write_str("ANY"),
        }
    }
}

/// A registered binding of a method and path pattern to a handler.
#[derive(Clone)]
pub struct Route {
    name: Option<String>,
    pattern: PathPattern,
    method: RouteMethod,
    handler: HandlerRef,
    middleware: Vec<Arc<dyn Middleware>>,
    domain: Option<String>,
}

impl Route {
    /// Creates a route with no name, middleware or domain constraint.
    pub fn new(method: impl Into<RouteMethod>, pattern: &str, handler: HandlerRef) -> Self {
        Self {
            name: None,
            pattern: PathPattern::parse(pattern),
            method: method.into(),
            handler,
            middleware: Vec::new(),
            domain: None,
        }
    }

    /// Sets the route name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Restricts the route to requests addressed to `domain`.
    ///
    /// Request hosts are compared without their port, so a port given here
    /// is dropped.
    pub fn set_domain(&mut self, domain: impl Into<String>) {
        let domain = domain.into();
        let host = strip_port(&domain);
        if host.len() != domain.len() {
            warn!(domain = %domain, "Route domains cannot carry a port, ignoring it");
        }
        self.domain = Some(host.to_string());
    }

    /// Appends a middleware. Middleware runs in the order it was added.
    pub fn push_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    /// Prepends a path prefix to the pattern.
    pub fn prefix(&mut self, prefix: &str) {
        self.pattern = self.pattern.prefixed(prefix);
    }

    /// The route name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The path pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The accepted methods.
    pub fn method(&self) -> &RouteMethod {
        &self.method
    }

    /// The handler reference, resolved lazily at dispatch time.
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// The route middleware, in execution order.
    pub fn middleware(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    /// The domain constraint, if any.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Tests a request against this route.
    ///
    /// The domain is compared only when the route declares one; host names
    /// compare case-insensitively.
    pub fn matches(
        &self,
        method: &Method,
        path: &str,
        host: Option<&str>,
    ) -> Option<BTreeMap<String, String>> {
        if !self.method.accepts(method) {
            return None;
        }

        if let Some(domain) = &self.domain {
            match host {
                Some(host) if host.eq_ignore_ascii_case(domain) => {}
                _ => return None,
            }
        }

        self.pattern.matches(path)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("method", &self.method)
            .field("handler", &self.handler)
            .field("middleware_count", &self.middleware.len())
            .field("domain", &self.domain)
            .finish()
    }
}

/// The route a request was matched to, with the parameters bound for that
/// request.
///
/// Cloning is cheap; the route itself is shared.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    route: Arc<Route>,
    method: Method,
    uri: String,
    parameters: BTreeMap<String, String>,
}

impl MatchedRoute {
    pub(crate) fn new(
        route: Arc<Route>,
        method: Method,
        uri: impl Into<String>,
        parameters: BTreeMap<String, String>,
    ) -> Self {
        Self {
            route,
            method,
            uri: uri.into(),
            parameters,
        }
    }

    /// The route name, if any.
    pub fn name(&self) -> Option<&str> {
        self.route.name()
    }

    /// The registered path pattern, e.g. `/users/{id}`.
    pub fn path(&self) -> &str {
        self.route.pattern().as_str()
    }

    /// The normalised request path, e.g. `/users/42`.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The parameters captured from the request path.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// A single captured parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// The method the request was made with.
    ///
    /// For routes registered with [`RouteMethod::Any`] this is the actual
    /// request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The number of middleware attached to the route.
    pub fn middleware_count(&self) -> usize {
        self.route.middleware().len()
    }

    /// The route's domain constraint, if any.
    pub fn domain(&self) -> Option<&str> {
        self.route.domain()
    }

    /// The shared registered route.
    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(method: RouteMethod, pattern: &str) -> Route {
        Route::new(method, pattern, HandlerRef::action("HomeController@index"))
    }

    #[test]
    fn test_method_filter() {
        let get = route(Method::GET.into(), "/");
        assert!(get.matches(&Method::GET, "/", None).is_some());
        assert!(get.matches(&Method::POST, "/", None).is_none());

        let any = route(RouteMethod::Any, "/");
        assert!(any.matches(&Method::DELETE, "/", None).is_some());
    }

    #[test]
    fn test_domain_constraint() {
        let mut api = route(Method::GET.into(), "/");
        api.set_domain("api.example.com");

        assert!(api.matches(&Method::GET, "/", Some("api.example.com")).is_some());
        assert!(api.matches(&Method::GET, "/", Some("API.Example.com")).is_some());
        assert!(api.matches(&Method::GET, "/", Some("example.com")).is_none());
        assert!(api.matches(&Method::GET, "/", None).is_none());

        let open = route(Method::GET.into(), "/");
        assert!(open.matches(&Method::GET, "/", Some("anything.test")).is_some());
    }

    #[test]
    fn test_domain_port_is_dropped() {
        let mut api = route(Method::GET.into(), "/");
        api.set_domain("api.example.com:8080");

        assert_eq!(api.domain(), Some("api.example.com"));
        assert!(api.matches(&Method::GET, "/", Some("api.example.com")).is_some());
    }

    #[test]
    fn test_matched_route_introspection() {
        let mut users = route(Method::GET.into(), "/users/{id}");
        users.set_name("users.show");
        let params = users.matches(&Method::GET, "/users/42", None).unwrap();
        let matched = MatchedRoute::new(Arc::new(users), Method::GET, "/users/42", params);

        assert_eq!(matched.name(), Some("users.show"));
        assert_eq!(matched.path(), "/users/{id}");
        assert_eq!(matched.uri(), "/users/42");
        assert_eq!(matched.parameter("id"), Some("42"));
        assert_eq!(matched.method(), &Method::GET);
        assert_eq!(matched.middleware_count(), 0);
        assert_eq!(matched.domain(), None);
    }

    #[test]
    fn test_prefix() {
        let mut show = route(Method::GET.into(), "/{id}");
        show.prefix("/users");
        assert_eq!(show.pattern().as_str(), "/users/{id}");
    }
}
