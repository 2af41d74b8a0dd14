//! The router facade.
//!
//! [`Router`] is what applications hold: it owns the [`Dispatcher`] and a
//! [`Publisher`], offers verb methods for registration and dispatches
//! requests handed over by the host server.
//!
//! ```rust,ignore
//! use trellis_runtime::Router;
//!
//! let mut router = Router::new();
//! router.register_controller::<UserController>();
//!
//! router.get("/", || "Hello").name("home");
//! router.get("/users/{id}", "UserController@show").name("users.show");
//! router.group(GroupAttributes::new().prefix("/admin").middleware(auth), |admin| {
//!     admin.get("/stats", "AdminController@stats");
//! });
//!
//! // Registration is done; share the router with request handlers.
//! let router = Arc::new(router);
//! router.dispatch(Arc::new(request))?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::Method;
use tracing::{debug, info};
use trellis_core::{BoxedRequest, Output};
use trellis_framework::{
    CallableResolver, Controller, DispatchResult, Dispatcher, HandlerRef, IntoHandlerRef,
    Middleware, Publisher, Route, RouteMethod, RouteTable, StdoutPublisher, UrlError,
};

use crate::config::{ConfigResult, RouteConfig, parse_method, validation::validate_routes_config};

/// Generates the verb registration methods shared by [`Router`] and
/// [`GroupBuilder`]. Each impl provides `fn map(...)`.
macro_rules! verb_methods {
    ($($(#[$doc:meta])* $verb:ident => $method:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $verb<M>(&mut self, path: &str, handler: impl IntoHandlerRef<M>) -> RouteBuilder<'_> {
                self.map($method, path, handler)
            }
        )*
    };
}

/// Routes requests to handlers and publishes their output.
pub struct Router {
    dispatcher: Dispatcher,
    publisher: Arc<dyn Publisher>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a router that publishes to standard output.
    pub fn new() -> Self {
        Self::with_publisher(StdoutPublisher)
    }

    /// Creates a router with a custom publisher.
    pub fn with_publisher(publisher: impl Publisher + 'static) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            publisher: Arc::new(publisher),
        }
    }

    /// Replaces the publisher.
    pub fn set_publisher(&mut self, publisher: impl Publisher + 'static) {
        self.publisher = Arc::new(publisher);
    }

    /// The publisher outputs are written to.
    pub fn publisher(&self) -> &Arc<dyn Publisher> {
        &self.publisher
    }

    verb_methods! {
        /// Registers a `GET` route.
        get => Method::GET;
        /// Registers a `POST` route.
        post => Method::POST;
        /// Registers a `PUT` route.
        put => Method::PUT;
        /// Registers a `PATCH` route.
        patch => Method::PATCH;
        /// Registers a `DELETE` route.
        delete => Method::DELETE;
        /// Registers an `OPTIONS` route.
        options => Method::OPTIONS;
        /// Registers a route accepting every method.
        any => RouteMethod::Any;
    }

    /// Registers a route for `method`.
    pub fn map<M>(
        &mut self,
        method: impl Into<RouteMethod>,
        path: &str,
        handler: impl IntoHandlerRef<M>,
    ) -> RouteBuilder<'_> {
        let route = Route::new(method, path, handler.into_handler_ref());
        RouteBuilder::new(self.dispatcher.routes_mut().add(route))
    }

    /// Registers routes sharing a path prefix, middleware and domain.
    pub fn group<F>(&mut self, attributes: GroupAttributes, routes: F) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        let mut group = GroupBuilder {
            table: self.dispatcher.routes_mut(),
            attributes,
        };
        routes(&mut group);
        self
    }

    /// Registers a controller constructed with `Default`, making its actions
    /// reachable from `"Class@method"` references.
    pub fn register_controller<C: Controller + Default>(&mut self) -> &mut Self {
        self.dispatcher.callables_mut().register::<C>();
        self
    }

    /// The controller registry, for custom factories.
    pub fn controllers_mut(&mut self) -> &mut CallableResolver {
        self.dispatcher.callables_mut()
    }

    /// Registers routes declared in configuration.
    ///
    /// The whole list is validated first, so nothing is registered if any
    /// entry is invalid. Returns the number of routes added.
    pub fn load_routes(&mut self, routes: &[RouteConfig]) -> ConfigResult<usize> {
        validate_routes_config(routes)?;

        for config in routes {
            let method = parse_method(&config.method)?;
            let mut route = self.map(method, &config.path, HandlerRef::from(config.handler.clone()));
            if let Some(name) = &config.name {
                route = route.name(name);
            }
            if let Some(domain) = &config.domain {
                route.domain(domain);
            }
        }

        info!(count = routes.len(), "Loaded routes from configuration");
        Ok(routes.len())
    }

    /// Routes a request, runs its handler and publishes the output.
    pub fn dispatch(&self, request: BoxedRequest) -> DispatchResult<()> {
        self.dispatcher.dispatch(request, &*self.publisher)
    }

    /// Routes a request and runs its handler, returning the output instead
    /// of publishing it.
    pub fn handle(&self, request: BoxedRequest) -> DispatchResult<Output> {
        self.dispatcher.handle(request)
    }

    /// Builds the path of a named route.
    pub fn url(&self, name: &str, params: &BTreeMap<String, String>) -> Result<String, UrlError> {
        self.dispatcher.routes().url(name, params)
    }

    /// The registered routes.
    pub fn routes(&self) -> &RouteTable {
        self.dispatcher.routes()
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// Further configuration of a freshly registered route.
#[derive(Debug)]
pub struct RouteBuilder<'a> {
    route: &'a mut Route,
}

impl<'a> RouteBuilder<'a> {
    fn new(route: &'a mut Route) -> Self {
        Self { route }
    }

    /// Names the route, for introspection and [`Router::url`].
    pub fn name(self, name: impl Into<String>) -> Self {
        self.route.set_name(name);
        self
    }

    /// Appends a middleware.
    pub fn middleware(self, middleware: impl Middleware) -> Self {
        self.route.push_middleware(Arc::new(middleware));
        self
    }

    /// Appends an already shared middleware.
    pub fn middleware_arc(self, middleware: Arc<dyn Middleware>) -> Self {
        self.route.push_middleware(middleware);
        self
    }

    /// Restricts the route to requests addressed to `domain`.
    pub fn domain(self, domain: impl Into<String>) -> Self {
        self.route.set_domain(domain);
        self
    }
}

/// Attributes shared by every route of a group.
#[derive(Clone, Default)]
pub struct GroupAttributes {
    prefix: Option<String>,
    middleware: Vec<Arc<dyn Middleware>>,
    domain: Option<String>,
}

impl GroupAttributes {
    /// Attributes with no prefix, middleware or domain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `prefix` to every route path.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Runs `middleware` before each route's own middleware.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Restricts every route to requests addressed to `domain`.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Combines an enclosing group's attributes with a nested group's.
    ///
    /// Prefixes concatenate, outer middleware runs first and the inner domain
    /// replaces the outer one.
    fn nest(&self, inner: GroupAttributes) -> Self {
        let prefix = match (&self.prefix, inner.prefix) {
            (Some(outer), Some(inner)) => Some(format!(
                "{}/{}",
                outer.trim_end_matches('/'),
                inner.trim_start_matches('/')
            )),
            (outer, inner) => inner.or_else(|| outer.clone()),
        };
        let mut middleware = self.middleware.clone();
        middleware.extend(inner.middleware);

        Self {
            prefix,
            middleware,
            domain: inner.domain.or_else(|| self.domain.clone()),
        }
    }
}

impl fmt::Debug for GroupAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupAttributes")
            .field("prefix", &self.prefix)
            .field("middleware_count", &self.middleware.len())
            .field("domain", &self.domain)
            .finish()
    }
}

/// Registers routes inside a [`Router::group`].
pub struct GroupBuilder<'a> {
    table: &'a mut RouteTable,
    attributes: GroupAttributes,
}

impl GroupBuilder<'_> {
    verb_methods! {
        /// Registers a `GET` route in the group.
        get => Method::GET;
        /// Registers a `POST` route in the group.
        post => Method::POST;
        /// Registers a `PUT` route in the group.
        put => Method::PUT;
        /// Registers a `PATCH` route in the group.
        patch => Method::PATCH;
        /// Registers a `DELETE` route in the group.
        delete => Method::DELETE;
        /// Registers an `OPTIONS` route in the group.
        options => Method::OPTIONS;
        /// Registers a route accepting every method in the group.
        any => RouteMethod::Any;
    }

    /// Registers a route for `method` in the group.
    pub fn map<M>(
        &mut self,
        method: impl Into<RouteMethod>,
        path: &str,
        handler: impl IntoHandlerRef<M>,
    ) -> RouteBuilder<'_> {
        let mut route = Route::new(method, path, handler.into_handler_ref());
        if let Some(prefix) = &self.attributes.prefix {
            route.prefix(prefix);
        }
        if let Some(domain) = &self.attributes.domain {
            route.set_domain(domain.clone());
        }
        for middleware in &self.attributes.middleware {
            route.push_middleware(Arc::clone(middleware));
        }

        debug!(pattern = route.pattern().as_str(), "Registering grouped route");
        RouteBuilder::new(self.table.add(route))
    }

    /// Registers a nested group.
    pub fn group<F>(&mut self, attributes: GroupAttributes, routes: F) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        let mut nested = GroupBuilder {
            table: &mut *self.table,
            attributes: self.attributes.nest(attributes),
        };
        routes(&mut nested);
        self
    }
}

impl fmt::Debug for GroupBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupBuilder")
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_framework::{Next, RequestContext, TrapPublisher, from_fn};

    fn request(method: Method, uri: &str) -> BoxedRequest {
        Arc::new(
            http::Request::builder()
                .method(method)
                .uri(uri)
                .body(())
                .unwrap(),
        )
    }

    fn tag(label: &'static str) -> impl Middleware {
        from_fn(move |ctx: &RequestContext, next: Next<'_>| {
            let output = next.run(ctx)?;
            Ok(Output::new(format!("{label}({output})")))
        })
    }

    #[derive(Default)]
    struct UserController;

    impl Controller for UserController {
        fn actions(actions: &mut trellis_framework::Actions<Self>) {
            actions.add("show", |_: &Self, route: trellis_framework::MatchedRoute| {
                format!("user {}", route.parameter("id").unwrap_or_default())
            });
        }
    }

    #[test]
    fn test_verbs_register_routes() {
        let mut router = Router::with_publisher(TrapPublisher::new());
        router.get("/", || "get");
        router.post("/", || "post");
        router.any("/any", || "any");

        assert_eq!(router.routes().len(), 3);
        assert_eq!(
            router.handle(request(Method::POST, "/")).unwrap().to_string(),
            "post"
        );
        assert_eq!(
            router.handle(request(Method::PATCH, "/any")).unwrap().to_string(),
            "any"
        );
    }

    #[test]
    fn test_dispatch_publishes() {
        let trap = TrapPublisher::new();
        let mut router = Router::with_publisher(trap.clone());
        router.get("/", || "home");

        router.dispatch(request(Method::GET, "/")).unwrap();
        assert_eq!(trap.output(), "home");
    }

    #[test]
    fn test_builder_chain() {
        let mut router = Router::new();
        router
            .get("/", || "api")
            .name("api.home")
            .domain("api.example.com")
            .middleware(tag("outer"))
            .middleware(tag("inner"));

        let output = router
            .handle(request(Method::GET, "http://api.example.com/"))
            .unwrap();
        assert_eq!(output.to_string(), "outer(inner(api))");
        assert!(router.handle(request(Method::GET, "http://example.com/")).is_err());
    }

    #[test]
    fn test_group_attributes() {
        let mut router = Router::new();
        router.group(
            GroupAttributes::new().prefix("/admin").middleware(tag("group")),
            |admin| {
                admin.get("/stats", || "stats").name("admin.stats");
                admin.group(
                    GroupAttributes::new().prefix("users").middleware(tag("nested")),
                    |users| {
                        users.get("/{id}", || "user").middleware(tag("route"));
                    },
                );
            },
        );

        assert_eq!(
            router.url("admin.stats", &BTreeMap::new()).unwrap(),
            "/admin/stats"
        );
        let output = router.handle(request(Method::GET, "/admin/users/3")).unwrap();
        assert_eq!(output.to_string(), "group(nested(route(user)))");
    }

    #[test]
    fn test_load_routes() {
        let mut router = Router::new();
        router.register_controller::<UserController>();

        let routes = vec![RouteConfig {
            method: "get".into(),
            path: "/users/{id}".into(),
            handler: json!("UserController@show"),
            name: Some("users.show".into()),
            domain: None,
        }];
        assert_eq!(router.load_routes(&routes).unwrap(), 1);

        let output = router.handle(request(Method::GET, "/users/5")).unwrap();
        assert_eq!(output.to_string(), "user 5");
        assert_eq!(
            router
                .url("users.show", &BTreeMap::from([("id".into(), "5".into())]))
                .unwrap(),
            "/users/5"
        );
    }

    #[test]
    fn test_load_routes_is_all_or_nothing() {
        let mut router = Router::new();
        let routes = vec![
            RouteConfig {
                method: "GET".into(),
                path: "/".into(),
                handler: json!("Home@index"),
                name: None,
                domain: None,
            },
            RouteConfig {
                method: "BAD METHOD".into(),
                path: "/".into(),
                handler: json!("Home@index"),
                name: None,
                domain: None,
            },
        ];

        assert!(router.load_routes(&routes).is_err());
        assert!(router.routes().is_empty());
    }
}
