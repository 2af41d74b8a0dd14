//! The ordered route table.
//!
//! Routes are tried in registration order and the first match wins. The table
//! itself never changes during a dispatch; matching only reads it.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::Method;
use tracing::trace;

use crate::error::{RouteNotFoundError, UrlError};
use crate::route::{MatchedRoute, Route};

/// An ordered collection of routes.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: Vec<Arc<Route>>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route and returns it for further configuration.
    ///
    /// Duplicates are kept; the earlier registration shadows the later one.
    pub fn add(&mut self, route: Route) -> &mut Route {
        trace!(
            method = %route.method(),
            pattern = route.pattern().as_str(),
            "Registering route"
        );
        self.routes.push(Arc::new(route));
        let last = self.routes.len() - 1;
        // Copy-on-write: only clones if a dispatch still holds the route.
        Arc::make_mut(&mut self.routes[last])
    }

    /// Finds the first route accepting the request.
    ///
    /// `path` should already be normalised; `host` is the request host
    /// without its port.
    pub fn match_route(
        &self,
        method: &Method,
        path: &str,
        host: Option<&str>,
    ) -> Result<MatchedRoute, RouteNotFoundError> {
        self.routes
            .iter()
            .find_map(|route| {
                route.matches(method, path, host).map(|parameters| {
                    MatchedRoute::new(Arc::clone(route), method.clone(), path, parameters)
                })
            })
            .ok_or_else(|| RouteNotFoundError {
                method: method.clone(),
                path: path.to_string(),
                domain: host.map(str::to_string),
            })
    }

    /// The first route carrying `name`.
    pub fn named(&self, name: &str) -> Option<&Arc<Route>> {
        self.routes.iter().find(|route| route.name() == Some(name))
    }

    /// Builds the path of a named route from `params`.
    pub fn url(&self, name: &str, params: &BTreeMap<String, String>) -> Result<String, UrlError> {
        let route = self
            .named(name)
            .ok_or_else(|| UrlError::UnknownRoute(name.to_string()))?;

        route
            .pattern()
            .build(params)
            .map_err(|parameter| UrlError::MissingParameter {
                route: name.to_string(),
                parameter,
            })
    }

    /// Iterates over the routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callable::HandlerRef;
    use crate::route::RouteMethod;

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table
            .add(Route::new(Method::GET, "/", HandlerRef::action("Home@index")))
            .set_name("home");
        table
            .add(Route::new(Method::GET, "/users/{id}", HandlerRef::action("User@show")))
            .set_name("users.show");
        table.add(Route::new(
            RouteMethod::Any,
            "/users/{id}",
            HandlerRef::action("User@fallback"),
        ));
        table
    }

    #[test]
    fn test_first_match_wins() {
        let table = table();
        let matched = table.match_route(&Method::GET, "/users/7", None).unwrap();
        assert_eq!(matched.name(), Some("users.show"));

        let matched = table.match_route(&Method::POST, "/users/7", None).unwrap();
        assert_eq!(matched.name(), None);
        assert_eq!(matched.method(), &Method::POST);
    }

    #[test]
    fn test_not_found() {
        let err = table()
            .match_route(&Method::GET, "/unknown", Some("example.com"))
            .unwrap_err();
        assert_eq!(err.path, "/unknown");
        assert_eq!(err.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_matching_is_idempotent() {
        let table = table();
        let first = table.match_route(&Method::GET, "/users/1", Some("example.com")).unwrap();
        let second = table.match_route(&Method::GET, "/users/1", Some("example.com")).unwrap();

        assert_eq!(first.name(), second.name());
        assert_eq!(first.uri(), second.uri());
        assert_eq!(first.parameters(), second.parameters());
        assert_eq!(second.parameter("id"), Some("1"));
        assert!(Arc::ptr_eq(first.route(), second.route()));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_uri_is_the_request_path() {
        let mut table = RouteTable::new();
        table.add(Route::new(Method::GET, "/{id}/{id}", HandlerRef::action("Pair@show")));

        let matched = table.match_route(&Method::GET, "/1/2", None).unwrap();
        assert_eq!(matched.uri(), "/1/2");
        assert_eq!(matched.parameter("id"), Some("2"));
    }

    #[test]
    fn test_url_for_named_route() {
        let table = table();
        let params = BTreeMap::from([("id".to_string(), "42".to_string())]);

        assert_eq!(table.url("home", &BTreeMap::new()).unwrap(), "/");
        assert_eq!(table.url("users.show", &params).unwrap(), "/users/42");
        assert_eq!(
            table.url("users.show", &BTreeMap::new()),
            Err(UrlError::MissingParameter {
                route: "users.show".into(),
                parameter: "id".into()
            })
        );
        assert_eq!(
            table.url("missing", &params),
            Err(UrlError::UnknownRoute("missing".into()))
        );
    }
}
