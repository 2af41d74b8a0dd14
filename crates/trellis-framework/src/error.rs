//! Error types for the Trellis framework.
//!
//! Only two kinds of routing failure reach the host: [`RouteNotFoundError`]
//! and [`InvalidCallableError`]. Both are final for the request; routing is a
//! pure lookup, so retrying cannot change the outcome. Errors raised by the
//! handler itself are carried back untouched in [`DispatchError::Handler`].

use http::Method;
use thiserror::Error;
use trellis_core::BoxError;

/// No registered route matches the request's method, path and domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route matches {method} {path}{}", domain_suffix(.domain))]
pub struct RouteNotFoundError {
    /// The request method.
    pub method: Method,
    /// The request path.
    pub path: String,
    /// The request host, if it had one.
    pub domain: Option<String>,
}

fn domain_suffix(domain: &Option<String>) -> String {
    domain
        .as_deref()
        .map(|d| format!(" on {d}"))
        .unwrap_or_default()
}

/// A handler reference could not be turned into something callable, or one of
/// its parameters could not be supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCallableError {
    /// The referenced controller class is not registered.
    #[error("controller '{class}' does not exist")]
    UnknownClass {
        /// The class portion of the reference.
        class: String,
    },

    /// The controller exists but has no such method.
    #[error("method '{method}' does not exist on controller '{class}'")]
    UnknownMethod {
        /// The controller name.
        class: String,
        /// The missing method.
        method: String,
    },

    /// The controller's factory could not produce an instance.
    #[error("controller '{class}' could not be instantiated")]
    NotInstantiable {
        /// The controller name.
        class: String,
    },

    /// A string reference without the `Class@method` shape.
    #[error("malformed handler reference '{reference}', expected 'Class@method'")]
    MalformedReference {
        /// The reference as registered.
        reference: String,
    },

    /// The reference is neither a function, a `Class@method` string nor a
    /// class/method pair.
    #[error("handler reference {value} is not callable")]
    NotCallable {
        /// The registered value, rendered as JSON.
        value: String,
    },

    /// No injectable source and no default for a parameter.
    #[error("cannot resolve parameter #{position} '{name}' ({declared}) of {handler}")]
    UnresolvableParameter {
        /// The handler the parameter belongs to.
        handler: String,
        /// Zero-based position of the parameter.
        position: usize,
        /// Display name of the parameter.
        name: String,
        /// The declared type.
        declared: String,
    },

    /// A resolved value could not be converted into the parameter's type,
    /// typically a default of the wrong shape.
    #[error("argument #{position} of {handler} is not a valid {expected}")]
    ArgumentType {
        /// The handler the parameter belongs to.
        handler: String,
        /// Zero-based position of the parameter.
        position: usize,
        /// The Rust type the handler expects.
        expected: &'static str,
    },
}

/// Errors returned by a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// See [`RouteNotFoundError`].
    #[error(transparent)]
    RouteNotFound(#[from] RouteNotFoundError),

    /// See [`InvalidCallableError`].
    #[error(transparent)]
    InvalidCallable(#[from] InvalidCallableError),

    /// The error returned by the handler (or a middleware), exactly as it was
    /// raised.
    #[error(transparent)]
    Handler(BoxError),

    /// The publisher failed to write the handler's output.
    #[error("failed to publish output: {0}")]
    Publish(#[source] std::io::Error),
}

impl DispatchError {
    /// Wraps an application error raised by a handler or middleware.
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }

    /// Returns `true` for [`DispatchError::RouteNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound(_))
    }

    /// Returns `true` for [`DispatchError::InvalidCallable`].
    pub fn is_invalid_callable(&self) -> bool {
        matches!(self, Self::InvalidCallable(_))
    }

    /// Returns the handler's own error, if that is what this is.
    pub fn into_handler_error(self) -> Result<BoxError, Self> {
        match self {
            Self::Handler(err) => Ok(err),
            other => Err(other),
        }
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised when building a URL from a named route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// No route carries this name.
    #[error("no route named '{0}'")]
    UnknownRoute(String),

    /// The route's pattern needs a parameter that was not supplied.
    #[error("route '{route}' requires parameter '{parameter}'")]
    MissingParameter {
        /// The route name.
        route: String,
        /// The missing parameter.
        parameter: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = RouteNotFoundError {
            method: Method::GET,
            path: "/missing".into(),
            domain: None,
        };
        assert_eq!(err.to_string(), "no route matches GET /missing");

        let err = RouteNotFoundError {
            domain: Some("api.example.com".into()),
            ..err
        };
        assert_eq!(
            err.to_string(),
            "no route matches GET /missing on api.example.com"
        );
    }

    #[test]
    fn test_handler_error_is_returned_untouched() {
        let err = DispatchError::handler(std::io::Error::other("disk full"));
        let inner = err.into_handler_error().unwrap();
        let io = inner.downcast::<std::io::Error>().unwrap();
        assert_eq!(io.to_string(), "disk full");
    }
}
