//! The opaque HTTP message interface.
//!
//! Trellis does not own request parsing. The host server supplies a value
//! implementing [`HttpMessage`] and Trellis only reads the parts it routes on:
//! method, path and host. Handlers can ask for the message either through the
//! interface ([`BoxedRequest`]) or by its concrete type; both resolve to the
//! same live instance.
//!
//! An implementation for [`http::Request`] is provided, so hosts built on
//! `hyper`/`axum`-style stacks can pass their requests straight through:
//!
//! ```rust,ignore
//! let request = http::Request::builder()
//!     .method("GET")
//!     .uri("http://example.com/users/42")
//!     .body(())?;
//!
//! router.dispatch(Arc::new(request))?;
//! ```

use std::any::Any;
use std::sync::Arc;

use http::{HeaderMap, Method, Uri, header};

/// Type-erased, shared HTTP message.
pub type BoxedRequest = Arc<dyn HttpMessage>;

/// An already-parsed inbound HTTP message supplied by the host.
pub trait HttpMessage: Any + Send + Sync {
    /// The request method.
    fn method(&self) -> &Method;

    /// The request target.
    fn uri(&self) -> &Uri;

    /// The request headers.
    fn headers(&self) -> &HeaderMap;

    /// Returns `self` as `&dyn Any` for concrete-type checks.
    fn as_any(&self) -> &dyn Any;

    /// Converts the shared message into `Arc<dyn Any>` for downcasting
    /// without copying it.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// The request path, as used for route matching.
    fn path(&self) -> &str {
        self.uri().path()
    }

    /// The host the request was addressed to, without a port.
    ///
    /// Taken from the URI authority when present, otherwise from the `Host`
    /// header.
    fn host(&self) -> Option<&str> {
        if let Some(host) = self.uri().host() {
            return Some(host);
        }

        self.headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(strip_port)
    }
}

impl<B> HttpMessage for http::Request<B>
where
    B: Send + Sync + 'static,
{
    fn method(&self) -> &Method {
        http::Request::method(self)
    }

    fn uri(&self) -> &Uri {
        http::Request::uri(self)
    }

    fn headers(&self) -> &HeaderMap {
        http::Request::headers(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl std::fmt::Debug for dyn HttpMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMessage")
            .field("method", self.method())
            .field("uri", self.uri())
            .finish_non_exhaustive()
    }
}

/// Strips a trailing `:port` from a `Host` header value.
///
/// Bracketed IPv6 literals keep their brackets: `[::1]:8080` → `[::1]`.
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
