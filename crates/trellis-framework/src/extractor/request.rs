use std::any::TypeId;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use trellis_core::HttpMessage;

use super::inject::{Argument, Inject, ParamType};

/// The inbound message, declared by its concrete type.
///
/// Resolves when the host's message really is a `T`, and then refers to the
/// very same instance a [`BoxedRequest`](trellis_core::BoxedRequest) parameter
/// would receive. Use `Deref` to reach the message:
///
/// ```rust,ignore
/// fn handler(request: Request<http::Request<()>>) -> String {
///     request.method().to_string()
/// }
/// ```
pub struct Request<T: HttpMessage>(pub Arc<T>);

impl<T: HttpMessage> Request<T> {
    /// Returns the shared message.
    pub fn into_inner(self) -> Arc<T> {
        self.0
    }
}

impl<T: HttpMessage> Deref for Request<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: HttpMessage> Clone for Request<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: HttpMessage + fmt::Debug> fmt::Debug for Request<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Request").field(&self.0).finish()
    }
}

impl<T: HttpMessage> Inject for Request<T> {
    fn declared_type() -> ParamType {
        ParamType::Concrete {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    fn from_argument(argument: Argument) -> Option<Self> {
        match argument {
            Argument::Message(request) => request.into_any().downcast::<T>().ok().map(Request),
            _ => None,
        }
    }
}
