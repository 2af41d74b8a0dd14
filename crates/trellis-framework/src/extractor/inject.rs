use std::any::TypeId;
use std::fmt;

use serde_json::Value;
use trellis_core::BoxedRequest;

use crate::route::MatchedRoute;

/// The declared type of a handler parameter, as seen by the argument resolver.
#[derive(Clone, PartialEq, Eq)]
pub enum ParamType {
    /// The matched route.
    Route,
    /// The HTTP message, declared by its interface.
    Message,
    /// The HTTP message, declared by a concrete type.
    Concrete {
        /// The concrete message type.
        type_id: TypeId,
        /// Its name, for diagnostics.
        type_name: &'static str,
    },
    /// Any other type. Only a default can supply it.
    Value {
        /// The declared type's name, for diagnostics.
        type_name: &'static str,
    },
}

impl fmt::Debug for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route => f.write_str("Route"),
            Self::Message => f.write_str("Message"),
            Self::Concrete { type_name, .. } => write!(f, "Concrete({type_name})"),
            Self::Value { type_name } => write!(f, "Value({type_name})"),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route => f.write_str("MatchedRoute"),
            Self::Message => f.write_str("BoxedRequest"),
            Self::Concrete { type_name, .. } | Self::Value { type_name } => f.write_str(type_name),
        }
    }
}

/// A resolved argument, ready to be converted into a parameter value.
#[derive(Debug, Clone)]
pub enum Argument {
    /// The matched route.
    Route(MatchedRoute),
    /// The live inbound message.
    Message(BoxedRequest),
    /// A declared default.
    Value(Value),
}

/// A type that can appear as a handler parameter.
///
/// This is the Rust counterpart of a parameter's declared type: it tells the
/// argument resolver which source to draw from ([`Inject::declared_type`]),
/// whether the type carries its own default ([`Inject::declared_default`]),
/// and how to turn the resolved [`Argument`] into a value.
pub trait Inject: Sized + 'static {
    /// The declared type of this parameter.
    fn declared_type() -> ParamType;

    /// A default implied by the type itself. `Option<T>` declares `null`.
    fn declared_default() -> Option<Value> {
        None
    }

    /// Converts a resolved argument into this type.
    ///
    /// Returns `None` when the argument has the wrong shape.
    fn from_argument(argument: Argument) -> Option<Self>;
}

impl Inject for MatchedRoute {
    fn declared_type() -> ParamType {
        ParamType::Route
    }

    fn from_argument(argument: Argument) -> Option<Self> {
        match argument {
            Argument::Route(route) => Some(route),
            _ => None,
        }
    }
}

impl Inject for BoxedRequest {
    fn declared_type() -> ParamType {
        ParamType::Message
    }

    fn from_argument(argument: Argument) -> Option<Self> {
        match argument {
            Argument::Message(request) => Some(request),
            _ => None,
        }
    }
}

/// An optional parameter: declares a `null` default, so it resolves to `None`
/// when its source is unavailable instead of failing.
impl<T: Inject> Inject for Option<T> {
    fn declared_type() -> ParamType {
        T::declared_type()
    }

    fn declared_default() -> Option<Value> {
        Some(T::declared_default().unwrap_or(Value::Null))
    }

    fn from_argument(argument: Argument) -> Option<Self> {
        match argument {
            Argument::Value(Value::Null) => Some(None),
            other => T::from_argument(other).map(Some),
        }
    }
}
