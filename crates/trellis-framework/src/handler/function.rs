//! Invokable handlers and their parameter metadata.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;
use trellis_core::{BoxError, Output};

use crate::extractor::{Argument, Inject, ParamType};

/// Metadata about one formal parameter of a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    position: usize,
    name: String,
    declared: ParamType,
    default: Option<Value>,
}

impl Parameter {
    /// Describes a parameter of type `T` at `position`.
    pub fn of<T: Inject>(position: usize) -> Self {
        Self::new(position, T::declared_type(), T::declared_default())
    }

    /// Describes a parameter explicitly.
    pub fn new(position: usize, declared: ParamType, default: Option<Value>) -> Self {
        Self {
            position,
            name: format!("arg{position}"),
            declared,
            default,
        }
    }

    /// Zero-based position in the parameter list.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Display name, `argN` unless set with [`Function::with_name`].
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn declared(&self) -> &ParamType {
        &self.declared
    }

    /// The declared default, if any.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The formal parameter list of a handler, plus a label identifying it.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    handler: String,
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Creates a signature.
    pub fn new(handler: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            handler: handler.into(),
            parameters,
        }
    }

    /// The handler label used in diagnostics.
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// The parameters, in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub(crate) fn set_handler(&mut self, handler: impl Into<String>) {
        self.handler = handler.into();
    }

    pub(crate) fn set_default(&mut self, position: usize, value: Value) {
        match self.parameters.get_mut(position) {
            Some(parameter) => parameter.default = Some(value),
            None => warn!(
                handler = %self.handler,
                position,
                "Default declared for a parameter that does not exist"
            ),
        }
    }

    pub(crate) fn set_name(&mut self, position: usize, name: String) {
        match self.parameters.get_mut(position) {
            Some(parameter) => parameter.name = name,
            None => warn!(
                handler = %self.handler,
                position,
                "Name declared for a parameter that does not exist"
            ),
        }
    }
}

/// Why a call did not produce an output.
#[derive(Debug)]
pub enum CallError {
    /// A resolved argument could not be converted into the parameter's type.
    Argument {
        /// Zero-based position of the parameter.
        position: usize,
        /// The Rust type the handler expects.
        expected: &'static str,
    },
    /// The handler ran and returned its own error.
    Handler(BoxError),
}

/// The type-erased body of a [`Function`].
pub type Target = Arc<dyn Fn(Vec<Argument>) -> Result<Output, CallError> + Send + Sync>;

/// A handler ready to be invoked: the callable plus its parameter metadata.
///
/// Closures and functions become a `Function` through
/// [`IntoFunction`](super::IntoFunction); controller methods become one when
/// the callable resolver binds them to a fresh instance.
#[derive(Clone)]
pub struct Function {
    signature: Signature,
    target: Target,
}

impl Function {
    /// Wraps a closure or function whose parameters all implement [`Inject`].
    pub fn new<F, T>(f: F) -> Self
    where
        F: super::IntoFunction<T>,
    {
        f.into_function()
    }

    /// Assembles a function from an explicit signature and body.
    ///
    /// Useful for handlers whose parameter list is only known at runtime.
    pub fn from_parts(signature: Signature, target: Target) -> Self {
        Self { signature, target }
    }

    /// Declares a default for the parameter at `position`.
    pub fn with_default(mut self, position: usize, value: impl Into<Value>) -> Self {
        self.signature.set_default(position, value.into());
        self
    }

    /// Names the parameter at `position`, for diagnostics.
    pub fn with_name(mut self, position: usize, name: impl Into<String>) -> Self {
        self.signature.set_name(position, name.into());
        self
    }

    /// Replaces the diagnostic label, which defaults to the closure's type name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.signature.set_handler(label);
        self
    }

    /// The parameter metadata.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The diagnostic label.
    pub fn label(&self) -> &str {
        self.signature.handler()
    }

    /// Invokes the function with positional arguments.
    pub fn call(&self, arguments: Vec<Argument>) -> Result<Output, CallError> {
        (self.target)(arguments)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Positional argument cursor used by the generated handler bodies.
pub(crate) struct Arguments {
    inner: std::vec::IntoIter<Argument>,
    position: usize,
}

impl Arguments {
    pub(crate) fn new(arguments: Vec<Argument>) -> Self {
        Self {
            inner: arguments.into_iter(),
            position: 0,
        }
    }

    pub(crate) fn take<T: Inject>(&mut self) -> Result<T, CallError> {
        let position = self.position;
        self.position += 1;
        self.inner
            .next()
            .and_then(T::from_argument)
            .ok_or(CallError::Argument {
                position,
                expected: std::any::type_name::<T>(),
            })
    }
}
