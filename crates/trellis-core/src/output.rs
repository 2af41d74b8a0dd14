//! Handler return values.
//!
//! A handler may return anything implementing [`IntoOutput`]. The value is
//! normalised into an [`Output`], which the publisher writes to the outbound
//! channel.

use std::fmt;

use serde_json::Value;

use crate::error::BoxError;

/// The value produced by a handler and handed to the publisher.
///
/// Strings render as-is, `null` renders as nothing, and every other value
/// renders as compact JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output(Value);

impl Output {
    /// Wraps a value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// An output with nothing to publish.
    pub fn empty() -> Self {
        Self(Value::Null)
    }

    /// Returns `true` when there is nothing to publish.
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }

    /// Returns the wrapped value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Returns the wrapped value, consuming the output.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Conversion of a handler's return value into an [`Output`].
///
/// `Result` returns are supported: an `Err` becomes the handler error, which
/// the dispatcher hands back to its caller untouched.
pub trait IntoOutput {
    /// Converts this value into an output, or the handler's own error.
    fn into_output(self) -> Result<Output, BoxError>;
}

impl IntoOutput for Output {
    fn into_output(self) -> Result<Output, BoxError> {
        Ok(self)
    }
}

impl IntoOutput for () {
    fn into_output(self) -> Result<Output, BoxError> {
        Ok(Output::empty())
    }
}

impl IntoOutput for &'static str {
    fn into_output(self) -> Result<Output, BoxError> {
        Ok(Output::new(self))
    }
}

macro_rules! impl_into_output {
    ($($ty:ty),*) => {
        $(
            impl IntoOutput for $ty {
                fn into_output(self) -> Result<Output, BoxError> {
                    Ok(Output::new(self))
                }
            }
        )*
    };
}

impl_into_output!(String, Value, bool, i32, i64, u32, u64, usize, f64);

/// `None` publishes nothing.
impl<T: IntoOutput> IntoOutput for Option<T> {
    fn into_output(self) -> Result<Output, BoxError> {
        match self {
            Some(value) => value.into_output(),
            None => Ok(Output::empty()),
        }
    }
}

impl<T, E> IntoOutput for Result<T, E>
where
    T: IntoOutput,
    E: Into<BoxError>,
{
    fn into_output(self) -> Result<Output, BoxError> {
        self.map_err(Into::into)?.into_output()
    }
}
