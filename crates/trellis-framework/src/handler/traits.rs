//! Conversions from plain Rust functions into invokable handlers.
//!
//! [`IntoFunction`] is implemented for every closure or function of up to
//! sixteen parameters whose parameter types implement [`Inject`] and whose
//! return type implements [`IntoOutput`]. [`IntoAction`] does the same for
//! controller methods, taking `&C` as the receiver. Both are generated by one
//! macro, one impl per arity, in the style of Axum's handler system.
//!
//! ```rust,ignore
//! // No parameters
//! fn home() -> &'static str {
//!     "home"
//! }
//!
//! // Injected route and message
//! fn show(route: MatchedRoute, request: BoxedRequest) -> String {
//!     format!("{} {}", request.method(), route.uri())
//! }
//!
//! // Fallible handler; the error reaches the dispatcher's caller untouched
//! fn load(route: MatchedRoute) -> Result<String, std::io::Error> {
//!     std::fs::read_to_string(route.parameter("file").unwrap_or_default())
//! }
//! ```

use std::sync::Arc;

use trellis_core::{IntoOutput, Output};

use super::function::{Arguments, CallError, Function, Parameter, Signature, Target};
use crate::callable::Action;
use crate::extractor::{Argument, Inject};

/// A closure or function that can be turned into a [`Function`].
///
/// `T` is the tuple of parameter types; it only exists to keep the per-arity
/// implementations apart.
pub trait IntoFunction<T>: Send + Sync + 'static {
    /// Captures the callable together with its parameter metadata.
    fn into_function(self) -> Function;
}

/// A controller method that can be turned into an [`Action`] of `C`.
pub trait IntoAction<C, T>: Send + Sync + 'static {
    /// Captures the method together with its parameter metadata.
    fn into_action(self) -> Action<C>;
}

/// Macro to generate the handler implementations for one arity.
macro_rules! impl_handler {
    (
        $($ty:ident),*
    ) => {
        #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
        impl<F, R, $($ty,)*> IntoFunction<($($ty,)*)> for F
        where
            F: Fn($($ty,)*) -> R + Send + Sync + 'static,
            R: IntoOutput,
            $( $ty: Inject, )*
        {
            fn into_function(self) -> Function {
                let mut position = 0;
                let parameters = vec![$({
                    let parameter = Parameter::of::<$ty>(position);
                    position += 1;
                    parameter
                },)*];
                let signature = Signature::new(std::any::type_name::<F>(), parameters);

                let target: Target = Arc::new(move |arguments: Vec<Argument>| -> Result<Output, CallError> {
                    let mut arguments = Arguments::new(arguments);
                    $(
                        let $ty = arguments.take::<$ty>()?;
                    )*
                    (self)($($ty,)*).into_output().map_err(CallError::Handler)
                });

                Function::from_parts(signature, target)
            }
        }

        #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
        impl<C, F, R, $($ty,)*> IntoAction<C, ($($ty,)*)> for F
        where
            C: Send + Sync + 'static,
            F: Fn(&C, $($ty,)*) -> R + Send + Sync + 'static,
            R: IntoOutput,
            $( $ty: Inject, )*
        {
            fn into_action(self) -> Action<C> {
                let mut position = 0;
                let parameters = vec![$({
                    let parameter = Parameter::of::<$ty>(position);
                    position += 1;
                    parameter
                },)*];
                let signature = Signature::new(std::any::type_name::<F>(), parameters);

                let method = Arc::new(self);
                Action::new(signature, move |instance: Arc<C>| -> Target {
                    let method = Arc::clone(&method);
                    Arc::new(move |arguments: Vec<Argument>| -> Result<Output, CallError> {
                        let mut arguments = Arguments::new(arguments);
                        $(
                            let $ty = arguments.take::<$ty>()?;
                        )*
                        (*method)(&*instance, $($ty,)*)
                            .into_output()
                            .map_err(CallError::Handler)
                    })
                })
            }
        }
    };
}

// Generate implementations for 0-16 parameters
impl_handler!();
impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14);
impl_handler!(
    T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15
);
impl_handler!(
    T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15, T16
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ParamType;
    use serde_json::json;

    #[test]
    fn test_zero_arity() {
        let function = Function::new(|| "home");
        assert!(function.signature().parameters().is_empty());
        assert_eq!(function.call(vec![]).unwrap().to_string(), "home");
    }

    #[test]
    fn test_signature_from_types() {
        let function = Function::new(|_greeting: String, _count: Option<i64>| ());
        let params = function.signature().parameters();

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].position(), 0);
        assert_eq!(params[0].name(), "arg0");
        assert!(matches!(params[0].declared(), ParamType::Value { .. }));
        assert_eq!(params[0].default(), None);
        assert_eq!(params[1].default(), Some(&json!(null)));
    }

    #[test]
    fn test_wrong_argument_shape() {
        let function = Function::new(|count: i64| count);
        let err = function
            .call(vec![Argument::Value(json!("not a number"))])
            .unwrap_err();
        assert!(matches!(err, CallError::Argument { position: 0, .. }));
    }

    #[test]
    fn test_handler_error() {
        let function = Function::new(|| -> Result<String, std::io::Error> {
            Err(std::io::Error::other("boom"))
        });
        match function.call(vec![]) {
            Err(CallError::Handler(err)) => assert_eq!(err.to_string(), "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
