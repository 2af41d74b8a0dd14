//! Handler system for the Trellis framework.
//!
//! A handler is any Rust closure or function whose parameters implement
//! [`Inject`](crate::extractor::Inject) and whose return type implements
//! [`IntoOutput`](trellis_core::IntoOutput):
//!
//! - **Function** ([`function`]) – [`Function`], the invokable form of a
//!   handler: a type-erased body plus its [`Signature`], the parameter
//!   metadata the argument resolver works from
//! - **Traits** ([`traits`]) – [`IntoFunction`] and [`IntoAction`], generated
//!   for closures and controller methods of every arity up to sixteen
//!
//! # Declared defaults
//!
//! Rust parameters carry no default values, so defaults are declared on the
//! function by position:
//!
//! ```rust,ignore
//! let greet = Function::new(|greeting: String| greeting).with_default(0, "Hello");
//! ```

pub mod function;
pub mod traits;

pub use function::{CallError, Function, Parameter, Signature, Target};
pub use traits::{IntoAction, IntoFunction};
