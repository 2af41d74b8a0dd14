//! The argument resolver.
//!
//! Supplies a value for every formal parameter of a handler, in declaration
//! order, from the closed set of injectable sources:
//!
//! 1. the matched route, for parameters declared as the route type;
//! 2. the inbound message, for parameters declared as the message interface
//!    or as the message's concrete type;
//! 3. the parameter's declared default;
//!
//! and fails otherwise. Parameter names play no part.

use std::any::Any;

use crate::context::RequestContext;
use crate::error::InvalidCallableError;
use crate::extractor::{Argument, ParamType};
use crate::handler::{Parameter, Signature};

/// Resolves the positional arguments for a handler.
///
/// Pure: the result depends only on `signature` and `ctx`.
pub fn resolve_arguments(
    signature: &Signature,
    ctx: &RequestContext,
) -> Result<Vec<Argument>, InvalidCallableError> {
    signature
        .parameters()
        .iter()
        .map(|parameter| resolve_one(signature, parameter, ctx))
        .collect()
}

fn resolve_one(
    signature: &Signature,
    parameter: &Parameter,
    ctx: &RequestContext,
) -> Result<Argument, InvalidCallableError> {
    match parameter.declared() {
        ParamType::Route => return Ok(Argument::Route(ctx.route().clone())),
        ParamType::Message => return Ok(Argument::Message(ctx.request().clone())),
        ParamType::Concrete { type_id, .. } => {
            if Any::type_id(ctx.request().as_any()) == *type_id {
                return Ok(Argument::Message(ctx.request().clone()));
            }
        }
        ParamType::Value { .. } => {}
    }

    parameter
        .default()
        .map(|value| Argument::Value(value.clone()))
        .ok_or_else(|| InvalidCallableError::UnresolvableParameter {
            handler: signature.handler().to_string(),
            position: parameter.position(),
            name: parameter.name().to_string(),
            declared: parameter.declared().to_string(),
        })
}
