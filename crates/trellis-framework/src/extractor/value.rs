//! Plain value parameters.
//!
//! These types have no injectable source; they can only be bound from a
//! declared default, which is converted with `serde`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::inject::{Argument, Inject, ParamType};

fn from_default<T: DeserializeOwned>(argument: Argument) -> Option<T> {
    match argument {
        Argument::Value(value) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

macro_rules! impl_value_inject {
    ($($ty:ty),*) => {
        $(
            impl Inject for $ty {
                fn declared_type() -> ParamType {
                    ParamType::Value {
                        type_name: std::any::type_name::<$ty>(),
                    }
                }

                fn from_argument(argument: Argument) -> Option<Self> {
                    from_default(argument)
                }
            }
        )*
    };
}

impl_value_inject!(String, bool, i32, i64, u32, u64, usize, f64, Vec<String>);

impl Inject for Value {
    fn declared_type() -> ParamType {
        ParamType::Value { type_name: "Value" }
    }

    fn from_argument(argument: Argument) -> Option<Self> {
        match argument {
            Argument::Value(value) => Some(value),
            _ => None,
        }
    }
}
