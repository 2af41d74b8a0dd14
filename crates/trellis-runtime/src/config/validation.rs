//! Configuration validation utilities.

use std::collections::HashSet;

use http::Method;
use serde_json::Value;
use trellis_framework::RouteMethod;

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, RouteConfig, RouterConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &RouterConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_routes_config(&config.routes)?;
    Ok(())
}

/// Parses a configured method. `ANY` (any case) accepts every method.
pub fn parse_method(method: &str) -> ConfigResult<RouteMethod> {
    if method.eq_ignore_ascii_case("any") {
        return Ok(RouteMethod::Any);
    }

    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map(RouteMethod::Only)
        .map_err(|_| ConfigError::InvalidMethod(method.to_string()))
}

/// Validates logging configuration.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    for module in logging.filters.keys() {
        if module.is_empty() || module.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid log filter target: {module:?}"
            )));
        }
    }

    Ok(())
}

/// Validates all route declarations.
pub(crate) fn validate_routes_config(routes: &[RouteConfig]) -> ConfigResult<()> {
    let mut seen_names = HashSet::new();

    for route in routes {
        if let Some(name) = &route.name
            && !seen_names.insert(name)
        {
            return Err(ConfigError::DuplicateRouteName(name.clone()));
        }

        validate_route_config(route)?;
    }

    Ok(())
}

/// Validates a single route declaration.
fn validate_route_config(route: &RouteConfig) -> ConfigResult<()> {
    parse_method(&route.method)?;

    if route.path.is_empty() {
        return Err(ConfigError::missing_field("route.path"));
    }

    if !route.path.starts_with('/') {
        return Err(ConfigError::validation(format!(
            "Route path must start with '/': {}",
            route.path
        )));
    }

    validate_handler(&route.handler)
}

/// A handler must be `"Class@method"` or `["Class", "method"]`.
fn validate_handler(handler: &Value) -> ConfigResult<()> {
    match handler {
        Value::String(reference) if reference.is_empty() => {
            Err(ConfigError::missing_field("route.handler"))
        }
        Value::String(reference) => match reference.split_once('@') {
            Some((class, method)) if !class.is_empty() && !method.is_empty() => Ok(()),
            _ => Err(ConfigError::validation(format!(
                "Handler must look like 'Class@method': {reference}"
            ))),
        },
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(class), Value::String(method)]
                if !class.is_empty() && !method.is_empty() =>
            {
                Ok(())
            }
            _ => Err(ConfigError::validation(format!(
                "Handler pair must be [\"Class\", \"method\"]: {handler}"
            ))),
        },
        other => Err(ConfigError::validation(format!(
            "Handler is not a reference: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route(method: &str, path: &str, handler: Value, name: Option<&str>) -> RouteConfig {
        RouteConfig {
            method: method.to_string(),
            path: path.to_string(),
            handler,
            name: name.map(str::to_string),
            domain: None,
        }
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("get").unwrap(), RouteMethod::Only(Method::GET));
        assert_eq!(parse_method("Any").unwrap(), RouteMethod::Any);
        assert!(matches!(
            parse_method("NOT A METHOD"),
            Err(ConfigError::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_valid_config() {
        let config = RouterConfig {
            routes: vec![
                route("GET", "/", json!("HomeController@index"), Some("home")),
                route("post", "/users", json!(["UserController", "store"]), None),
            ],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_route_name() {
        let routes = vec![
            route("GET", "/", json!("A@b"), Some("home")),
            route("GET", "/home", json!("A@c"), Some("home")),
        ];
        assert!(matches!(
            validate_routes_config(&routes),
            Err(ConfigError::DuplicateRouteName(name)) if name == "home"
        ));
    }

    #[test]
    fn test_bad_handlers() {
        for handler in [json!(""), json!("NoMethod"), json!(["OnlyClass"]), json!(666)] {
            let routes = vec![route("GET", "/", handler, None)];
            assert!(validate_routes_config(&routes).is_err());
        }
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = RouterConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));
    }
}
