//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every template so authoring errors surface at load time
//! - Detect duplicate route names and duplicate templates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{Route, RouteError};

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("route #{index} has an invalid template: {source}")]
    InvalidTemplate {
        index: usize,
        #[source]
        source: RouteError,
    },

    #[error("duplicate route name \"{0}\"")]
    DuplicateName(String),

    #[error("duplicate route template \"{0}\"")]
    DuplicateTemplate(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut templates = HashSet::new();

    for (index, route) in config.routes.iter().enumerate() {
        match Route::new(&route.path) {
            Ok(compiled) => {
                if !templates.insert(compiled.original().to_string()) {
                    errors.push(ValidationError::DuplicateTemplate(
                        compiled.original().to_string(),
                    ));
                }
            }
            Err(source) => errors.push(ValidationError::InvalidTemplate { index, source }),
        }

        if !names.insert(route.name()) {
            errors.push(ValidationError::DuplicateName(route.name().to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn route(name: Option<&str>, path: &str) -> RouteConfig {
        RouteConfig {
            name: name.map(str::to_string),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = RouterConfig {
            routes: vec![route(Some("home"), "/"), route(None, "/books/{id:[0-9]+}")],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = RouterConfig {
            routes: vec![
                route(Some("a"), "/a"),
                route(Some("a"), "/b"),
                route(Some("c"), "/users/{id"),
                route(Some("d"), "/a/"),
            ],
            ..Default::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::DuplicateName(ref n) if n == "a"));
        assert!(matches!(errors[1], ValidationError::InvalidTemplate { index: 2, .. }));
        assert!(matches!(errors[2], ValidationError::DuplicateTemplate(ref t) if t == "/a"));
    }
}
