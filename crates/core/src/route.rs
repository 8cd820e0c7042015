//! Route action parsing

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Information about a documented route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Controller action in `Fully\Qualified\Controller@method` form
    pub uses: String,
}

impl RouteInfo {
    pub fn new(uses: impl Into<String>) -> Self {
        Self { uses: uses.into() }
    }

    /// Split the action into controller class and handler method
    pub fn controller_and_method(&self) -> Result<(&str, &str)> {
        match self.uses.split_once('@') {
            Some((class, method)) if !class.is_empty() && !method.is_empty() => {
                Ok((class.trim_start_matches('\\'), method))
            }
            _ => Err(Error::invalid_route(format!(
                "expected Controller@method, got '{}'",
                self.uses
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_and_method() {
        let route = RouteInfo::new("\\App\\Http\\Controllers\\PostController@index");
        let (class, method) = route.controller_and_method().expect("valid action");
        assert_eq!(class, "App\\Http\\Controllers\\PostController");
        assert_eq!(method, "index");
    }

    #[test]
    fn test_invalid_actions() {
        assert!(RouteInfo::new("PostController").controller_and_method().is_err());
        assert!(RouteInfo::new("@index").controller_and_method().is_err());
        assert!(RouteInfo::new("PostController@").controller_and_method().is_err());
    }
}
