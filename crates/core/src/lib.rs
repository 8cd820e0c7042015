//! Core types for qbdoc
//!
//! This crate provides the foundational abstractions shared by the PHP
//! analyzer and the command line host:
//!
//! - **Features**: the four query builder capabilities and their parameter keys
//! - **Descriptors**: emission-ready parameter metadata
//! - **OpenAPI**: the operation/parameter/schema objects parameters are attached to
//! - **Hooks**: host callbacks that can veto a parameter
//! - **Configuration**: parameter keys, annotation tag, synthesis options
//! - **Error handling**: unified error types
//!

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod feature;
pub mod hooks;
pub mod openapi;
pub mod route;

// Re-export main types for convenience
pub use config::{AnnotationsConfig, AutoloadRoot, Config, ParameterKeys, SynthesisConfig};
pub use descriptor::{ParameterDescriptor, ValueType};
pub use error::{Error, Result, ResultExt};
pub use feature::{features, Feature, FeatureKind};
pub use hooks::{Hook, HookRegistry};
pub use openapi::{Operation, Parameter, Schema};
pub use route::RouteInfo;

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
