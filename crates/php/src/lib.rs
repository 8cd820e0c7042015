//! PHP front end for qbdoc
//!
//! Statically infers the query parameters a Laravel route handler accepts
//! through spatie/laravel-query-builder:
//!
//! - **Value sources**: a closed classification of call arguments
//! - **Call sites**: the `allowedIncludes`/`allowedFilters`/... call in a handler
//! - **Inference**: resolving inline lists, variadic literals and `$this` back references
//! - **Factories**: parameter names carried by `AllowedFilter::*` and `AllowedSort::*`
//! - **Doc comments**: `@queryParam` override records
//! - **Synthesis**: turning resolved values and overrides into parameter descriptors
//!

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod call_site;
pub mod common;
pub mod docblock;
pub mod extension;
pub mod factory;
pub mod inference;
pub mod loader;
pub mod synthesis;
pub mod unit;
pub mod value_source;

pub use call_site::{find_call_site, CallSite};
pub use docblock::{parse_comment, parse_overrides, DocBlock, DocTag, ParamOverride};
pub use extension::Extension;
pub use factory::{extract, FactoryFamily, ListOrigin};
pub use inference::{InferenceEngine, ResolvedValue, NOT_SUPPORTED_KEY};
pub use loader::{load_file, MemoryLoader, Psr4Loader, UnitLoader};
pub use synthesis::{apply_override, heuristic_type, Heuristic, Synthesizer};
pub use unit::{FieldDecl, MethodDecl, SourceUnit};
pub use value_source::{FactoryCall, ValueSource};
