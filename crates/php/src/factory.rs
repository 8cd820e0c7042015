//! Static factory value extraction
//!
//! Rule objects built with `AllowedFilter::*` and `AllowedSort::*` carry the
//! public parameter name at a fixed argument position that depends on the
//! construction method. `AllowedFilter::scope` is only understood inside a
//! list written at the call site.

use crate::common::short_name;
use crate::inference::ResolvedValue;
use crate::value_source::{FactoryCall, ValueSource};

/// Where the list holding a factory call was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrigin {
    /// Inline argument of the capability call
    CallSite,
    /// List returned by a `$this->method()` back reference
    MethodReturn,
}

/// Factory classes whose construction methods are understood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryFamily {
    /// `Spatie\QueryBuilder\AllowedFilter`
    AllowedFilter,
    /// `Spatie\QueryBuilder\AllowedSort`
    AllowedSort,
}

impl FactoryFamily {
    /// Match a class name as written, ignoring any namespace qualification
    pub fn from_class_name(name: &str) -> Option<Self> {
        match short_name(name) {
            "AllowedFilter" => Some(Self::AllowedFilter),
            "AllowedSort" => Some(Self::AllowedSort),
            _ => None,
        }
    }

    /// Argument position holding the parameter name for a construction method
    pub fn name_position(self, method: &str, origin: ListOrigin) -> Option<usize> {
        match (self, method) {
            (
                Self::AllowedFilter,
                "custom" | "partial" | "exact" | "beginsWithStrict" | "endsWithStrict"
                | "callback",
            ) => Some(0),
            (Self::AllowedFilter, "scope") if origin == ListOrigin::CallSite => Some(0),
            (Self::AllowedFilter, "autoDetect") => Some(1),
            (Self::AllowedSort, "callback" | "field") => Some(0),
            _ => None,
        }
    }
}

/// Extract the logical parameter name from a factory call
///
/// Unknown families, unknown methods, missing arguments and non-literal
/// arguments all yield `Unsupported`.
pub fn extract(call: &FactoryCall, origin: ListOrigin) -> ResolvedValue {
    let Some(position) = FactoryFamily::from_class_name(&call.factory)
        .and_then(|family| family.name_position(&call.method, origin))
    else {
        return ResolvedValue::Unsupported;
    };

    match call.args.get(position) {
        Some(ValueSource::LiteralString(name)) => ResolvedValue::Value(name.clone()),
        _ => ResolvedValue::Unsupported,
    }
}
