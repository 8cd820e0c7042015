//! Value inference engine
//!
//! Turns the arguments of a capability call into the concrete parameter
//! names it allows. Arguments may be written inline, passed as variadic
//! strings, or pulled from a field or method of the controller, in which
//! case the controller's unit is loaded and inspected.

use crate::call_site::CallSite;
use crate::factory::{self, ListOrigin};
use crate::loader::UnitLoader;
use crate::value_source::ValueSource;
use std::fmt;
use tracing::{debug, warn};

/// Marker rendered for values the engine could not resolve
pub const NOT_SUPPORTED_KEY: &str = "--not_supported--";

/// Outcome of resolving one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    Value(String),
    Unsupported,
}

impl ResolvedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unsupported => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.write_str(value),
            Self::Unsupported => f.write_str(NOT_SUPPORTED_KEY),
        }
    }
}

/// Resolves call-site arguments, loading declaring units on demand
pub struct InferenceEngine<'a> {
    loader: &'a dyn UnitLoader,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(loader: &'a dyn UnitLoader) -> Self {
        Self { loader }
    }

    /// Resolve a call site into its ordered values
    ///
    /// Never fails: unrecognised shapes become `Unsupported` entries or an
    /// empty list, and failed cross-file lookups yield an empty list.
    pub fn resolve(&self, call_site: &CallSite) -> Vec<ResolvedValue> {
        let Some(first) = call_site.arguments.first() else {
            return Vec::new();
        };

        let values = match first {
            ValueSource::InlineList(items) => items
                .iter()
                .map(|item| resolve_list_element(item, ListOrigin::CallSite))
                .collect(),
            ValueSource::LiteralString(_) => call_site
                .arguments
                .iter()
                .map(|arg| match arg.as_literal() {
                    Some(value) => ResolvedValue::Value(value.to_string()),
                    None => ResolvedValue::Unsupported,
                })
                .collect(),
            ValueSource::FieldRef(name) => self.resolve_field(&call_site.owner_type, name),
            ValueSource::MethodRef(name) => self.resolve_method(&call_site.owner_type, name),
            ValueSource::Empty | ValueSource::FactoryCall(_) | ValueSource::Other(_) => {
                Vec::new()
            }
        };

        debug!(
            feature = %call_site.feature,
            shape = %first,
            values = values.len(),
            "resolved call site"
        );
        values
    }

    /// `$this->field`: literal elements of the field's list default
    ///
    /// Non-literal elements are dropped rather than reported as unsupported.
    fn resolve_field(&self, owner_type: &str, name: &str) -> Vec<ResolvedValue> {
        let unit = match self.loader.load_declaring_unit(owner_type) {
            Ok(unit) => unit,
            Err(e) => {
                warn!(owner_type, field = name, error = %e, "declaring unit unavailable");
                return Vec::new();
            }
        };

        let Some(field) = unit.find_field(name) else {
            warn!(owner_type, field = name, "field not declared");
            return Vec::new();
        };

        match field.default {
            ValueSource::InlineList(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    ValueSource::LiteralString(value) => Some(ResolvedValue::Value(value)),
                    _ => None,
                })
                .collect(),
            other => {
                warn!(owner_type, field = name, default = %other, "field default is not a list");
                Vec::new()
            }
        }
    }

    /// `$this->method()`: elements of the list the method first returns
    fn resolve_method(&self, owner_type: &str, name: &str) -> Vec<ResolvedValue> {
        let unit = match self.loader.load_declaring_unit(owner_type) {
            Ok(unit) => unit,
            Err(e) => {
                warn!(owner_type, method = name, error = %e, "declaring unit unavailable");
                return Vec::new();
            }
        };

        let Some(method) = unit.find_method_decl(name) else {
            warn!(owner_type, method = name, "method not declared");
            return Vec::new();
        };

        match method.first_return {
            Some(ValueSource::InlineList(items)) => items
                .iter()
                .map(|item| resolve_list_element(item, ListOrigin::MethodReturn))
                .collect(),
            Some(other) => {
                warn!(owner_type, method = name, returned = %other, "method does not return a list");
                Vec::new()
            }
            None => {
                debug!(owner_type, method = name, "method has no return statement");
                Vec::new()
            }
        }
    }
}

/// Element of an inline list: literal, factory call, or unsupported
fn resolve_list_element(item: &ValueSource, origin: ListOrigin) -> ResolvedValue {
    match item {
        ValueSource::LiteralString(value) => ResolvedValue::Value(value.clone()),
        ValueSource::FactoryCall(call) => factory::extract(call, origin),
        ValueSource::Empty
        | ValueSource::InlineList(_)
        | ValueSource::FieldRef(_)
        | ValueSource::MethodRef(_)
        | ValueSource::Other(_) => ResolvedValue::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use crate::value_source::FactoryCall;
    use pretty_assertions::assert_eq;
    use qbdoc_core::feature::FeatureKind;

    const OWNER: &str = "App\\Http\\Controllers\\PostController";

    const CONTROLLER: &str = r#"<?php
namespace App\Http\Controllers;

class PostController
{
    protected $includes = ['a', 'b', 'c'];
    protected $mixed = ['a', self::OTHER, 'c'];
    protected $scalar = 'a';

    public function sorts()
    {
        return ['x', 'y'];
    }

    public function filters()
    {
        return [
            'name',
            AllowedFilter::exact('id'),
            AllowedFilter::scope($scope),
            $other,
        ];
    }

    public function scopes()
    {
        return [AllowedFilter::scope('active'), AllowedFilter::partial('title')];
    }

    public function nothing()
    {
        $x = ['unused'];
    }

    public function scalar()
    {
        return 'x';
    }
}
"#;

    fn loader() -> MemoryLoader {
        MemoryLoader::new().with_unit(OWNER, CONTROLLER)
    }

    fn site(arguments: Vec<ValueSource>) -> CallSite {
        CallSite::new(FeatureKind::Filter, OWNER, arguments)
    }

    fn lit(value: &str) -> ValueSource {
        ValueSource::LiteralString(value.to_string())
    }

    fn values(items: &[&str]) -> Vec<ResolvedValue> {
        items
            .iter()
            .map(|v| ResolvedValue::Value(v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_arguments() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        assert_eq!(engine.resolve(&site(Vec::new())), Vec::<ResolvedValue>::new());
    }

    #[test]
    fn test_inline_list_preserves_order() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        let resolved = engine.resolve(&site(vec![ValueSource::InlineList(vec![
            lit("posts"),
            lit("posts.author"),
            lit("books"),
        ])]));
        assert_eq!(resolved, values(&["posts", "posts.author", "books"]));
    }

    #[test]
    fn test_inline_list_with_factories_and_unsupported() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        let resolved = engine.resolve(&site(vec![ValueSource::InlineList(vec![
            ValueSource::FactoryCall(FactoryCall {
                factory: "AllowedFilter".to_string(),
                method: "partial".to_string(),
                args: vec![lit("title")],
            }),
            ValueSource::Other("variable_name".to_string()),
        ])]));
        assert_eq!(
            resolved,
            vec![
                ResolvedValue::Value("title".to_string()),
                ResolvedValue::Unsupported
            ]
        );
    }

    #[test]
    fn test_variadic_literals() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        let resolved = engine.resolve(&site(vec![
            lit("title"),
            ValueSource::Other("variable_name".to_string()),
            lit("id"),
        ]));
        assert_eq!(
            resolved,
            vec![
                ResolvedValue::Value("title".to_string()),
                ResolvedValue::Unsupported,
                ResolvedValue::Value("id".to_string()),
            ]
        );
    }

    #[test]
    fn test_field_back_reference() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        let resolved = engine.resolve(&site(vec![ValueSource::FieldRef("includes".to_string())]));
        assert_eq!(resolved, values(&["a", "b", "c"]));
    }

    // Known inconsistency: the field path drops non-literal elements while the
    // method path reports them as Unsupported.
    #[test]
    fn test_field_back_reference_drops_non_literals() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        let resolved = engine.resolve(&site(vec![ValueSource::FieldRef("mixed".to_string())]));
        assert_eq!(resolved, values(&["a", "c"]));
    }

    #[test]
    fn test_field_back_reference_requires_list_default() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        assert_eq!(
            engine.resolve(&site(vec![ValueSource::FieldRef("scalar".to_string())])),
            Vec::<ResolvedValue>::new()
        );
        assert_eq!(
            engine.resolve(&site(vec![ValueSource::FieldRef("missing".to_string())])),
            Vec::<ResolvedValue>::new()
        );
    }

    #[test]
    fn test_method_back_reference() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        let resolved = engine.resolve(&site(vec![ValueSource::MethodRef("sorts".to_string())]));
        assert_eq!(resolved, values(&["x", "y"]));
    }

    #[test]
    fn test_method_back_reference_marks_unsupported() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        let resolved = engine.resolve(&site(vec![ValueSource::MethodRef("filters".to_string())]));
        assert_eq!(
            resolved,
            vec![
                ResolvedValue::Value("name".to_string()),
                ResolvedValue::Value("id".to_string()),
                ResolvedValue::Unsupported,
                ResolvedValue::Unsupported,
            ]
        );
    }

    #[test]
    fn test_scope_factory_only_resolves_inline() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        let scope = ValueSource::FactoryCall(FactoryCall {
            factory: "AllowedFilter".to_string(),
            method: "scope".to_string(),
            args: vec![lit("active")],
        });
        assert_eq!(
            engine.resolve(&site(vec![ValueSource::InlineList(vec![scope])])),
            values(&["active"])
        );
        assert_eq!(
            engine.resolve(&site(vec![ValueSource::MethodRef("scopes".to_string())])),
            vec![
                ResolvedValue::Unsupported,
                ResolvedValue::Value("title".to_string()),
            ]
        );
    }

    #[test]
    fn test_method_back_reference_degrades_to_empty() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        for name in ["nothing", "scalar", "missing"] {
            assert_eq!(
                engine.resolve(&site(vec![ValueSource::MethodRef(name.to_string())])),
                Vec::<ResolvedValue>::new(),
                "{name}"
            );
        }
    }

    #[test]
    fn test_missing_unit_degrades_to_empty() {
        let loader = MemoryLoader::new();
        let engine = InferenceEngine::new(&loader);
        assert_eq!(
            engine.resolve(&site(vec![ValueSource::FieldRef("includes".to_string())])),
            Vec::<ResolvedValue>::new()
        );
        assert_eq!(
            engine.resolve(&site(vec![ValueSource::MethodRef("sorts".to_string())])),
            Vec::<ResolvedValue>::new()
        );
    }

    #[test]
    fn test_other_first_argument_is_empty() {
        let loader = loader();
        let engine = InferenceEngine::new(&loader);
        assert_eq!(
            engine.resolve(&site(vec![ValueSource::Other("variable_name".to_string())])),
            Vec::<ResolvedValue>::new()
        );
        assert_eq!(
            engine.resolve(&site(vec![ValueSource::FactoryCall(FactoryCall {
                factory: "AllowedFilter".to_string(),
                method: "exact".to_string(),
                args: vec![lit("id")],
            })])),
            Vec::<ResolvedValue>::new()
        );
    }

    #[test]
    fn test_unsupported_renders_marker() {
        assert_eq!(ResolvedValue::Unsupported.to_string(), NOT_SUPPORTED_KEY);
        assert_eq!(ResolvedValue::Value("id".to_string()).as_str(), Some("id"));
    }
}
