//! Locating capability call sites inside a handler

use crate::common::{field_text, find_first};
use crate::value_source::{classify_arguments, ValueSource};
use qbdoc_core::feature::FeatureKind;
use tree_sitter::Node;

/// A located capability-enabling call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub feature: FeatureKind,
    /// Fully qualified name of the class declaring the handler; back
    /// references are looked up in this type's unit
    pub owner_type: String,
    pub arguments: Vec<ValueSource>,
}

impl CallSite {
    pub fn new(feature: FeatureKind, owner_type: impl Into<String>, arguments: Vec<ValueSource>) -> Self {
        Self {
            feature,
            owner_type: owner_type.into(),
            arguments,
        }
    }
}

/// First call of the capability's builder method in a handler body
///
/// Calls are matched on method name alone, whatever the receiver.
pub fn find_call_site(
    handler: Node,
    source: &str,
    feature: FeatureKind,
    owner_type: &str,
) -> Option<CallSite> {
    let method_name = feature.method_name();
    let call = find_first(handler, |n| {
        matches!(
            n.kind(),
            "member_call_expression" | "nullsafe_member_call_expression"
        ) && n
            .child_by_field_name("name")
            .is_some_and(|name| name.kind() == "name")
            && field_text(n, "name", source) == Some(method_name)
    })?;

    let arguments = call
        .child_by_field_name("arguments")
        .map(|arguments| classify_arguments(arguments, source))
        .unwrap_or_default();

    Some(CallSite::new(feature, owner_type, arguments))
}
