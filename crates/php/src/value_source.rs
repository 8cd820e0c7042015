//! Unresolved argument shapes
//!
//! Every expression the inference engine looks at is first classified into a
//! closed set of shapes. Resolution then matches exhaustively on the shape,
//! so supporting a new call form means adding a variant here.

use crate::common::{field_text, last_named_child, node_text, string_literal};
use std::fmt;
use tree_sitter::Node;

/// A static-style constructor call such as `AllowedFilter::exact('name')`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryCall {
    /// Class the method is called on, as written (may be qualified)
    pub factory: String,
    pub method: String,
    pub args: Vec<ValueSource>,
}

/// Shape of one expression before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// No expression at all (bare `return;`, property without default)
    Empty,
    /// `['a', 'b']` or `array('a', 'b')`
    InlineList(Vec<ValueSource>),
    /// A string literal without interpolation
    LiteralString(String),
    /// `$this->name`
    FieldRef(String),
    /// `$this->name(...)`
    MethodRef(String),
    /// `Factory::method(...)`
    FactoryCall(FactoryCall),
    /// Any other expression, tagged with its node kind
    Other(String),
}

impl ValueSource {
    /// Classify an expression node
    pub fn from_node(node: Node, source: &str) -> Self {
        let shape = match node.kind() {
            "array_creation_expression" => Self::InlineList(array_elements(node, source)),
            "string" | "encapsed_string" => match string_literal(node, source) {
                Some(value) => Self::LiteralString(value),
                None => Self::other(node),
            },
            "member_access_expression" | "nullsafe_member_access_expression" => {
                match this_member_name(node, source) {
                    Some(name) => Self::FieldRef(name.to_string()),
                    None => Self::other(node),
                }
            }
            "member_call_expression" | "nullsafe_member_call_expression" => {
                match this_member_name(node, source) {
                    Some(name) => Self::MethodRef(name.to_string()),
                    None => Self::other(node),
                }
            }
            "scoped_call_expression" => match factory_call(node, source) {
                Some(call) => Self::FactoryCall(call),
                None => Self::other(node),
            },
            "parenthesized_expression" => match last_named_child(node) {
                Some(inner) => Self::from_node(inner, source),
                None => Self::Empty,
            },
            _ => Self::other(node),
        };
        tracing::trace!(kind = node.kind(), shape = %shape, "classified expression");
        shape
    }

    /// Classify an optional expression, mapping absence to `Empty`
    pub fn from_optional(node: Option<Node>, source: &str) -> Self {
        node.map_or(Self::Empty, |n| Self::from_node(n, source))
    }

    fn other(node: Node) -> Self {
        Self::Other(node.kind().to_string())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::LiteralString(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::InlineList(items) => write!(f, "list[{}]", items.len()),
            Self::LiteralString(value) => write!(f, "'{value}'"),
            Self::FieldRef(name) => write!(f, "$this->{name}"),
            Self::MethodRef(name) => write!(f, "$this->{name}()"),
            Self::FactoryCall(call) => write!(f, "{}::{}()", call.factory, call.method),
            Self::Other(kind) => write!(f, "<{kind}>"),
        }
    }
}

/// Classify every argument of an `arguments` node, in source order
///
/// Named arguments keep their position; spread arguments and the first-class
/// callable placeholder classify as `Other`.
pub fn classify_arguments(arguments: Node, source: &str) -> Vec<ValueSource> {
    let mut cursor = arguments.walk();
    let args: Vec<ValueSource> = arguments
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .map(|child| match child.kind() {
            "argument" => ValueSource::from_optional(last_named_child(child), source),
            _ => ValueSource::other(child),
        })
        .collect();
    args
}

fn array_elements(node: Node, source: &str) -> Vec<ValueSource> {
    let mut cursor = node.walk();
    let items: Vec<ValueSource> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "array_element_initializer")
        .map(|element| ValueSource::from_optional(last_named_child(element), source))
        .collect();
    items
}

/// Member name when the receiver is `$this` and the name is a plain identifier
fn this_member_name<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    let object = node.child_by_field_name("object")?;
    if object.kind() != "variable_name" || node_text(object, source) != "$this" {
        return None;
    }
    let name = node.child_by_field_name("name")?;
    (name.kind() == "name").then(|| node_text(name, source))
}

fn factory_call(node: Node, source: &str) -> Option<FactoryCall> {
    let scope = node.child_by_field_name("scope")?;
    if !matches!(scope.kind(), "name" | "qualified_name") {
        return None;
    }
    let method = field_text(node, "name", source)?;
    let args = node
        .child_by_field_name("arguments")
        .map(|arguments| classify_arguments(arguments, source))
        .unwrap_or_default();

    Some(FactoryCall {
        factory: node_text(scope, source).to_string(),
        method: method.to_string(),
        args,
    })
}
