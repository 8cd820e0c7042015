//! Parsed PHP source units
//!
//! A `SourceUnit` owns one file's text and syntax tree and answers the
//! narrow questions the rest of the crate asks about it: where a handler
//! method is, what a field defaults to, what a method first returns, and
//! which doc comment sits on top of a declaration.

use crate::common::{field_text, find_all, find_first, last_named_child, node_text, short_name};
use crate::value_source::ValueSource;
use qbdoc_core::error::{Error, Result};
use tree_sitter::{Node, Parser, Tree};

/// A field declaration found in a declaring unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name without the leading `$`
    pub name: String,
    /// Shape of the declared default value, `Empty` when there is none
    pub default: ValueSource,
}

/// A method declaration found in a declaring unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    /// Shape of the first `return` expression in the body, `None` when the
    /// body contains no return statement
    pub first_return: Option<ValueSource>,
}

/// One parsed PHP file
pub struct SourceUnit {
    label: String,
    source: String,
    tree: Tree,
}

impl SourceUnit {
    /// Parse PHP source text; `label` names the unit in errors and logs
    pub fn parse(label: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let source = source.into();

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .map_err(|e| Error::parse(&label, format!("Failed to load PHP grammar: {e}")))?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| Error::parse(&label, "Parser returned no tree"))?;

        Ok(Self {
            label,
            source,
            tree,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Fully qualified names of every class declared in the unit
    pub fn declared_classes(&self) -> Vec<String> {
        let namespace = find_first(self.root(), |n| n.kind() == "namespace_definition")
            .and_then(|ns| field_text(ns, "name", &self.source))
            .map(|ns| ns.trim_matches('\\').to_string());

        find_all(self.root(), |n| n.kind() == "class_declaration")
            .into_iter()
            .filter_map(|class| field_text(class, "name", &self.source))
            .map(|name| match &namespace {
                Some(ns) if !ns.is_empty() => format!("{ns}\\{name}"),
                _ => name.to_string(),
            })
            .collect()
    }

    /// The `class_declaration` node for a (possibly qualified) class name
    pub fn find_class(&self, class_name: &str) -> Option<Node<'_>> {
        let wanted = short_name(class_name);
        find_first(self.root(), |n| {
            n.kind() == "class_declaration"
                && field_text(n, "name", &self.source) == Some(wanted)
        })
    }

    /// First method declaration with the given name, anywhere in the unit
    pub fn find_method(&self, name: &str) -> Option<Node<'_>> {
        find_method_in(self.root(), name, &self.source)
    }

    /// Locate a route handler method
    ///
    /// The search is scoped to the named class when the unit declares it and
    /// falls back to the whole unit otherwise.
    pub fn handler(&self, class_name: Option<&str>, method: &str) -> Option<Node<'_>> {
        let scope = class_name
            .and_then(|class| self.find_class(class))
            .unwrap_or_else(|| self.root());
        find_method_in(scope, method, &self.source)
    }

    /// First property element named `$name`
    pub fn find_field(&self, name: &str) -> Option<FieldDecl> {
        let variable = format!("${name}");
        let element = find_first(self.root(), |n| {
            n.kind() == "property_element"
                && property_variable(n).map(|v| node_text(v, &self.source))
                    == Some(variable.as_str())
        })?;

        Some(FieldDecl {
            name: name.to_string(),
            default: ValueSource::from_optional(property_default(element), &self.source),
        })
    }

    /// Method declaration together with its first return expression
    pub fn find_method_decl(&self, name: &str) -> Option<MethodDecl> {
        let method = self.find_method(name)?;
        let first_return = method
            .child_by_field_name("body")
            .and_then(|body| find_first(body, |n| n.kind() == "return_statement"))
            .map(|ret| ValueSource::from_optional(last_named_child(ret), &self.source));

        Some(MethodDecl {
            name: name.to_string(),
            first_return,
        })
    }

    /// Doc comment (`/** ... */`) directly above a declaration
    ///
    /// Plain comments between the doc comment and the declaration are skipped.
    pub fn doc_comment(&self, declaration: Node) -> Option<String> {
        let mut sibling = declaration.prev_sibling();
        while let Some(node) = sibling {
            if node.kind() != "comment" {
                break;
            }
            let text = node_text(node, &self.source);
            if text.starts_with("/**") {
                return Some(text.to_string());
            }
            sibling = node.prev_sibling();
        }
        None
    }
}

impl std::fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceUnit")
            .field("label", &self.label)
            .field("bytes", &self.source.len())
            .finish()
    }
}

fn find_method_in<'t>(scope: Node<'t>, name: &str, source: &str) -> Option<Node<'t>> {
    find_first(scope, |n| {
        n.kind() == "method_declaration" && field_text(n, "name", source) == Some(name)
    })
}

fn property_variable(element: Node) -> Option<Node> {
    if let Some(name) = element.child_by_field_name("name") {
        return Some(name);
    }
    let mut cursor = element.walk();
    let variable = element
        .named_children(&mut cursor)
        .find(|child| child.kind() == "variable_name");
    variable
}

/// Default value expression of a property element
///
/// Grammar versions differ: newer ones expose a `default_value` field, older
/// ones wrap the expression in a `property_initializer` node.
fn property_default(element: Node) -> Option<Node> {
    if let Some(value) = element.child_by_field_name("default_value") {
        return Some(value);
    }

    let mut cursor = element.walk();
    let initializer = element
        .named_children(&mut cursor)
        .find(|child| child.kind() == "property_initializer");
    if let Some(initializer) = initializer {
        return last_named_child(initializer);
    }

    let variable = property_variable(element)?;
    last_named_child(element).filter(|last| last.id() != variable.id())
}
