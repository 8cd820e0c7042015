//! Tree-sitter helpers shared by the PHP analysis modules

use tree_sitter::Node;

/// Borrow the source text covered by a node, or `""` if the range is invalid
pub fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Text of a named field child
pub fn field_text<'s>(node: Node, field: &str, source: &'s str) -> Option<&'s str> {
    node.child_by_field_name(field).map(|n| node_text(n, source))
}

/// First node in pre-order (the node itself included) matching a predicate
pub fn find_first<'t, F>(root: Node<'t>, mut predicate: F) -> Option<Node<'t>>
where
    F: FnMut(Node<'t>) -> bool,
{
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if predicate(node) {
            return Some(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Every node in pre-order (the node itself included) matching a predicate
pub fn find_all<'t, F>(root: Node<'t>, mut predicate: F) -> Vec<Node<'t>>
where
    F: FnMut(Node<'t>) -> bool,
{
    let mut found = Vec::new();
    find_first(root, |node| {
        if predicate(node) {
            found.push(node);
        }
        false
    });
    found
}

/// Last named child, skipping comments
///
/// Argument and array element nodes carry an optional name/key before the
/// value expression, so the value is always the trailing named child.
pub fn last_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let last = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .last();
    last
}

/// Last segment of a possibly qualified PHP name (`\A\B\C` -> `C`)
pub fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

/// Decode a PHP string literal node into its value
///
/// Single-quoted strings and double-quoted strings without interpolation are
/// literals. Anything else (interpolated strings, heredocs) returns `None`.
pub fn string_literal(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" => {
            let inner = strip_quotes(node_text(node, source), '\'')?;
            Some(unescape_single_quoted(inner))
        }
        "encapsed_string" => {
            let mut cursor = node.walk();
            let interpolated = node
                .named_children(&mut cursor)
                .any(|child| !is_literal_fragment(child.kind()));
            if interpolated {
                return None;
            }
            let inner = strip_quotes(node_text(node, source), '"')?;
            Some(unescape_double_quoted(inner))
        }
        _ => None,
    }
}

fn is_literal_fragment(kind: &str) -> bool {
    matches!(
        kind,
        "string_content" | "string_value" | "string" | "escape_sequence"
    )
}

fn strip_quotes(text: &str, quote: char) -> Option<&str> {
    let text = text
        .strip_prefix('b')
        .or_else(|| text.strip_prefix('B'))
        .unwrap_or(text);
    text.strip_prefix(quote)?.strip_suffix(quote)
}

fn unescape_single_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == '\'' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn unescape_double_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.peek() {
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some('r') => Some('\r'),
            Some('v') => Some('\u{0B}'),
            Some('e') => Some('\u{1B}'),
            Some('f') => Some('\u{0C}'),
            Some('\\') => Some('\\'),
            Some('$') => Some('$'),
            Some('"') => Some('"'),
            _ => None,
        };
        match decoded {
            Some(d) => {
                out.push(d);
                chars.next();
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use tree_sitter::{Parser, Tree};

    /// Parse PHP source for node-level tests
    pub fn parse_php(source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .expect("Failed to set PHP language");
        parser.parse(source, None).expect("Failed to parse source")
    }
}
