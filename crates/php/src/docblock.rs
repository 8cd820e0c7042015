//! Documentation comment parsing
//!
//! A doc comment is split into a summary and an ordered list of tags. Tags
//! named after the configured override tag (`@queryParam` by default) are
//! then parsed into [`ParamOverride`] records:
//!
//! ```text
//! @queryParam integer filter[user_id] Owner of the post @example 7, 12 @enum 7, 12, 19
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// `<type> <name>` at the start of a tag value
static HEAD_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\w+(?:\[\])?)\s+([\w.]+(?:\[[\w.]*\])*)").ok());
/// `@example value`, `@example "quoted value"` or `@example a, b`
static EXAMPLE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"@example\s+("[^"]*"|'[^']*'|[^\s@,]+(?:\s*,\s*[^\s@,]+)*)"#).ok());
/// `@enum a, b, c` up to the next annotation
static ENUM_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"@enum\s+([^@]*)").ok());

/// Sub-annotations that continue the current tag instead of opening a new one
const INLINE_TAGS: [&str; 2] = ["@example", "@enum"];

/// One `@name value` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name including the leading `@`
    pub name: String,
    pub value: String,
}

/// A parsed doc comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub summary: String,
    pub tags: Vec<DocTag>,
}

impl DocBlock {
    /// Parse a raw `/** ... */` comment
    pub fn parse(raw: &str) -> Self {
        let body = raw.trim();
        let body = body.strip_prefix("/**").unwrap_or(body);
        let body = body.strip_suffix("*/").unwrap_or(body);

        let mut summary: Vec<&str> = Vec::new();
        let mut tags: Vec<DocTag> = Vec::new();

        for line in body.lines() {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line).trim();
            if line.is_empty() {
                continue;
            }

            let opens_tag = line.starts_with('@')
                && !(INLINE_TAGS.iter().any(|inline| starts_with_tag(line, inline))
                    && !tags.is_empty());

            if opens_tag {
                let (name, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                tags.push(DocTag {
                    name: name.to_string(),
                    value: value.trim().to_string(),
                });
            } else if let Some(tag) = tags.last_mut() {
                if !tag.value.is_empty() {
                    tag.value.push('\n');
                }
                tag.value.push_str(line);
            } else {
                summary.push(line);
            }
        }

        Self {
            summary: summary.join("\n"),
            tags,
        }
    }

    /// Tags with the given name, in comment order
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }
}

fn starts_with_tag(line: &str, tag: &str) -> bool {
    line.strip_prefix(tag)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// Per-parameter metadata declared in a doc comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamOverride {
    pub type_name: Option<String>,
    /// Either the full query key (`filter[user_id]`) or the bare value name
    pub name: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<String>,
    pub enum_values: Vec<String>,
}

impl ParamOverride {
    /// Parse the value of one override tag
    ///
    /// Never fails; text without a `<type> <name>` head still yields a
    /// record, with those fields unset.
    pub fn parse(value: &str) -> Self {
        let text = collapse_whitespace(value);

        let head = HEAD_PATTERN.as_ref().and_then(|re| re.captures(&text));
        let type_name = head
            .as_ref()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        let name = head
            .as_ref()
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().to_string());
        let head_len = head
            .as_ref()
            .and_then(|caps| caps.get(0))
            .map_or(0, |m| m.end());

        let mut examples = Vec::new();
        if let Some(re) = EXAMPLE_PATTERN.as_ref() {
            for caps in re.captures_iter(&text) {
                let Some(raw) = caps.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                match unquote(raw) {
                    Some(quoted) => examples.push(quoted.to_string()),
                    None => examples.extend(split_list(raw)),
                }
            }
        }

        let enum_values = ENUM_PATTERN
            .as_ref()
            .map(|re| {
                re.captures_iter(&text)
                    .filter_map(|caps| caps.get(1))
                    .flat_map(|m| split_list(m.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        let description = describe(&text[head_len..]);

        Self {
            type_name,
            name,
            description,
            examples,
            enum_values,
        }
    }

    /// Whether this record targets a synthesized key
    ///
    /// Both comparisons are exact: `filter[posts.id]` matches either
    /// `filter[posts.id]` or `posts.id`.
    pub fn matches(&self, key: &str, value_name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name == key || name == value_name)
    }
}

/// Override records from every tag named `tag`, in comment order
pub fn parse_overrides(block: &DocBlock, tag: &str) -> Vec<ParamOverride> {
    block
        .tags_named(tag)
        .map(|doc_tag| ParamOverride::parse(&doc_tag.value))
        .collect()
}

/// Parse a raw doc comment straight into override records
pub fn parse_comment(raw: &str, tag: &str) -> Vec<ParamOverride> {
    parse_overrides(&DocBlock::parse(raw), tag)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unquote(raw: &str) -> Option<&str> {
    ['"', '\'']
        .iter()
        .find_map(|&quote| raw.strip_prefix(quote)?.strip_suffix(quote))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Free text left once annotations are removed, minus separator dashes
fn describe(rest: &str) -> Option<String> {
    let mut text = rest.to_string();
    for pattern in [&EXAMPLE_PATTERN, &ENUM_PATTERN] {
        if let Some(re) = pattern.as_ref() {
            text = re.replace_all(&text, " ").into_owned();
        }
    }

    let description = text
        .split_whitespace()
        .filter(|word| !word.chars().all(|c| c == '-'))
        .collect::<Vec<_>>()
        .join(" ");
    (!description.is_empty()).then_some(description)
}
