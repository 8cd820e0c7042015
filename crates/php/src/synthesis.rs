//! Parameter synthesis
//!
//! Filter and field capabilities produce one `key[value]` parameter per
//! resolved value, typed by a name heuristic and then merged with any
//! matching override. Include and sort capabilities produce a single
//! parameter carrying an example set.

use crate::docblock::ParamOverride;
use crate::inference::ResolvedValue;
use chrono::{Local, NaiveDate};
use qbdoc_core::config::SynthesisConfig;
use qbdoc_core::descriptor::{ParameterDescriptor, ValueType};
use qbdoc_core::feature::{Feature, FeatureKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use strum_macros::Display;
use tracing::trace;

pub const INCLUDE_DESCRIPTION: &str = "Comma separated list of relationships to include.";
pub const SORT_DESCRIPTION: &str = "Comma separated list of values. Prefix with '-' to exclude.";

/// Name-based guess for a keyed parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Heuristic {
    /// `*_at`: a date string
    Date,
    /// `*id`: an integer identifier
    Identifier,
    /// `*ed`, `*ng`, `is_*`, `has_*`: a flag
    Flag,
    Text,
}

impl Heuristic {
    pub fn value_type(self) -> ValueType {
        match self {
            Heuristic::Date | Heuristic::Text => ValueType::String,
            Heuristic::Identifier => ValueType::Integer,
            Heuristic::Flag => ValueType::Boolean,
        }
    }

    pub fn format(self) -> Option<&'static str> {
        match self {
            Heuristic::Date => Some("date"),
            _ => None,
        }
    }
}

/// Classify a value name by its last two characters
///
/// Names without a recognised suffix that start with `is_` or `has_` are
/// flags as well.
pub fn heuristic_type(name: &str) -> Heuristic {
    if name.ends_with("at") {
        Heuristic::Date
    } else if name.ends_with("id") {
        Heuristic::Identifier
    } else if name.ends_with("ed") || name.ends_with("ng") {
        Heuristic::Flag
    } else if name.starts_with("is_") || name.starts_with("has_") {
        Heuristic::Flag
    } else {
        Heuristic::Text
    }
}

fn override_type(type_name: &str) -> Option<ValueType> {
    match type_name {
        "string" => Some(ValueType::String),
        "integer" => Some(ValueType::Integer),
        "boolean" => Some(ValueType::Boolean),
        _ => None,
    }
}

/// Merge one override into a descriptor if it targets it
///
/// A recognised type replaces the heuristic type and drops the heuristic
/// format and example; enum values are only kept for string parameters.
/// Returns whether the override applied.
pub fn apply_override(
    descriptor: &mut ParameterDescriptor,
    value_name: &str,
    record: &ParamOverride,
) -> bool {
    if !record.matches(&descriptor.key, value_name) {
        return false;
    }

    if let Some(value_type) = record.type_name.as_deref().and_then(override_type) {
        descriptor.value_type = value_type;
        descriptor.format = None;
        descriptor.example = None;
        descriptor.examples.clear();
        descriptor.enum_values = None;
        if value_type == ValueType::String && !record.enum_values.is_empty() {
            descriptor.enum_values = Some(record.enum_values.clone());
        }
    }

    if let Some(description) = &record.description {
        descriptor.description = Some(description.clone());
    }

    if let Some(first) = record.examples.first() {
        descriptor.example = Some(Value::String(first.clone()));
        descriptor.examples = record
            .examples
            .iter()
            .map(|example| Value::String(example.clone()))
            .collect();
    }

    true
}

/// Builds parameter descriptors for one handler
pub struct Synthesizer {
    rng: StdRng,
    today: NaiveDate,
    options: SynthesisConfig,
}

impl Synthesizer {
    /// Seeded from `options.seed` when set, from entropy otherwise
    pub fn new(options: &SynthesisConfig) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            today: Local::now().date_naive(),
            options: options.clone(),
        }
    }

    /// Fix the date used for date examples
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Descriptors for a capability, in emission order
    ///
    /// Unsupported values are skipped unless `emit_unsupported` is set.
    pub fn synthesize(
        &mut self,
        feature: &Feature,
        values: &[ResolvedValue],
        overrides: &[ParamOverride],
    ) -> Vec<ParameterDescriptor> {
        let names: Vec<String> = values
            .iter()
            .filter(|value| self.options.emit_unsupported || !value.is_unsupported())
            .map(ResolvedValue::to_string)
            .collect();

        match feature.kind {
            FeatureKind::Filter | FeatureKind::Field => names
                .iter()
                .map(|name| self.keyed(&feature.query_parameter_key, name, overrides))
                .collect(),
            FeatureKind::Include => vec![self.include(&feature.query_parameter_key, names)],
            FeatureKind::Sort => vec![self.sort(&feature.query_parameter_key, &names)],
        }
    }

    fn keyed(&mut self, prefix: &str, name: &str, overrides: &[ParamOverride]) -> ParameterDescriptor {
        let heuristic = heuristic_type(name);
        let mut descriptor =
            ParameterDescriptor::new(format!("{prefix}[{name}]"), heuristic.value_type());
        descriptor.format = heuristic.format().map(str::to_string);
        descriptor.example = Some(self.example_for(heuristic));

        for record in overrides {
            if apply_override(&mut descriptor, name, record) {
                trace!(key = %descriptor.key, "applied override");
            }
        }
        trace!(key = %descriptor.key, %heuristic, value_type = %descriptor.value_type, "synthesized parameter");
        descriptor
    }

    fn example_for(&mut self, heuristic: Heuristic) -> Value {
        match heuristic {
            Heuristic::Date => Value::String(self.today.format("%Y-%m-%d").to_string()),
            Heuristic::Identifier => Value::from(self.rng.gen_range(1..=1000_u32)),
            Heuristic::Flag => Value::Bool(self.rng.gen_bool(0.5)),
            Heuristic::Text => Value::String(String::new()),
        }
    }

    fn include(&mut self, key: &str, mut names: Vec<String>) -> ParameterDescriptor {
        if self.options.shuffle_includes {
            names.shuffle(&mut self.rng);
        }
        example_set(key, INCLUDE_DESCRIPTION, names)
    }

    fn sort(&self, key: &str, names: &[String]) -> ParameterDescriptor {
        let examples = names
            .iter()
            .flat_map(|name| [name.clone(), format!("-{name}")])
            .collect();
        example_set(key, SORT_DESCRIPTION, examples)
    }
}

fn example_set(key: &str, description: &str, examples: Vec<String>) -> ParameterDescriptor {
    let mut descriptor = ParameterDescriptor::new(key, ValueType::String);
    descriptor.description = Some(description.to_string());
    descriptor.example = examples.first().cloned().map(Value::String);
    descriptor.examples = examples.into_iter().map(Value::String).collect();
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::NOT_SUPPORTED_KEY;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
    }

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(&SynthesisConfig {
            seed: Some(7),
            ..SynthesisConfig::default()
        })
        .with_today(today())
    }

    fn values(items: &[&str]) -> Vec<ResolvedValue> {
        items
            .iter()
            .map(|v| ResolvedValue::Value(v.to_string()))
            .collect()
    }

    fn record(type_name: &str, name: &str) -> ParamOverride {
        ParamOverride {
            type_name: Some(type_name.to_string()),
            name: Some(name.to_string()),
            ..ParamOverride::default()
        }
    }

    #[test]
    fn test_heuristic_suffixes() {
        assert_eq!(heuristic_type("created_at"), Heuristic::Date);
        assert_eq!(heuristic_type("user_id"), Heuristic::Identifier);
        assert_eq!(heuristic_type("published"), Heuristic::Flag);
        assert_eq!(heuristic_type("pending"), Heuristic::Flag);
        assert_eq!(heuristic_type("is_active"), Heuristic::Flag);
        assert_eq!(heuristic_type("has_comments"), Heuristic::Flag);
        assert_eq!(heuristic_type("title"), Heuristic::Text);
        assert_eq!(heuristic_type("a"), Heuristic::Text);
        assert_eq!(Heuristic::Date.format(), Some("date"));
    }

    #[test]
    fn test_filter_descriptors_follow_heuristics() {
        let feature = Feature::new(FeatureKind::Filter, "filter");
        let descriptors = synthesizer().synthesize(
            &feature,
            &values(&["created_at", "user_id", "is_active", "title"]),
            &[],
        );

        let summary: Vec<(&str, ValueType, Option<&str>)> = descriptors
            .iter()
            .map(|d| (d.key.as_str(), d.value_type, d.format.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("filter[created_at]", ValueType::String, Some("date")),
                ("filter[user_id]", ValueType::Integer, None),
                ("filter[is_active]", ValueType::Boolean, None),
                ("filter[title]", ValueType::String, None),
            ]
        );

        assert_eq!(descriptors[0].example, Some(json!("2024-03-15")));
        let id = descriptors[1]
            .example
            .as_ref()
            .and_then(Value::as_u64)
            .expect("integer example");
        assert!((1..=1000).contains(&id));
        assert!(descriptors[2].example.as_ref().is_some_and(Value::is_boolean));
        assert_eq!(descriptors[3].example, Some(json!("")));
        assert!(descriptors.iter().all(|d| d.examples.is_empty()));
    }

    #[test]
    fn test_override_replaces_type_and_example() {
        let feature = Feature::new(FeatureKind::Filter, "filter");
        let overrides = vec![ParamOverride {
            examples: vec!["42".to_string()],
            ..record("integer", "posts.id")
        }];
        let descriptors = synthesizer().synthesize(&feature, &values(&["posts.id"]), &overrides);

        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].key, "filter[posts.id]");
        assert_eq!(descriptors[0].value_type, ValueType::Integer);
        assert_eq!(descriptors[0].example, Some(json!("42")));
        assert_eq!(descriptors[0].examples, vec![json!("42")]);
    }

    #[test]
    fn test_override_enum_only_for_strings() {
        let mut descriptor = ParameterDescriptor::new("filter[status]", ValueType::String);
        let mut status = record("string", "filter[status]");
        status.enum_values = vec!["draft".to_string(), "published".to_string()];
        status.description = Some("Post status".to_string());
        assert!(apply_override(&mut descriptor, "status", &status));
        assert_eq!(
            descriptor.enum_values,
            Some(vec!["draft".to_string(), "published".to_string()])
        );
        assert_eq!(descriptor.description.as_deref(), Some("Post status"));

        let mut descriptor = ParameterDescriptor::new("filter[status]", ValueType::String);
        status.type_name = Some("integer".to_string());
        assert!(apply_override(&mut descriptor, "status", &status));
        assert_eq!(descriptor.value_type, ValueType::Integer);
        assert_eq!(descriptor.enum_values, None);
    }

    #[test]
    fn test_override_with_unknown_type_keeps_heuristic() {
        let feature = Feature::new(FeatureKind::Filter, "filter");
        let mut overrides = vec![record("array", "created_at")];
        overrides[0].description = Some("Creation date".to_string());
        let descriptors = synthesizer().synthesize(&feature, &values(&["created_at"]), &overrides);

        assert_eq!(descriptors[0].value_type, ValueType::String);
        assert_eq!(descriptors[0].format.as_deref(), Some("date"));
        assert_eq!(descriptors[0].example, Some(json!("2024-03-15")));
        assert_eq!(descriptors[0].description.as_deref(), Some("Creation date"));
    }

    #[test]
    fn test_override_without_name_is_ignored() {
        let mut descriptor = ParameterDescriptor::new("filter[title]", ValueType::String);
        let before = descriptor.clone();
        assert!(!apply_override(&mut descriptor, "title", &ParamOverride::default()));
        assert_eq!(descriptor, before);
    }

    #[test]
    fn test_later_overrides_win() {
        let feature = Feature::new(FeatureKind::Field, "fields");
        let overrides = vec![
            ParamOverride {
                description: Some("first".to_string()),
                ..record("string", "fields[name]")
            },
            ParamOverride {
                description: Some("second".to_string()),
                ..record("boolean", "name")
            },
        ];
        let descriptors = synthesizer().synthesize(&feature, &values(&["name"]), &overrides);
        assert_eq!(descriptors[0].value_type, ValueType::Boolean);
        assert_eq!(descriptors[0].description.as_deref(), Some("second"));
    }

    #[test]
    fn test_sort_expands_descending_variants() {
        let feature = Feature::new(FeatureKind::Sort, "sort");
        let descriptors = synthesizer().synthesize(&feature, &values(&["title", "id"]), &[]);

        assert_eq!(descriptors.len(), 1);
        let sort = &descriptors[0];
        assert_eq!(sort.key, "sort");
        assert_eq!(sort.value_type, ValueType::String);
        assert_eq!(sort.description.as_deref(), Some(SORT_DESCRIPTION));
        assert_eq!(
            sort.examples,
            vec![json!("title"), json!("-title"), json!("id"), json!("-id")]
        );
        assert_eq!(sort.example, Some(json!("title")));
    }

    #[test]
    fn test_include_examples_are_the_value_set() {
        let feature = Feature::new(FeatureKind::Include, "include");
        let descriptors = synthesizer().synthesize(
            &feature,
            &values(&["posts", "posts.author", "books"]),
            &[],
        );

        let include = &descriptors[0];
        assert_eq!(include.description.as_deref(), Some(INCLUDE_DESCRIPTION));
        let set: BTreeSet<&str> = include.examples.iter().filter_map(Value::as_str).collect();
        assert_eq!(set, BTreeSet::from(["books", "posts", "posts.author"]));
        assert_eq!(include.example.as_ref(), include.examples.first());
    }

    #[test]
    fn test_include_order_kept_without_shuffle() {
        let mut synthesizer = Synthesizer::new(&SynthesisConfig {
            shuffle_includes: false,
            ..SynthesisConfig::default()
        });
        let feature = Feature::new(FeatureKind::Include, "include");
        let descriptors = synthesizer.synthesize(&feature, &values(&["b", "a"]), &[]);
        assert_eq!(descriptors[0].examples, vec![json!("b"), json!("a")]);
    }

    #[test]
    fn test_empty_values() {
        let mut synthesizer = synthesizer();
        let include = Feature::new(FeatureKind::Include, "include");
        let descriptors = synthesizer.synthesize(&include, &[], &[]);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].example, None);
        assert!(descriptors[0].examples.is_empty());

        let filter = Feature::new(FeatureKind::Filter, "filter");
        assert!(synthesizer.synthesize(&filter, &[], &[]).is_empty());
    }

    #[test]
    fn test_unsupported_values() {
        let feature = Feature::new(FeatureKind::Filter, "filter");
        let resolved = vec![
            ResolvedValue::Value("title".to_string()),
            ResolvedValue::Unsupported,
        ];
        assert_eq!(synthesizer().synthesize(&feature, &resolved, &[]).len(), 1);

        let mut emitting = Synthesizer::new(&SynthesisConfig {
            emit_unsupported: true,
            seed: Some(1),
            ..SynthesisConfig::default()
        });
        let keys: Vec<String> = emitting
            .synthesize(&feature, &resolved, &[])
            .into_iter()
            .map(|d| d.key)
            .collect();
        assert_eq!(
            keys,
            vec!["filter[title]".to_string(), format!("filter[{NOT_SUPPORTED_KEY}]")]
        );
    }

    #[test]
    fn test_seeded_synthesizers_agree() {
        let feature = Feature::new(FeatureKind::Filter, "filter");
        let resolved = values(&["user_id", "is_active"]);
        let first = synthesizer().synthesize(&feature, &resolved, &[]);
        let second = synthesizer().synthesize(&feature, &resolved, &[]);
        assert_eq!(first, second);
    }
}
