//! Query builder capabilities
//!
//! Each capability is enabled on a query builder by one method call
//! (`allowedIncludes`, `allowedFilters`, ...) and is exposed to clients
//! through one query parameter key.

use crate::config::ParameterKeys;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The four query-shaping capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeatureKind {
    Include,
    Filter,
    Sort,
    Field,
}

impl FeatureKind {
    /// All capabilities in documentation order
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Include,
        FeatureKind::Filter,
        FeatureKind::Sort,
        FeatureKind::Field,
    ];

    /// Builder method that enables this capability
    pub fn method_name(self) -> &'static str {
        match self {
            FeatureKind::Include => "allowedIncludes",
            FeatureKind::Filter => "allowedFilters",
            FeatureKind::Sort => "allowedSorts",
            FeatureKind::Field => "allowedFields",
        }
    }

    /// Whether every resolved value becomes its own `key[value]` parameter
    pub fn is_keyed(self) -> bool {
        matches!(self, FeatureKind::Filter | FeatureKind::Field)
    }

    fn sample_values(self) -> &'static [&'static str] {
        match self {
            FeatureKind::Include => &["posts", "posts.comments", "books"],
            FeatureKind::Filter => &["[name]=john", "[email]=gmail"],
            FeatureKind::Sort => &["title", "-title", "title,-id"],
            FeatureKind::Field => &["id", "title", "posts.id"],
        }
    }
}

/// A capability bound to its configured query parameter key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub kind: FeatureKind,
    pub method_name: String,
    pub query_parameter_key: String,
    /// Illustrative values used when nothing could be resolved
    pub sample_values: Vec<String>,
    /// Example values computed for the current handler
    #[serde(default)]
    pub values: Vec<String>,
}

impl Feature {
    pub fn new(kind: FeatureKind, query_parameter_key: impl Into<String>) -> Self {
        Self {
            kind,
            method_name: kind.method_name().to_string(),
            query_parameter_key: query_parameter_key.into(),
            sample_values: kind.sample_values().iter().map(|s| s.to_string()).collect(),
            values: Vec::new(),
        }
    }

    pub fn set_values(&mut self, values: Vec<String>) {
        self.values = values;
    }
}

/// The four capability descriptors, keyed by the configured parameter names
pub fn features(keys: &ParameterKeys) -> Vec<Feature> {
    FeatureKind::ALL
        .iter()
        .map(|&kind| Feature::new(kind, keys.key_for(kind)))
        .collect()
}
