//! Documentation-schema object model
//!
//! A small subset of OpenAPI 3.1: an operation carries query parameters,
//! each described by a scalar schema.

use crate::descriptor::{ParameterDescriptor, ValueType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema of a single scalar parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

/// An operation parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    pub schema: Schema,
}

impl Parameter {
    /// Build a query parameter from synthesized metadata
    ///
    /// The representative example is attached to the parameter; when no
    /// example set exists it is also the schema example.
    pub fn from_descriptor(descriptor: &ParameterDescriptor) -> Self {
        let schema_example = if descriptor.examples.is_empty() {
            descriptor.example.clone()
        } else {
            None
        };

        Self {
            name: descriptor.key.clone(),
            location: "query".to_string(),
            example: descriptor.example.clone(),
            schema: Schema {
                value_type: descriptor.value_type,
                format: descriptor.format.clone(),
                description: descriptor.description.clone(),
                example: schema_example,
                examples: descriptor.examples.clone(),
                enum_values: descriptor.enum_values.clone(),
            },
        }
    }
}

/// A documented route operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Operation {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: Some(operation_id.into()),
            parameters: Vec::new(),
        }
    }

    pub fn add_parameters(&mut self, parameters: impl IntoIterator<Item = Parameter>) {
        self.parameters.extend(parameters);
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
