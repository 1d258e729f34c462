//! Schema types for the appdock application manifest
//!
//! This module provides:
//! - The closed parameter type system (`ParameterType`)
//! - Declared parameter schemas with defaults, optionality and enum sets
//! - Input/output slot declarations
//! - The top-level `ManifestSchema` assembled by the loader
//!
//! Field names and casing mirror the on-disk `manifest.json` exactly; the
//! document format is a compatibility contract with the consuming runtime.

use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;

/// Characters allowed in parameter names, slot names and output filenames.
///
/// The pattern is `[a-zA-Z0-9_.]+` - in particular no path separators, so a
/// declared `FileName` can never escape its output root.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
}

// =============================================================================
// PARAMETER TYPE - Closed set, one variant per validation behavior
// =============================================================================

/// Declared value type of a manifest parameter.
///
/// A tagged sum rather than a free-form string so that adding a type forces
/// every `match` over validation behavior to be revisited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Integer,
    Float,
    Bool,
    List,
    Dict,
    Enum,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ParameterType::String => "string",
            ParameterType::Integer => "integer",
            ParameterType::Float => "float",
            ParameterType::Bool => "bool",
            ParameterType::List => "list",
            ParameterType::Dict => "dict",
            ParameterType::Enum => "enum",
        };
        write!(f, "{}", tag)
    }
}

// =============================================================================
// PARAMETER SCHEMA - One declared parameter
// =============================================================================

/// Declared schema of a single parameter.
///
/// `default` keeps the raw JSON value; its shape is checked against
/// `value_type` at load time. A JSON `null` default is only legal for
/// optional parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterSchema {
    #[serde(rename = "Type")]
    pub value_type: ParameterType,

    #[serde(rename = "Optional", default)]
    pub optional: bool,

    #[serde(rename = "Default", default)]
    pub default: Value,

    /// Allowed literal values - present if and only if `value_type` is enum.
    /// Membership is exact type+value equality: `"1"` and `1` are distinct.
    #[serde(rename = "Enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "Description", default)]
    pub description: String,
}

// =============================================================================
// IO SLOTS - Named input/output bindings
// =============================================================================

/// Declared input slot. The `Type` tag is an open label describing the file
/// semantics, not validated against a fixed vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSlot {
    #[serde(rename = "Type")]
    pub declared_type: String,

    #[serde(rename = "Usage", default)]
    pub usage: String,
}

/// Declared output slot. `file_name` is a bare name resolved against the
/// output root at run time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSlot {
    #[serde(rename = "Type")]
    pub declared_type: String,

    #[serde(rename = "Usage", default)]
    pub usage: String,

    #[serde(rename = "FileName")]
    pub file_name: String,
}

// =============================================================================
// APPLICATION METADATA
// =============================================================================

/// Application kind. Only `Calculation` applications produce file output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppType {
    Calculation,
    Visualization,
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppType::Calculation => write!(f, "Calculation"),
            AppType::Visualization => write!(f, "Visualization"),
        }
    }
}

/// Runtime capability demanded by the application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum Demand {
    CPU,
    GPU,
    #[serde(rename = "internet_access")]
    InternetAccess,
    #[serde(rename = "expose_port")]
    ExposePort,
}

/// Application author block; every sub-field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Author {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(
        rename = "Organisation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub organisation: Option<String>,
}

// =============================================================================
// MANIFEST SCHEMA - Top-level declared contract
// =============================================================================

/// The full declared contract of an application.
///
/// Constructed once per process by the loader and immutable thereafter; all
/// resolvers take it by shared reference. Never persisted back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestSchema {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Type")]
    pub app_type: AppType,

    #[serde(rename = "Class")]
    pub class: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "License")]
    pub license: String,

    #[serde(rename = "Author")]
    pub author: Author,

    #[serde(rename = "Demands")]
    pub demands: SmallVec<[Demand; 4]>,

    /// Parameter name -> declared schema. A JSON `null` section is treated
    /// as empty, which some hand-written manifests use for "no parameters".
    #[serde(rename = "Parameters", deserialize_with = "null_as_empty_map")]
    pub parameters: AHashMap<String, ParameterSchema>,

    #[serde(rename = "Input", deserialize_with = "null_as_empty_map")]
    pub inputs: AHashMap<String, InputSlot>,

    #[serde(rename = "Output", deserialize_with = "null_as_empty_map")]
    pub outputs: AHashMap<String, OutputSlot>,
}

fn null_as_empty_map<'de, D, V>(deserializer: D) -> Result<AHashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let section = Option::<AHashMap<String, V>>::deserialize(deserializer)?;
    Ok(section.unwrap_or_default())
}

impl ManifestSchema {
    /// Look up a declared parameter by name.
    #[inline]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSchema> {
        self.parameters.get(name)
    }

    /// Look up a declared input slot by name.
    #[inline]
    pub fn input(&self, name: &str) -> Option<&InputSlot> {
        self.inputs.get(name)
    }

    /// Look up a declared output slot by name.
    #[inline]
    pub fn output(&self, name: &str) -> Option<&OutputSlot> {
        self.outputs.get(name)
    }

    /// Serialize back to the on-disk JSON form.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
