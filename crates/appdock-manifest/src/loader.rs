//! Manifest loading - parsing a manifest document into a validated schema
//!
//! Loading is all-or-nothing: the first structural violation aborts with a
//! typed error and no partial schema is ever returned. The offline checker
//! in [`crate::checker`] reuses the same rules but accumulates every
//! violation instead of stopping at the first.

use crate::errors::ManifestError;
use crate::types::{is_valid_name, ManifestSchema, ParameterSchema, ParameterType};
use serde_json::Value;
use std::path::Path;

/// Name of the manifest document at the application root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Top-level fields every manifest must carry. Mappings and arrays may be
/// empty but the keys themselves must exist.
pub const REQUIRED_FIELDS: &[&str] = &[
    "Author",
    "Name",
    "Type",
    "Class",
    "Description",
    "License",
    "Demands",
    "Input",
    "Output",
    "Parameters",
];

/// Load and validate the manifest at `app_dir/manifest.json`.
pub fn load_from_app_dir(app_dir: &Path) -> Result<ManifestSchema, ManifestError> {
    load_from_path(&app_dir.join(MANIFEST_FILE))
}

/// Load and validate a manifest from a specific file.
pub fn load_from_path(path: &Path) -> Result<ManifestSchema, ManifestError> {
    tracing::debug!(path = %path.display(), "Loading manifest");
    let content = std::fs::read_to_string(path)?;
    load_str(&content)
}

/// Parse and validate a manifest document.
pub fn load_str(document: &str) -> Result<ManifestSchema, ManifestError> {
    let raw: Value = serde_json::from_str(document)?;
    if !raw.is_object() {
        return Err(ManifestError::NotAnObject);
    }
    if let Some(field) = missing_fields(&raw).first() {
        return Err(ManifestError::Structure {
            field: (*field).to_string(),
        });
    }

    let schema = match serde_json::from_value::<ManifestSchema>(raw.clone()) {
        Ok(schema) => schema,
        Err(err) => return Err(refine_parse_error(&raw, err)),
    };
    validate(&schema)?;
    Ok(schema)
}

/// Attribute a whole-document deserialization failure to the specific
/// parameter or slot entry that caused it, so the error names the
/// declaration instead of a JSON path.
fn refine_parse_error(raw: &Value, err: serde_json::Error) -> ManifestError {
    if let Some(entries) = raw.get("Parameters").and_then(Value::as_object) {
        for (name, entry) in entries {
            if let Err(entry_err) = serde_json::from_value::<ParameterSchema>(entry.clone()) {
                return ManifestError::ParameterDeclaration {
                    parameter: name.clone(),
                    reason: entry_err.to_string(),
                };
            }
        }
    }

    if let Some(entries) = raw.get("Input").and_then(Value::as_object) {
        for (name, entry) in entries {
            if let Err(entry_err) = serde_json::from_value::<crate::types::InputSlot>(entry.clone())
            {
                return ManifestError::IoDeclaration {
                    slot: name.clone(),
                    reason: entry_err.to_string(),
                };
            }
        }
    }

    if let Some(entries) = raw.get("Output").and_then(Value::as_object) {
        for (name, entry) in entries {
            if let Err(entry_err) =
                serde_json::from_value::<crate::types::OutputSlot>(entry.clone())
            {
                return ManifestError::IoDeclaration {
                    slot: name.clone(),
                    reason: entry_err.to_string(),
                };
            }
        }
    }

    ManifestError::Parse(err)
}

/// Required top-level fields absent from the raw document, in declaration
/// order.
pub(crate) fn missing_fields(raw: &Value) -> Vec<&'static str> {
    match raw.as_object() {
        Some(object) => REQUIRED_FIELDS
            .iter()
            .filter(|field| !object.contains_key(**field))
            .copied()
            .collect(),
        None => REQUIRED_FIELDS.to_vec(),
    }
}

/// Cross-check the parsed schema: parameter declarations are self-consistent
/// and slot names respect the naming rules.
fn validate(schema: &ManifestSchema) -> Result<(), ManifestError> {
    for (name, parameter) in &schema.parameters {
        if !is_valid_name(name) {
            return Err(ManifestError::ParameterDeclaration {
                parameter: name.clone(),
                reason: "name must match [a-zA-Z0-9_.]+".to_string(),
            });
        }
        if let Some(reason) = parameter_declaration_issue(parameter) {
            return Err(ManifestError::ParameterDeclaration {
                parameter: name.clone(),
                reason,
            });
        }
    }

    for name in schema.inputs.keys() {
        if !is_valid_name(name) {
            return Err(slot_name_error(name));
        }
    }

    for (name, slot) in &schema.outputs {
        if !is_valid_name(name) {
            return Err(slot_name_error(name));
        }
        if !is_valid_name(&slot.file_name) {
            return Err(ManifestError::IoDeclaration {
                slot: name.clone(),
                reason: format!(
                    "FileName '{}' must match [a-zA-Z0-9_.]+ with no path separators",
                    slot.file_name
                ),
            });
        }
    }

    Ok(())
}

fn slot_name_error(name: &str) -> ManifestError {
    ManifestError::IoDeclaration {
        slot: name.to_string(),
        reason: "name must match [a-zA-Z0-9_.]+".to_string(),
    }
}

/// Why a single parameter declaration is self-inconsistent, if it is.
///
/// Rules, in order: the Enum list is present exactly for enum parameters and
/// never empty; a null default requires `Optional: true`; a concrete default
/// must satisfy the declared type (for enums, be a member of the Enum list).
pub(crate) fn parameter_declaration_issue(parameter: &ParameterSchema) -> Option<String> {
    match (&parameter.value_type, &parameter.enum_values) {
        (ParameterType::Enum, None) => {
            return Some("enum type requires a non-empty Enum list".to_string());
        }
        (ParameterType::Enum, Some(values)) if values.is_empty() => {
            return Some("enum type requires a non-empty Enum list".to_string());
        }
        (other, Some(_)) if *other != ParameterType::Enum => {
            return Some(format!("Enum values provided but Type is {other}"));
        }
        _ => {}
    }

    if parameter.default.is_null() {
        if parameter.optional {
            return None;
        }
        return Some("Default is null but Optional is false".to_string());
    }

    if parameter.validate_value("Default", &parameter.default).is_err() {
        if parameter.value_type == ParameterType::Enum {
            return Some(format!(
                "Default {} is not a member of Enum",
                parameter.default
            ));
        }
        return Some(format!(
            "Default {} does not match declared type {}",
            parameter.default, parameter.value_type
        ));
    }

    None
}
