//! Parameter value validation and resolution
//!
//! The declared `ParameterSchema` constrains the runtime-supplied value:
//! type tags match the JSON representation exactly, with no numeric widening
//! between integer and float and no coercion into enum literals. Resolution
//! merges the supplied value document against declared defaults.

use crate::errors::ResolveError;
use crate::types::{ManifestSchema, ParameterSchema, ParameterType};
use ahash::AHashMap;
use serde_json::{Map, Value};

/// Runtime-supplied parameter values, as read from `parameters.json`.
pub type SuppliedValues = Map<String, Value>;

impl ParameterSchema {
    /// Check a runtime-supplied value against this declared schema.
    ///
    /// A JSON `null` is valid for optional parameters regardless of type.
    /// Enum membership is exact type+value equality: an enum listing
    /// `["X", 1]` rejects the string `"1"`.
    pub fn validate_value(&self, name: &str, raw: &Value) -> Result<(), ResolveError> {
        if raw.is_null() {
            if self.optional {
                return Ok(());
            }
            return Err(self.type_error(name, raw));
        }

        let matches = match self.value_type {
            ParameterType::Enum => self
                .enum_values
                .as_ref()
                .is_some_and(|allowed| allowed.contains(raw)),
            ParameterType::String => raw.is_string(),
            // is_i64/is_u64 are representation checks: 1.0 is stored as f64
            // and does not count as an integer, and vice versa.
            ParameterType::Integer => raw.is_i64() || raw.is_u64(),
            ParameterType::Float => raw.is_f64(),
            ParameterType::Bool => raw.is_boolean(),
            ParameterType::List => raw.is_array(),
            ParameterType::Dict => raw.is_object(),
        };

        if matches {
            Ok(())
        } else {
            Err(self.type_error(name, raw))
        }
    }

    fn type_error(&self, name: &str, raw: &Value) -> ResolveError {
        ResolveError::ParameterType {
            parameter: name.to_string(),
            expected: self.value_type,
            actual: raw.clone(),
        }
    }
}

/// Resolve every declared parameter against the supplied value document.
///
/// Supplied keys not declared in the manifest are ignored with a warning -
/// the runtime may pass extras for newer manifest revisions. The call is
/// atomic: one invalid supplied value fails the whole batch, so a caller can
/// never proceed with a partial parameter set.
pub fn resolve_all(
    manifest: &ManifestSchema,
    supplied: &SuppliedValues,
) -> Result<AHashMap<String, Value>, ResolveError> {
    for extra in supplied.keys() {
        if !manifest.parameters.contains_key(extra) {
            tracing::warn!(
                parameter = %extra,
                "Ignoring supplied parameter not declared in the manifest"
            );
        }
    }

    let mut resolved = AHashMap::with_capacity(manifest.parameters.len());
    for (name, schema) in &manifest.parameters {
        let value = resolve_declared(schema, supplied, name)?;
        resolved.insert(name.clone(), value);
    }
    Ok(resolved)
}

/// Resolve a single declared parameter.
///
/// Unlike [`resolve_all`], asking for a name the manifest never declared is
/// a programmer error and fails with [`ResolveError::UnknownParameter`].
pub fn resolve_one(
    manifest: &ManifestSchema,
    supplied: &SuppliedValues,
    name: &str,
) -> Result<Value, ResolveError> {
    let schema = manifest
        .parameter(name)
        .ok_or_else(|| ResolveError::UnknownParameter {
            parameter: name.to_string(),
        })?;
    resolve_declared(schema, supplied, name)
}

/// Merge rule for one parameter: a supplied value (including an explicit
/// `null` on an optional parameter) wins; the declared default is substituted
/// only when the key is entirely absent from the supplied document.
fn resolve_declared(
    schema: &ParameterSchema,
    supplied: &SuppliedValues,
    name: &str,
) -> Result<Value, ResolveError> {
    match supplied.get(name) {
        Some(raw) => {
            schema.validate_value(name, raw)?;
            Ok(raw.clone())
        }
        None => Ok(schema.default.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use serde_json::json;

    fn schema(value: Value) -> ParameterSchema {
        serde_json::from_value(value).unwrap()
    }

    fn fixture_manifest() -> ManifestSchema {
        loader::load_str(
            &json!({
                "Name": "dge",
                "Type": "Calculation",
                "Class": "expression",
                "Description": "differential expression",
                "License": "MIT",
                "Author": {"Name": "someone"},
                "Demands": ["CPU"],
                "Parameters": {
                    "StrValue": {"Type": "string", "Default": "batch_id", "Description": "d"},
                    "IntValue": {"Type": "integer", "Default": 150, "Description": "d"},
                    "FloatValue": {"Type": "float", "Default": 0.05, "Description": "d"},
                    "EnumValue": {"Type": "enum", "Enum": ["X", 1], "Default": "X", "Description": "d"},
                    "OptValue": {"Type": "string", "Optional": true, "Default": null, "Description": "d"}
                },
                "Input": {},
                "Output": {}
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_exact_type_matching() {
        let s = schema(json!({"Type": "integer", "Default": 1}));
        assert!(s.validate_value("p", &json!(3)).is_ok());
        assert!(s.validate_value("p", &json!(3.0)).is_err());
        assert!(s.validate_value("p", &json!("3")).is_err());
        assert!(s.validate_value("p", &json!(true)).is_err());

        let s = schema(json!({"Type": "float", "Default": 0.5}));
        assert!(s.validate_value("p", &json!(0.25)).is_ok());
        // No widening: an integer-shaped number is not a float
        assert!(s.validate_value("p", &json!(1)).is_err());

        let s = schema(json!({"Type": "bool", "Default": false}));
        assert!(s.validate_value("p", &json!(true)).is_ok());
        assert!(s.validate_value("p", &json!(0)).is_err());
    }

    #[test]
    fn test_collection_types() {
        let s = schema(json!({"Type": "list", "Default": []}));
        assert!(s.validate_value("p", &json!([1, "two", null])).is_ok());
        assert!(s.validate_value("p", &json!({"a": 1})).is_err());

        let s = schema(json!({"Type": "dict", "Default": {}}));
        assert!(s.validate_value("p", &json!({"a": 1, "b": [2]})).is_ok());
        assert!(s.validate_value("p", &json!([1, 2])).is_err());
    }

    #[test]
    fn test_enum_membership_is_type_sensitive() {
        let s = schema(json!({"Type": "enum", "Enum": ["X", 1], "Default": "X"}));
        assert!(s.validate_value("p", &json!("X")).is_ok());
        assert!(s.validate_value("p", &json!(1)).is_ok());
        assert!(s.validate_value("p", &json!("1")).is_err());
        assert!(s.validate_value("p", &json!("Y")).is_err());
    }

    #[test]
    fn test_null_requires_optional() {
        let required = schema(json!({"Type": "string", "Default": "x"}));
        assert!(required.validate_value("p", &Value::Null).is_err());

        let optional = schema(json!({"Type": "string", "Optional": true, "Default": null}));
        assert!(optional.validate_value("p", &Value::Null).is_ok());
    }

    #[test]
    fn test_resolve_one_empty_supplied_returns_default() {
        let manifest = fixture_manifest();
        let supplied = SuppliedValues::new();

        assert_eq!(
            resolve_one(&manifest, &supplied, "StrValue").unwrap(),
            json!("batch_id")
        );
        assert_eq!(
            resolve_one(&manifest, &supplied, "IntValue").unwrap(),
            json!(150)
        );
    }

    #[test]
    fn test_resolve_one_unknown_parameter() {
        let manifest = fixture_manifest();
        let err = resolve_one(&manifest, &SuppliedValues::new(), "NoSuchParam").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnknownParameter { parameter } if parameter == "NoSuchParam"
        ));
    }

    #[test]
    fn test_resolve_one_supplied_null_preserved() {
        let manifest = fixture_manifest();
        let supplied: SuppliedValues =
            serde_json::from_value(json!({"OptValue": null})).unwrap();
        assert_eq!(resolve_one(&manifest, &supplied, "OptValue").unwrap(), Value::Null);
    }

    #[test]
    fn test_resolve_all_merges_supplied_over_defaults() {
        let manifest = fixture_manifest();
        let supplied: SuppliedValues =
            serde_json::from_value(json!({"IntValue": 42, "EnumValue": 1})).unwrap();

        let resolved = resolve_all(&manifest, &supplied).unwrap();
        assert_eq!(resolved["IntValue"], json!(42));
        assert_eq!(resolved["EnumValue"], json!(1));
        assert_eq!(resolved["StrValue"], json!("batch_id"));
        assert_eq!(resolved["OptValue"], Value::Null);
    }

    #[test]
    fn test_resolve_all_ignores_undeclared_extras() {
        let manifest = fixture_manifest();
        let supplied: SuppliedValues =
            serde_json::from_value(json!({"FutureKnob": "whatever"})).unwrap();

        let resolved = resolve_all(&manifest, &supplied).unwrap();
        assert_eq!(resolved.len(), manifest.parameters.len());
        assert!(!resolved.contains_key("FutureKnob"));
    }

    #[test]
    fn test_resolve_all_is_atomic() {
        let manifest = fixture_manifest();
        let supplied: SuppliedValues =
            serde_json::from_value(json!({"IntValue": 42, "EnumValue": "1"})).unwrap();

        let err = resolve_all(&manifest, &supplied).unwrap_err();
        assert!(matches!(err, ResolveError::ParameterType { .. }));
    }

    #[test]
    fn test_resolve_all_idempotent() {
        let manifest = fixture_manifest();
        let supplied: SuppliedValues =
            serde_json::from_value(json!({"FloatValue": 0.01})).unwrap();

        let first = resolve_all(&manifest, &supplied).unwrap();
        let second = resolve_all(&manifest, &supplied).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_declared_defaults_pass_validation() {
        let manifest = fixture_manifest();
        for (name, schema) in &manifest.parameters {
            assert!(
                schema.validate_value(name, &schema.default).is_ok(),
                "default for {name} should satisfy its own schema"
            );
        }
    }
}
