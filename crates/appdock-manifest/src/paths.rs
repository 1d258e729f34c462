//! Slot path resolution - mapping declared input/output slots to files
//!
//! Inputs are resolved through an optional file mapping supplied by the
//! runtime; without a mapping entry the slot name itself is used as a
//! directory under the data root, which supports multi-file inputs. Outputs
//! always resolve to the declared `FileName` under the output root - that
//! determinism is the compatibility contract with the consuming runtime.

use crate::errors::ResolveError;
use crate::types::{AppType, ManifestSchema};
use ahash::AHashMap;
use std::path::{Path, PathBuf};

/// Runtime-supplied mapping of input slot name to a path relative to the
/// data root, as read from `input_file_mapping.json`.
pub type FileMapping = AHashMap<String, PathBuf>;

/// Name of the summary document under the summary root.
pub const SUMMARY_FILE: &str = "summary.md";

/// Resolve a declared input slot to a concrete path under `data_root`.
///
/// An explicit `file_mapping` entry wins; otherwise the slot name is treated
/// as a directory containing the input.
pub fn resolve_input_path(
    manifest: &ManifestSchema,
    slot_name: &str,
    data_root: &Path,
    file_mapping: Option<&FileMapping>,
) -> Result<PathBuf, ResolveError> {
    if manifest.input(slot_name).is_none() {
        return Err(unknown_slot(slot_name));
    }

    match file_mapping.and_then(|mapping| mapping.get(slot_name)) {
        Some(mapped) => Ok(data_root.join(mapped)),
        None => Ok(data_root.join(slot_name)),
    }
}

/// Resolve a declared output slot to `output_root/FileName`.
///
/// Deterministic and independent of any file mapping; only `Calculation`
/// applications may write file output.
pub fn resolve_output_path(
    manifest: &ManifestSchema,
    slot_name: &str,
    output_root: &Path,
) -> Result<PathBuf, ResolveError> {
    ensure_calculation(manifest)?;
    let slot = manifest
        .output(slot_name)
        .ok_or_else(|| unknown_slot(slot_name))?;
    Ok(output_root.join(&slot.file_name))
}

/// Resolve the summary document path under `summary_root`.
pub fn resolve_summary_path(
    manifest: &ManifestSchema,
    summary_root: &Path,
) -> Result<PathBuf, ResolveError> {
    ensure_calculation(manifest)?;
    Ok(summary_root.join(SUMMARY_FILE))
}

fn ensure_calculation(manifest: &ManifestSchema) -> Result<(), ResolveError> {
    if manifest.app_type == AppType::Calculation {
        Ok(())
    } else {
        Err(ResolveError::OutputNotSupported {
            app_type: manifest.app_type,
        })
    }
}

fn unknown_slot(slot_name: &str) -> ResolveError {
    ResolveError::UnknownSlot {
        slot: slot_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use serde_json::json;

    fn fixture(app_type: &str) -> ManifestSchema {
        loader::load_str(
            &json!({
                "Name": "clustering",
                "Type": app_type,
                "Class": "clustering",
                "Description": "d",
                "License": "MIT",
                "Author": {},
                "Demands": ["CPU"],
                "Parameters": {},
                "Input": {
                    "expression_matrix": {"Type": "matrix", "Usage": "raw counts"},
                    "gene_list": {"Type": "list", "Usage": "genes of interest"}
                },
                "Output": {
                    "some_output": {"Type": "csv", "Usage": "u", "FileName": "some_output.csv"}
                }
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_input_path_directory_convention() {
        let manifest = fixture("Calculation");
        let path =
            resolve_input_path(&manifest, "expression_matrix", Path::new("/data"), None).unwrap();
        assert_eq!(path, PathBuf::from("/data/expression_matrix"));
    }

    #[test]
    fn test_input_path_explicit_mapping_wins() {
        let manifest = fixture("Calculation");
        let mut mapping = FileMapping::default();
        mapping.insert(
            "expression_matrix".to_string(),
            PathBuf::from("upstream_run/output/matrix.tsv"),
        );

        let path = resolve_input_path(
            &manifest,
            "expression_matrix",
            Path::new("/data"),
            Some(&mapping),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/data/upstream_run/output/matrix.tsv"));

        // Slots absent from the mapping still use the directory convention
        let path =
            resolve_input_path(&manifest, "gene_list", Path::new("/data"), Some(&mapping)).unwrap();
        assert_eq!(path, PathBuf::from("/data/gene_list"));
    }

    #[test]
    fn test_input_path_unknown_slot() {
        let manifest = fixture("Calculation");
        let err =
            resolve_input_path(&manifest, "no_such_slot", Path::new("/data"), None).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownSlot { slot } if slot == "no_such_slot"));
    }

    #[test]
    fn test_output_path_uses_declared_filename() {
        let manifest = fixture("Calculation");
        let path = resolve_output_path(&manifest, "some_output", Path::new("/out")).unwrap();
        assert_eq!(path, PathBuf::from("/out/some_output.csv"));
    }

    #[test]
    fn test_output_path_is_deterministic() {
        let manifest = fixture("Calculation");
        let first = resolve_output_path(&manifest, "some_output", Path::new("/out")).unwrap();
        let second = resolve_output_path(&manifest, "some_output", Path::new("/out")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_path_unknown_slot() {
        let manifest = fixture("Calculation");
        let err = resolve_output_path(&manifest, "nope", Path::new("/out")).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownSlot { .. }));
    }

    #[test]
    fn test_output_not_supported_for_visualization() {
        let manifest = fixture("Visualization");
        let err = resolve_output_path(&manifest, "some_output", Path::new("/out")).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::OutputNotSupported { app_type: AppType::Visualization }
        ));

        let err = resolve_summary_path(&manifest, Path::new("/summary")).unwrap_err();
        assert!(matches!(err, ResolveError::OutputNotSupported { .. }));
    }

    #[test]
    fn test_summary_path() {
        let manifest = fixture("Calculation");
        let path = resolve_summary_path(&manifest, Path::new("/summary")).unwrap();
        assert_eq!(path, PathBuf::from("/summary/summary.md"));
    }
}
