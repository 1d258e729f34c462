//! Per-process application context
//!
//! The manifest is loaded once at startup and read everywhere after that.
//! Instead of ambient global state, the context is an explicit object built
//! in `main` (or a test) and passed into whatever needs parameter or path
//! access. Construction verifies the path layout and the manifest; all
//! accessors afterwards are read-only.

use crate::Result;
use ahash::AHashMap;
use anyhow::{bail, Context};
use appdock_config::{RuntimePaths, INPUT_MAPPING_ENV};
use appdock_manifest::{
    loader, parameters, paths, FileMapping, ManifestSchema, SuppliedValues,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Immutable runtime context of one application process.
#[derive(Debug, Clone)]
pub struct AppContext {
    manifest: ManifestSchema,
    paths: RuntimePaths,
    supplied: SuppliedValues,
    file_mapping: FileMapping,
}

impl AppContext {
    /// Build the context: resolve and verify the path layout, load the
    /// manifest, the supplied parameter document and the input file mapping.
    ///
    /// Overrides relocate the application root and data root for local
    /// development; `None` falls back to the environment variables and then
    /// the sandbox defaults.
    pub fn initialize(
        app_override: Option<&Path>,
        data_override: Option<&Path>,
    ) -> Result<Self> {
        let runtime_paths = RuntimePaths::resolve(app_override, data_override);
        runtime_paths.verify()?;

        let manifest = loader::load_from_path(&runtime_paths.manifest_file())?;
        let supplied = load_supplied_values(&runtime_paths)?;
        let file_mapping = load_file_mapping(&runtime_paths)?;

        for slot in file_mapping.keys() {
            if manifest.input(slot).is_none() {
                tracing::warn!(slot = %slot, "Ignoring file mapping entry for undeclared input slot");
            }
        }

        Ok(AppContext {
            manifest,
            paths: runtime_paths,
            supplied,
            file_mapping,
        })
    }

    pub fn manifest(&self) -> &ManifestSchema {
        &self.manifest
    }

    pub fn paths(&self) -> &RuntimePaths {
        &self.paths
    }

    /// Resolve every declared parameter against the supplied document.
    pub fn parameters(&self) -> Result<AHashMap<String, Value>> {
        Ok(parameters::resolve_all(&self.manifest, &self.supplied)?)
    }

    /// Resolve a single declared parameter.
    pub fn parameter(&self, name: &str) -> Result<Value> {
        Ok(parameters::resolve_one(&self.manifest, &self.supplied, name)?)
    }

    /// Resolve an input slot and check the location actually exists.
    pub fn input_path(&self, slot: &str) -> Result<PathBuf> {
        let path = paths::resolve_input_path(
            &self.manifest,
            slot,
            &self.paths.data,
            Some(&self.file_mapping),
        )?;
        if !path.exists() {
            bail!(
                "Input '{slot}' resolved to '{}' which does not exist - check the file mapping",
                path.display()
            );
        }
        Ok(path)
    }

    /// Resolve an output slot to its declared filename under the output root.
    pub fn output_path(&self, slot: &str) -> Result<PathBuf> {
        let path = paths::resolve_output_path(&self.manifest, slot, &self.paths.output)?;
        if path.exists() {
            tracing::warn!(path = %path.display(), "Output file already exists");
        }
        Ok(path)
    }

    /// Resolve the summary document path under the summary root.
    pub fn summary_path(&self) -> Result<PathBuf> {
        Ok(paths::resolve_summary_path(&self.manifest, &self.paths.summary)?)
    }
}

/// Read `config/parameters.json`; a missing document means "all defaults".
fn load_supplied_values(runtime_paths: &RuntimePaths) -> Result<SuppliedValues> {
    let file = runtime_paths.parameters_file();
    if !file.is_file() {
        tracing::info!(path = %file.display(), "No runtime parameters found - using defaults");
        return Ok(SuppliedValues::new());
    }

    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not a valid JSON object", file.display()))
}

/// Load the input file mapping: the inline environment document wins over
/// `config/input_file_mapping.json`; with neither present every input falls
/// back to the directory convention.
fn load_file_mapping(runtime_paths: &RuntimePaths) -> Result<FileMapping> {
    if let Ok(inline) = std::env::var(INPUT_MAPPING_ENV) {
        if !inline.trim().is_empty() && inline.trim() != "{}" {
            tracing::debug!("Input file mapping loaded from {INPUT_MAPPING_ENV}");
            return serde_json::from_str(&inline)
                .with_context(|| format!("{INPUT_MAPPING_ENV} is not valid JSON"));
        }
    }

    let file = runtime_paths.input_mapping_file();
    if !file.is_file() {
        return Ok(FileMapping::default());
    }
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not valid JSON", file.display()))
}
