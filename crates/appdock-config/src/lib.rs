//! Runtime path layout for appdock applications
//!
//! Inside the sandbox an application reads its manifest from the application
//! root and its data through a fixed layout under the data root:
//!
//! ```text
//! <app root>/manifest.json
//! <data root>/data/      input slot directories and mapped files
//! <data root>/config/    parameters.json, input_file_mapping.json
//! <data root>/output/    declared output files
//! <data root>/summary/   summary.md
//! ```
//!
//! Both roots can be relocated for local development, either by argument or
//! through the `APPDOCK_APP_DIR` / `APPDOCK_DATA_ROOT` environment
//! variables. Exact subpaths below the roots are owned by this crate; no
//! other component hardcodes them.

use appdock_manifest::MANIFEST_FILE;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default application root inside the sandbox.
pub const DEFAULT_APP_DIR: &str = "/app";
/// Default data root inside the sandbox.
pub const DEFAULT_DATA_ROOT: &str = "/data";

/// Environment override for the application root.
pub const APP_DIR_ENV: &str = "APPDOCK_APP_DIR";
/// Environment override for the data root.
pub const DATA_ROOT_ENV: &str = "APPDOCK_DATA_ROOT";
/// Environment variable carrying an inline input file mapping document,
/// taking precedence over `config/input_file_mapping.json`.
pub const INPUT_MAPPING_ENV: &str = "APPDOCK_INPUT_MAPPING";

/// Runtime documents under the config directory.
pub const PARAMETERS_FILE: &str = "parameters.json";
pub const INPUT_FILE_MAPPING_FILE: &str = "input_file_mapping.json";

/// Errors raised while verifying the runtime path layout.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required directory '{0}' not found - check path configuration")]
    MissingDirectory(PathBuf),

    #[error("'{0}' does not exist - check paths and existence")]
    MissingFile(PathBuf),
}

/// Resolved locations of the application root and the data subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub app: PathBuf,
    pub data: PathBuf,
    pub config: PathBuf,
    pub output: PathBuf,
    pub summary: PathBuf,
}

impl RuntimePaths {
    /// Resolve the layout, in priority order: explicit argument, environment
    /// override, built-in default.
    ///
    /// Inside the sandbox the defaults are always correct, so overriding
    /// there draws a warning.
    pub fn resolve(app_override: Option<&Path>, data_override: Option<&Path>) -> Self {
        let overridden = app_override.is_some()
            || data_override.is_some()
            || std::env::var_os(APP_DIR_ENV).is_some()
            || std::env::var_os(DATA_ROOT_ENV).is_some();
        if running_in_container() && overridden {
            tracing::warn!("Running sandboxed - non-default paths may result in errors");
        }

        let app_root = app_override
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(APP_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_APP_DIR));
        let data_root = data_override
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(DATA_ROOT_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT));

        tracing::debug!(app = %app_root.display(), data = %data_root.display(), "Resolved runtime paths");
        Self::from_roots(&app_root, &data_root)
    }

    /// Build the layout from explicit roots, without consulting the
    /// environment.
    pub fn from_roots(app_root: &Path, data_root: &Path) -> Self {
        RuntimePaths {
            app: app_root.to_path_buf(),
            data: data_root.join("data"),
            config: data_root.join("config"),
            output: data_root.join("output"),
            summary: data_root.join("summary"),
        }
    }

    /// Check that the main directories and the manifest document exist.
    pub fn verify(&self) -> Result<(), ConfigError> {
        for directory in [&self.app, &self.data, &self.config] {
            if !directory.is_dir() {
                return Err(ConfigError::MissingDirectory(directory.clone()));
            }
        }

        let manifest = self.manifest_file();
        if !manifest.is_file() {
            return Err(ConfigError::MissingFile(manifest));
        }
        Ok(())
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.app.join(MANIFEST_FILE)
    }

    pub fn parameters_file(&self) -> PathBuf {
        self.config.join(PARAMETERS_FILE)
    }

    pub fn input_mapping_file(&self) -> PathBuf {
        self.config.join(INPUT_FILE_MAPPING_FILE)
    }
}

/// Detect whether the process runs inside the sandbox container.
pub fn running_in_container() -> bool {
    Path::new("/.dockerenv").exists()
}
