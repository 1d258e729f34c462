//! Centralized error types for manifest loading and resolution
//!
//! Load-time errors (`ManifestError`) are fatal for the whole application;
//! resolution-time errors (`ResolveError`) are scoped to the single parameter
//! or slot being resolved.

use crate::types::{AppType, ParameterType};
use serde_json::Value;
use std::io;
use thiserror::Error;

/// Errors raised while loading and structurally validating a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Manifest document root must be a JSON object")]
    NotAnObject,

    #[error("Manifest is missing required field '{field}'")]
    Structure { field: String },

    #[error("Invalid declaration for parameter '{parameter}': {reason}")]
    ParameterDeclaration { parameter: String, reason: String },

    #[error("Invalid declaration for slot '{slot}': {reason}")]
    IoDeclaration { slot: String, reason: String },
}

/// Errors raised while resolving runtime-supplied values or slot paths
/// against a loaded manifest.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Parameter '{parameter}' expected type {expected} but got {actual}")]
    ParameterType {
        parameter: String,
        expected: ParameterType,
        actual: Value,
    },

    #[error("Parameter '{parameter}' is not declared in the manifest")]
    UnknownParameter { parameter: String },

    #[error("Slot '{slot}' is not declared in the manifest")]
    UnknownSlot { slot: String },

    #[error("File output is not supported for '{app_type}' applications")]
    OutputNotSupported { app_type: AppType },
}
