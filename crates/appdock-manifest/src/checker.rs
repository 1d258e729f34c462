//! Offline manifest checker - one-shot, accumulate-everything diagnostics
//!
//! Unlike [`crate::loader`], which fails fast so a running application never
//! starts against a malformed manifest, the checker walks the whole document
//! and reports every violation in one pass. Hard schema findings are kept
//! separate from advisory layout findings (missing README and the like).

use crate::loader::{self, MANIFEST_FILE};
use crate::types::{is_valid_name, AppType, Author, Demand, InputSlot, OutputSlot, ParameterSchema};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Violates the manifest schema; the loader would reject this document.
    Error,
    /// Convention violation the runtime tolerates.
    Advisory,
}

/// One diagnostic produced by the checker.
#[derive(Debug, Clone)]
pub struct Finding {
    /// Dotted location within the document, or a file name for layout checks.
    pub location: String,
    pub message: String,
    pub severity: Severity,
}

impl Finding {
    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Finding {
            location: location.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn advisory(location: impl Into<String>, message: impl Into<String>) -> Self {
        Finding {
            location: location.into(),
            message: message.into(),
            severity: Severity::Advisory,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}: {}", self.location, self.message),
            Severity::Advisory => write!(f, "advisory: {}: {}", self.location, self.message),
        }
    }
}

/// Check an application directory: the manifest document plus the layout
/// conventions around it.
pub fn check_app_dir(app_dir: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();

    let manifest_path = app_dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        findings.push(Finding::error(
            MANIFEST_FILE,
            "manifest not found at the application root",
        ));
        return findings;
    }

    match std::fs::read_to_string(&manifest_path) {
        Ok(content) => match serde_json::from_str::<Value>(&content) {
            Ok(raw) => findings.extend(check_document(&raw)),
            Err(err) => findings.push(Finding::error(
                MANIFEST_FILE,
                format!("not valid JSON: {err}"),
            )),
        },
        Err(err) => {
            findings.push(Finding::error(MANIFEST_FILE, format!("unreadable: {err}")));
            return findings;
        }
    }

    // Layout conventions around the manifest, advisory only
    for expected in ["README.md", "LICENSE"] {
        if !app_dir.join(expected).exists() {
            findings.push(Finding::advisory(expected, "file is missing"));
        }
    }

    findings
}

/// Statically verify a raw manifest document, accumulating every violation.
pub fn check_document(raw: &Value) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Some(object) = raw.as_object() else {
        findings.push(Finding::error("$", "document root must be a JSON object"));
        return findings;
    };

    for field in loader::missing_fields(raw) {
        findings.push(Finding::error(field, "required field is missing"));
    }

    check_metadata(object, &mut findings);
    check_parameters(object.get("Parameters"), &mut findings);
    check_slots(object.get("Input"), "Input", false, &mut findings);
    check_slots(object.get("Output"), "Output", true, &mut findings);

    findings.sort_by(|a, b| a.location.cmp(&b.location));
    findings
}

fn check_metadata(object: &serde_json::Map<String, Value>, findings: &mut Vec<Finding>) {
    for field in ["Name", "Class", "Description", "License"] {
        if let Some(value) = object.get(field) {
            if !value.is_string() {
                findings.push(Finding::error(field, "must be a string"));
            }
        }
    }

    if let Some(app_type) = object.get("Type") {
        if serde_json::from_value::<AppType>(app_type.clone()).is_err() {
            findings.push(Finding::error(
                "Type",
                "must be 'Calculation' or 'Visualization'",
            ));
        }
    }

    if let Some(author) = object.get("Author") {
        if serde_json::from_value::<Author>(author.clone()).is_err() {
            findings.push(Finding::error("Author", "malformed author block"));
        }
    }

    if let Some(demands) = object.get("Demands") {
        if serde_json::from_value::<Vec<Demand>>(demands.clone()).is_err() {
            findings.push(Finding::error(
                "Demands",
                "must be an array drawn from CPU, GPU, internet_access, expose_port",
            ));
        }
    }
}

fn check_parameters(section: Option<&Value>, findings: &mut Vec<Finding>) {
    let entries = match section {
        None | Some(Value::Null) => return,
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            findings.push(Finding::error("Parameters", "must be an object or null"));
            return;
        }
    };

    for (name, entry) in entries {
        let location = format!("Parameters.{name}");
        if !is_valid_name(name) {
            findings.push(Finding::error(
                &location,
                "name must match [a-zA-Z0-9_.]+",
            ));
        }
        match serde_json::from_value::<ParameterSchema>(entry.clone()) {
            Ok(parameter) => {
                if let Some(reason) = loader::parameter_declaration_issue(&parameter) {
                    findings.push(Finding::error(&location, reason));
                }
            }
            Err(err) => {
                findings.push(Finding::error(&location, format!("malformed entry: {err}")));
            }
        }
    }
}

fn check_slots(
    section: Option<&Value>,
    section_name: &str,
    is_output: bool,
    findings: &mut Vec<Finding>,
) {
    let entries = match section {
        None | Some(Value::Null) => return,
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            findings.push(Finding::error(
                section_name,
                "must be an object or null",
            ));
            return;
        }
    };

    for (name, entry) in entries {
        let location = format!("{section_name}.{name}");
        if !is_valid_name(name) {
            findings.push(Finding::error(
                &location,
                "name must match [a-zA-Z0-9_.]+",
            ));
        }

        if is_output {
            match serde_json::from_value::<OutputSlot>(entry.clone()) {
                Ok(slot) => {
                    if !is_valid_name(&slot.file_name) {
                        findings.push(Finding::error(
                            &location,
                            format!(
                                "FileName '{}' must match [a-zA-Z0-9_.]+ with no path separators",
                                slot.file_name
                            ),
                        ));
                    }
                }
                Err(err) => {
                    findings.push(Finding::error(&location, format!("malformed entry: {err}")));
                }
            }
        } else if let Err(err) = serde_json::from_value::<InputSlot>(entry.clone()) {
            findings.push(Finding::error(&location, format!("malformed entry: {err}")));
        }
    }
}
