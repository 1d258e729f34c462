//! appdock manifest management
//!
//! The manifest is the declared contract of a sandboxed analysis
//! application: its identity, its typed parameters and its named input and
//! output slots. This crate owns the schema types, the all-or-nothing
//! loader, the parameter and path resolvers, and the offline checker used
//! to vet a manifest before shipping.
//!
//! The on-disk format is JSON with fixed field casing (`Name`, `Type`,
//! `Parameters`, ...) for compatibility with the consuming runtime.

pub mod checker;
pub mod errors;
pub mod loader;
pub mod parameters;
pub mod paths;
pub mod types;

pub use errors::{ManifestError, ResolveError};
pub use loader::{load_from_app_dir, load_from_path, load_str, MANIFEST_FILE};
pub use parameters::{resolve_all, resolve_one, SuppliedValues};
pub use paths::{resolve_input_path, resolve_output_path, resolve_summary_path, FileMapping};
pub use types::{
    AppType, Author, Demand, InputSlot, ManifestSchema, OutputSlot, ParameterSchema, ParameterType,
};
