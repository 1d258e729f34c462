//! appdock - manifest tooling and runtime access layer
//!
//! The binary offers offline manifest checking (`appdock check`) plus small
//! introspection commands; the library side exposes [`context::AppContext`],
//! the per-process object through which a running application reads its
//! resolved parameters and slot paths.

pub mod cli;
pub mod context;

pub type Result<T> = anyhow::Result<T>;
