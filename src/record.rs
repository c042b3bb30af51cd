//! Module metadata records parsed from probe output
//!
//! The probe prints one name/path/version triad per imported module. This
//! module turns that stream back into typed records for display, logging,
//! and JSON serialization.

use serde::Serialize;

/// Path sentinel reported for modules with no on-disk installation.
pub const BUILTIN_PATH: &str = "built-in";

const NAME_PREFIX: &str = "MODULE NAME: ";
const PATH_PREFIX: &str = "MODULE PATH: ";
const VERSION_PREFIX: &str = "MODULE VERS: ";

/// One imported module as reported by the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    /// Top-level module name
    pub name: String,
    /// Installed filesystem location, or `"built-in"`
    pub path: String,
    /// Version string, absent when the module declares none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModuleRecord {
    /// Whether the module reported no on-disk installation path.
    pub fn is_builtin(&self) -> bool {
        self.path == BUILTIN_PATH
    }
}

/// A full probe report: the script that was scanned plus every module
/// record the probe emitted.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// The scanned script, as given on the command line
    pub script: String,
    /// One record per directly imported module
    pub modules: Vec<ModuleRecord>,
}

/// Parse the probe's stdout into records.
///
/// Lines outside the name/path/version triads are ignored, so anything the
/// imported modules print at import time cannot corrupt the report.
pub fn parse_records(output: &str) -> Vec<ModuleRecord> {
    let mut records = Vec::new();
    let mut current: Option<ModuleRecord> = None;

    for line in output.lines() {
        if let Some(name) = line.strip_prefix(NAME_PREFIX) {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(ModuleRecord {
                name: name.trim().to_string(),
                path: BUILTIN_PATH.to_string(),
                version: None,
            });
        } else if let Some(path) = line.strip_prefix(PATH_PREFIX) {
            if let Some(record) = current.as_mut() {
                record.path = path.trim().to_string();
            }
        } else if let Some(version) = line.strip_prefix(VERSION_PREFIX) {
            if let Some(record) = current.as_mut() {
                let version = version.trim();
                record.version = if version.is_empty() {
                    None
                } else {
                    Some(version.to_string())
                };
            }
        }
    }

    if let Some(record) = current.take() {
        records.push(record);
    }
    records
}
