//! Pith - records a running script's imports and where each module lives
//!
//! Scans a Python script's source for import statements, replays them in a
//! throwaway probe script under a clean interpreter, and reports each
//! imported module's installed path and version. Also provides the logging
//! sink and instrumentation wrappers the report can be routed through.

pub mod logging;
pub mod output;
pub mod probe;
pub mod record;
pub mod runner;
pub mod strip;
pub mod wrappers;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use logging::{Level, LogSink};
pub use output::{print_json, print_report, render_report};
pub use probe::{COLLECTOR_ROUTINE, compose_probe};
pub use record::{BUILTIN_PATH, ModuleRecord, ProbeReport, parse_records};
pub use runner::{DEFAULT_PYTHON, PROBE_FILE_NAME, ProbeOptions, ProbeOutput, run_probe};
pub use strip::{SELF_TOKEN, strip_imports, strip_imports_with_exclusions};
pub use wrappers::{RunEnv, catch_and_log, with_call_metadata, with_run_info};
