//! Probe script execution
//!
//! Owns the lifecycle of the generated script: remove any stale copy left
//! by an earlier run, write the new one, hand it to a Python interpreter
//! as a child process, and delete it afterward. Child failures are not
//! caught here; they surface through the exit status alone.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// Fixed name of the generated script, relative to the working directory.
/// A second concurrent run in the same directory races on this path.
pub const PROBE_FILE_NAME: &str = "pith_probe.py";

/// Interpreter invoked when none is configured.
pub const DEFAULT_PYTHON: &str = "python3";

/// How a probe run executes.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Interpreter name or path resolved through the execution PATH
    pub python: String,
    /// Directory the generated script is written into
    pub work_dir: PathBuf,
    /// Leave the generated script on disk after the run
    pub keep_script: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            python: String::from(DEFAULT_PYTHON),
            work_dir: PathBuf::from("."),
            keep_script: false,
        }
    }
}

/// Outcome of one probe run.
#[derive(Debug)]
pub struct ProbeOutput {
    /// Exit status of the child interpreter
    pub status: ExitStatus,
    /// Everything the probe printed on stdout
    pub stdout: String,
}

/// Write `script` to the probe path and run it under the configured
/// interpreter, blocking until the child exits.
///
/// Any stale script from an earlier run is removed before writing. The
/// child's stderr passes straight through so import failures stay visible;
/// stdout is captured for the caller to render or log.
pub fn run_probe(script: &str, options: &ProbeOptions) -> io::Result<ProbeOutput> {
    let path = options.work_dir.join(PROBE_FILE_NAME);

    if path.exists() {
        fs::remove_file(&path)?;
    }
    fs::write(&path, script)?;

    let result = Command::new(&options.python)
        .arg(&path)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output();

    if !options.keep_script {
        let _ = fs::remove_file(&path);
    }

    let output = result?;
    Ok(ProbeOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}
