//! Test harness for pith integration tests

use std::path::Path;
use std::process::Command;

pub use pith::test_utils::ScriptDir;

/// Run the pith binary in `dir` and collect stdout, stderr, and success.
pub fn run_pith(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_pith");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run pith");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// True when the default Python interpreter is on the PATH.
pub fn python_available() -> bool {
    Command::new(pith::DEFAULT_PYTHON)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let dir = ScriptDir::new();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_harness_add_script() {
        let dir = ScriptDir::new();
        let path = dir.add_script("demo.py", "import os\n");
        assert!(path.exists());
    }
}
