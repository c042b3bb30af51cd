//! Run instrumentation wrappers
//!
//! Higher-order functions that wrap an arbitrary closure to log execution
//! metadata around it: host environment and timing, crash capture, and
//! call parameters. Each forwards the closure's return value untouched,
//! except the crash wrapper, which swallows failures and yields `None`.

use std::backtrace::Backtrace;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::process::Command;
use std::time::{Duration, Instant};

use cpu_time::ProcessTime;

use crate::logging::LogSink;

/// Host environment snapshot logged by [`with_run_info`].
#[derive(Debug, Clone)]
pub struct RunEnv {
    pub user: String,
    pub host: String,
    pub interpreter_version: String,
    pub interpreter_path: String,
}

const INTERPRETER_PROBE: &str =
    "import sys; print(sys.version.replace('\\n', ' ')); print(sys.executable)";

impl RunEnv {
    /// Capture the current user, hostname, and the version and executable
    /// path of `python`. Fields fall back to `"unknown"` when a lookup
    /// fails; capture itself never does.
    pub fn capture(python: &str) -> Self {
        let user = whoami::username();
        let host = whoami::fallible::hostname().unwrap_or_else(|_| String::from("unknown"));

        let (interpreter_version, interpreter_path) = match Command::new(python)
            .args(["-c", INTERPRETER_PROBE])
            .output()
        {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let mut lines = stdout.lines();
                let version = lines.next().unwrap_or("unknown").to_string();
                let path = lines.next().unwrap_or("unknown").to_string();
                (version, path)
            }
            _ => (String::from("unknown"), String::from("unknown")),
        };

        Self {
            user,
            host,
            interpreter_version,
            interpreter_path,
        }
    }
}

/// Format a duration as `h:m:s.micros`, matching the elapsed-time lines
/// written to the log.
fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let hours = (total / 3600.0) as u64;
    let minutes = ((total % 3600.0) / 60.0) as u64;
    let seconds = total % 60.0;
    format!("{}:{}:{:.6}", hours, minutes, seconds)
}

/// Log the environment snapshot, run `f`, then log wall-clock and CPU
/// time.
pub fn with_run_info<T>(sink: &mut LogSink, env: &RunEnv, f: impl FnOnce() -> T) -> T {
    sink.info(&format!("User: {}", env.user));
    sink.info(&format!("System: {}", env.host));
    sink.info(&format!("Python Version: {}", env.interpreter_version));
    sink.info(&format!("Python Executable Path: {}", env.interpreter_path));

    let wall_start = Instant::now();
    let cpu_start = ProcessTime::try_now().ok();

    let result = f();

    sink.info(&format!(
        "Elapsed Real Time: {}",
        format_elapsed(wall_start.elapsed())
    ));
    match cpu_start.and_then(|start| start.try_elapsed().ok()) {
        Some(cpu) => sink.info(&format!("Elapsed CPU Time: {}", format_elapsed(cpu))),
        None => sink.info("Elapsed CPU Time: unknown"),
    }

    result
}

/// Run `f`, logging a completion marker on success. Both `Err` returns
/// and panics are logged with a `CRASHED` marker and swallowed; the
/// caller gets `None` instead of a value.
pub fn catch_and_log<T, E: Display>(
    sink: &mut LogSink,
    f: impl FnOnce() -> Result<T, E>,
) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => {
            sink.info("Completed Successfully");
            Some(value)
        }
        Ok(Err(err)) => {
            sink.critical(&err.to_string());
            sink.critical("CRASHED");
            None
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| String::from("panic with non-string payload"));
            sink.critical(&message);
            sink.critical(&Backtrace::force_capture().to_string());
            sink.critical("CRASHED");
            None
        }
    }
}

/// Log the call's name and keyword parameters (sorted alphabetically by
/// name) before running `f`.
pub fn with_call_metadata<T>(
    sink: &mut LogSink,
    name: &str,
    params: &[(&str, String)],
    f: impl FnOnce() -> T,
) -> T {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    sink.info("");
    sink.info(&format!("FUNCTION: {}", name.to_uppercase()));
    sink.info("   PARAMETER : VALUE");
    for (param, value) in sorted {
        sink.info(&format!("   {} : {}", param, value));
    }
    sink.info("");

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sink_in(dir: &TempDir) -> LogSink {
        LogSink::create("wrapped", dir.path(), false).unwrap()
    }

    #[test]
    fn test_with_run_info_forwards_return_value() {
        let dir = TempDir::new().unwrap();
        let mut sink = sink_in(&dir);
        let env = RunEnv {
            user: "tester".to_string(),
            host: "testhost".to_string(),
            interpreter_version: "3.12.0".to_string(),
            interpreter_path: "/usr/bin/python3".to_string(),
        };

        let value = with_run_info(&mut sink, &env, || 42);
        assert_eq!(value, 42);

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("User: tester"));
        assert!(contents.contains("System: testhost"));
        assert!(contents.contains("Python Version: 3.12.0"));
        assert!(contents.contains("Elapsed Real Time:"));
        assert!(contents.contains("Elapsed CPU Time:"));
    }

    #[test]
    fn test_catch_and_log_success() {
        let dir = TempDir::new().unwrap();
        let mut sink = sink_in(&dir);

        let value = catch_and_log(&mut sink, || Ok::<_, String>(7));
        assert_eq!(value, Some(7));

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("Completed Successfully"));
        assert!(!contents.contains("CRASHED"));
    }

    #[test]
    fn test_catch_and_log_swallows_error() {
        let dir = TempDir::new().unwrap();
        let mut sink = sink_in(&dir);

        let value = catch_and_log(&mut sink, || Err::<(), String>("boom".to_string()));
        assert_eq!(value, None);

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("boom"));
        assert!(contents.contains("CRASHED"));
    }

    #[test]
    fn test_catch_and_log_swallows_panic() {
        let dir = TempDir::new().unwrap();
        let mut sink = sink_in(&dir);

        let value = catch_and_log(&mut sink, || -> Result<(), String> { panic!("kaboom") });
        assert_eq!(value, None);

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("kaboom"));
        assert!(contents.contains("CRASHED"));
    }

    #[test]
    fn test_with_call_metadata_sorts_params() {
        let dir = TempDir::new().unwrap();
        let mut sink = sink_in(&dir);

        let params = [
            ("zebra", "stripes".to_string()),
            ("alpha", "first".to_string()),
        ];
        let value = with_call_metadata(&mut sink, "do_stuff", &params, || "done");
        assert_eq!(value, "done");

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("FUNCTION: DO_STUFF"));
        let alpha_at = contents.find("alpha : first").unwrap();
        let zebra_at = contents.find("zebra : stripes").unwrap();
        assert!(alpha_at < zebra_at, "params should be sorted by name");
    }

    #[test]
    fn test_capture_with_missing_interpreter_falls_back() {
        let env = RunEnv::capture("pith-no-such-interpreter");
        assert_eq!(env.interpreter_version, "unknown");
        assert_eq!(env.interpreter_path, "unknown");
        assert!(!env.user.is_empty());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(3661)), "1:1:1.000000");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "0:0:1.500000");
    }
}
