//! Timestamped log-file sink
//!
//! The log file is named `<module>_<YYYY-MM-DD-HH-MM>.log` under a
//! caller-supplied directory (created if absent) and every line is written
//! as `<timestamp> <LEVEL>: <message>`. The sink is an explicit value
//! handed to whatever wants to log; there is no process-global logger.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A log file plus an optional stdout mirror.
#[derive(Debug)]
pub struct LogSink {
    file: File,
    path: PathBuf,
    mirror_stdout: bool,
}

impl LogSink {
    /// Create the log file for `module` under `dir`, creating `dir` first
    /// when it does not exist yet. The filename combines the module name
    /// with the current date and time down to the minute.
    pub fn create(module: &str, dir: &Path, mirror_stdout: bool) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let timestamp = Local::now().format("%Y-%m-%d-%H-%M");
        let path = dir.join(format!("{}_{}.log", module, timestamp));
        let file = File::create(&path)?;
        Ok(Self {
            file,
            path,
            mirror_stdout,
        })
    }

    /// Where this sink writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&mut self, message: &str) {
        self.write(Level::Info, message);
    }

    pub fn critical(&mut self, message: &str) {
        self.write(Level::Critical, message);
    }

    fn write(&mut self, level: Level, message: &str) {
        let timestamp = Local::now().format("%m/%d/%Y %H:%M:%S %p");
        let line = format!("{} {}: {}", timestamp, level, message);
        if self.mirror_stdout {
            println!("{}", line);
        }
        // Best-effort: a failed log write never aborts the run being
        // observed.
        let _ = writeln!(self.file, "{}", line);
    }
}
