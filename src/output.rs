//! Report rendering
//!
//! Renders a probe report either as colored console text or as
//! pretty-printed JSON.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::record::{ModuleRecord, ProbeReport};

/// Render the report as plain text: the scanned script's path followed by
/// one name/path/version triad per module.
pub fn render_report(script: &str, records: &[ModuleRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("EXECUTING: {}\n\nIMPORTING:\n", script));
    for record in records {
        out.push_str(&format!("MODULE NAME: {}\n", record.name));
        out.push_str(&format!("MODULE PATH: {}\n", record.path));
        out.push_str(&format!(
            "MODULE VERS: {}\n\n",
            record.version.as_deref().unwrap_or("")
        ));
    }
    out
}

/// Print the report to stdout, coloring module names when enabled.
pub fn print_report(script: &str, records: &[ModuleRecord], use_color: bool) -> io::Result<()> {
    let choice = if use_color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    stdout.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(stdout, "EXECUTING: {}", script)?;
    stdout.reset()?;
    writeln!(stdout)?;
    writeln!(stdout, "IMPORTING:")?;

    for record in records {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(stdout, "MODULE NAME: {}", record.name)?;
        stdout.reset()?;
        writeln!(stdout, "MODULE PATH: {}", record.path)?;
        writeln!(
            stdout,
            "MODULE VERS: {}",
            record.version.as_deref().unwrap_or("")
        )?;
        writeln!(stdout)?;
    }
    Ok(())
}

/// Print the report as pretty-printed JSON to stdout.
pub fn print_json(report: &ProbeReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    println!("{}", json);
    Ok(())
}
