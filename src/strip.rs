//! Import statement extraction from Python source text
//!
//! Filters a script's lines down to the ones that look like import
//! statements and normalizes each into a canonical `import <module>` form
//! naming only the top-level module. This is deliberately line-textual: it
//! is not a Python parser and performs no syntax validation.
//!
//! # Known limitations
//!
//! - A line where "import" appears inside an identifier (e.g. a variable
//!   named `my_important_value`) is retained as a false positive.
//! - Multi-target lines like `import a, b, c` are normalized as a single
//!   unit and may come out as a malformed fragment.

use std::collections::HashSet;

/// Token identifying this tool itself. Lines mentioning it are skipped so
/// a script that wires up its own recording never re-imports the recorder.
pub const SELF_TOKEN: &str = "pith";

/// Decide whether a raw source line is an import candidate.
///
/// A line qualifies when it contains "import", carries no comment marker,
/// is not a relative import, contains no dunder token, and mentions none
/// of the excluded names.
fn is_import_candidate(line: &str, exclude: &[&str]) -> bool {
    line.contains("import")
        && !line.contains('#')
        && !line.contains("from .")
        && !line.contains("__")
        && !exclude.iter().any(|token| line.contains(token))
}

/// Normalize one candidate line to `import <top_level_module>`.
///
/// Rules apply in order, each on the previous result: `from a.b import c`
/// becomes `import a`, then `import m as alias` becomes `import m`, then
/// `import m.sub` becomes `import m`. Lines matching none of the rules
/// pass through unchanged. Every returned line carries a trailing newline
/// since the output is written directly into a generated script.
fn normalize(line: &str) -> String {
    if line.contains("from") {
        // The first whitespace-delimited token after `from` is the dotted
        // module path; everything past the first `.` is discarded, as are
        // the imported names.
        if let Some(module) = line.split_whitespace().nth(1) {
            let top_level = module.split('.').next().unwrap_or(module);
            return format!("import {}\n", top_level);
        }
    }

    let line = match line.split_once(" as ") {
        Some((kept, _alias)) => kept,
        None => line,
    };

    let line = line.split('.').next().unwrap_or(line);

    format!("{}\n", line)
}

/// Extract the deduplicated set of normalized import lines from `source`.
///
/// Equivalent to [`strip_imports_with_exclusions`] with only
/// [`SELF_TOKEN`] excluded.
pub fn strip_imports(source: &str) -> HashSet<String> {
    strip_imports_with_exclusions(source, &[SELF_TOKEN])
}

/// Extract import lines, additionally skipping any line that mentions one
/// of `exclude`. Leading whitespace is stripped first so imports indented
/// inside conditionals or functions are still captured.
pub fn strip_imports_with_exclusions(source: &str, exclude: &[&str]) -> HashSet<String> {
    source
        .lines()
        .map(str::trim_start)
        .filter(|line| is_import_candidate(line, exclude))
        .map(normalize)
        .collect()
}
