//! Generated probe script assembly
//!
//! Combines extracted import lines with a fixed Python routine that walks
//! the child interpreter's loaded-module table and reports, for every
//! module imported by name, where it is installed and which version it
//! carries.

use std::collections::HashSet;
use std::path::Path;

/// Python routine appended to every probe script.
///
/// Intersecting `sys.modules` with the script's global namespace keeps the
/// report to modules imported directly by the probe, not transitive
/// dependencies. Path and version lookups fail independently; a module
/// with no on-disk location still reports a version when it has one. The
/// routine's own `import sys` means `sys` always appears in the report.
pub const COLLECTOR_ROUTINE: &str = r#"
import sys


def collect_import_metadata():
    module_names = list(set(sys.modules) & set(globals()))
    module_paths = []
    module_versions = []
    for name in module_names:
        module = sys.modules[name]
        try:
            module_paths.append(module.__path__[0])
        except Exception:
            module_paths.append(getattr(module, '__file__', None) or 'built-in')
        try:
            module_versions.append(module.__version__)
        except Exception:
            module_versions.append('')
    return module_names, module_paths, module_versions
"#;

/// Compose the full probe script: import block, collector routine, and
/// invocation trailer.
///
/// The import set is sorted before writing so the generated script is
/// identical run to run.
pub fn compose_probe(imports: &HashSet<String>, script_path: &Path) -> String {
    let mut lines: Vec<&String> = imports.iter().collect();
    lines.sort();

    let mut script = String::new();
    for line in lines {
        script.push_str(line);
    }
    script.push_str(COLLECTOR_ROUTINE);
    script.push_str(&render_trailer(script_path));
    script
}

/// Render the trailer that invokes the collector and prints one
/// name/path/version triad per module.
fn render_trailer(script_path: &Path) -> String {
    let script_literal = py_string_literal(&script_path.display().to_string());

    let mut trailer = String::new();
    trailer.push_str("\nmodule_names, module_paths, module_versions = collect_import_metadata()\n");
    trailer.push_str(&format!("print('EXECUTING: ' + {})\n", script_literal));
    trailer.push_str("print(' ')\n");
    trailer.push_str("print('IMPORTING:')\n");
    trailer.push_str("for n, p, v in zip(module_names, module_paths, module_versions):\n");
    trailer.push_str("    print('MODULE NAME: {}'.format(n))\n");
    trailer.push_str("    print('MODULE PATH: {}'.format(p))\n");
    trailer.push_str("    print('MODULE VERS: {}'.format(v))\n");
    trailer.push_str("    print(' ')\n");
    trailer
}

/// Quote `s` as a Python single-quoted string literal.
fn py_string_literal(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imports(lines: &[&str]) -> HashSet<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compose_orders_imports_before_collector() {
        let script = compose_probe(
            &imports(&["import os\n", "import collections\n"]),
            Path::new("demo.py"),
        );

        let collections_at = script.find("import collections\n").unwrap();
        let os_at = script.find("import os\n").unwrap();
        let collector_at = script.find("def collect_import_metadata").unwrap();

        assert!(collections_at < os_at, "import block should be sorted");
        assert!(os_at < collector_at, "imports should precede the collector");
    }

    #[test]
    fn test_compose_includes_trailer() {
        let script = compose_probe(&imports(&["import os\n"]), Path::new("demo.py"));
        assert!(script.contains("collect_import_metadata()\n"));
        assert!(script.contains("print('EXECUTING: ' + 'demo.py')"));
        assert!(script.contains("print('IMPORTING:')"));
        assert!(script.contains("print('MODULE NAME: {}'.format(n))"));
    }

    #[test]
    fn test_compose_with_empty_import_set() {
        let script = compose_probe(&HashSet::new(), Path::new("empty.py"));
        assert!(script.starts_with(COLLECTOR_ROUTINE));
    }

    #[test]
    fn test_script_path_is_escaped() {
        let script = compose_probe(&HashSet::new(), Path::new("it's a script.py"));
        assert!(script.contains(r"'it\'s a script.py'"));
    }

    #[test]
    fn test_py_string_literal_escapes_backslashes() {
        assert_eq!(py_string_literal(r"C:\scripts\run.py"), r"'C:\\scripts\\run.py'");
    }
}
