//! CLI entry point for pith

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use pith::{
    DEFAULT_PYTHON, LogSink, ProbeOptions, ProbeReport, RunEnv, SELF_TOKEN, compose_probe,
    parse_records, print_json, print_report, run_probe, strip_imports_with_exclusions,
    with_run_info,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            // Respect FORCE_COLOR environment variable
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            // Respect TERM=dumb
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            // Check if stdout is a TTY
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pith")]
#[command(about = "Records a Python script's imports and where each module lives")]
#[command(version)]
struct Args {
    /// Python script to scan
    script: PathBuf,

    /// Write the report to a timestamped log file instead of stdout
    #[arg(short, long)]
    log: bool,

    /// Directory the log file is written into (created if absent)
    #[arg(long = "log-dir", value_name = "DIR", default_value = ".")]
    log_dir: PathBuf,

    /// Output the report as JSON
    #[arg(long = "json", conflicts_with = "log")]
    json: bool,

    /// Python interpreter to run the probe under
    #[arg(long = "python", value_name = "BIN", default_value = DEFAULT_PYTHON)]
    python: String,

    /// Print the generated probe script instead of running it
    #[arg(long = "emit", conflicts_with_all = ["log", "json"])]
    emit: bool,

    /// Keep the generated probe script on disk after the run
    #[arg(short = 'k', long = "keep")]
    keep: bool,

    /// Skip import lines mentioning NAME (can be used multiple times)
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

fn main() {
    let args = Args::parse();

    let source = match std::fs::read_to_string(&args.script) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("pith: cannot read '{}': {}", args.script.display(), e);
            process::exit(1);
        }
    };

    let mut exclude: Vec<&str> = vec![SELF_TOKEN];
    exclude.extend(args.exclude.iter().map(String::as_str));
    let imports = strip_imports_with_exclusions(&source, &exclude);

    let probe_script = compose_probe(&imports, &args.script);

    if args.emit {
        print!("{}", probe_script);
        return;
    }

    let options = ProbeOptions {
        python: args.python.clone(),
        keep_script: args.keep,
        ..Default::default()
    };
    let script_display = args.script.display().to_string();

    let result = if args.log {
        let module = args
            .script
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("pith");
        let mut sink = match LogSink::create(module, &args.log_dir, true) {
            Ok(sink) => sink,
            Err(e) => {
                eprintln!(
                    "pith: cannot create log file under '{}': {}",
                    args.log_dir.display(),
                    e
                );
                process::exit(1);
            }
        };
        println!("log file: {}", sink.path().display());

        let env = RunEnv::capture(&args.python);
        let output = with_run_info(&mut sink, &env, || run_probe(&probe_script, &options));
        output.map(|output| {
            let records = parse_records(&output.stdout);
            sink.info(&format!("EXECUTING: {}", script_display));
            sink.info(" ");
            sink.info("IMPORTING:");
            for record in &records {
                sink.info(&format!("MODULE NAME: {}", record.name));
                sink.info(&format!("MODULE PATH: {}", record.path));
                sink.info(&format!(
                    "MODULE VERS: {}",
                    record.version.as_deref().unwrap_or("")
                ));
                sink.info(" ");
            }
            output.status
        })
    } else {
        run_probe(&probe_script, &options).and_then(|output| {
            let records = parse_records(&output.stdout);
            if args.json {
                let report = ProbeReport {
                    script: script_display.clone(),
                    modules: records,
                };
                print_json(&report)?;
            } else {
                print_report(&script_display, &records, should_use_color(args.color))?;
            }
            Ok(output.status)
        })
    };

    match result {
        Ok(status) if !status.success() => process::exit(status.code().unwrap_or(1)),
        Ok(_) => {}
        Err(e) => {
            eprintln!("pith: probe run failed: {}", e);
            process::exit(1);
        }
    }
}
