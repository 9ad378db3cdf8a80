//! mdx-preflight - Main Entry Point
//!
//! Command-line front end: fixes files in place, checks them in CI, or filters
//! stdin to stdout.

use clap::Parser;
use log::{error, info};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use mdx_preflight::config::{load_config, load_config_from, save_config, Settings};
use mdx_preflight::files::{collect_files, process_file};
use mdx_preflight::{list_default_rules, preprocess_with_stats, FixStats, PreprocessOptions};

/// Application name constant.
const APP_NAME: &str = "mdx-preflight";

/// Exit code when `--check` finds files that need fixing.
const EXIT_NEEDS_FIXES: u8 = 1;

/// Exit code for I/O or configuration failures.
const EXIT_FAILURE: u8 = 2;

/// Escape MDX-hostile prose and normalize code fence languages.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files or directories to process. Reads stdin and writes stdout when omitted.
    paths: Vec<PathBuf>,

    /// Rewrite files in place
    #[arg(short, long)]
    write: bool,

    /// Exit with status 1 if any file would change
    #[arg(long, conflicts_with = "write")]
    check: bool,

    /// Run only these rules (comma separated)
    #[arg(long, value_delimiter = ',')]
    enable: Option<Vec<String>>,

    /// Skip these rules (comma separated)
    #[arg(long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Apply prose rules inside code blocks and inline code too
    #[arg(long)]
    no_preserve_code: bool,

    /// Log per-rule fix counts
    #[arg(short, long)]
    debug: bool,

    /// Print the built-in rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Print `--list-rules` output as JSON
    #[arg(long, requires = "list_rules")]
    json: bool,

    /// Read settings from this file instead of the user config directory
    #[arg(long, env = "MDX_PREFLIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Print aggregated fix statistics as JSON to stderr
    #[arg(long)]
    stats: bool,

    /// Store the effective settings as the user defaults
    #[arg(long)]
    save_config: bool,
}

impl Args {
    /// Layer command-line flags over persisted settings.
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(enable) = &self.enable {
            settings.enable = Some(enable.clone());
        }
        settings.disable.extend(self.disable.iter().cloned());
        if self.no_preserve_code {
            settings.preserve_code_blocks = false;
        }
        if self.debug {
            settings.debug = true;
        }
        settings.sanitize();
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_rules {
        return print_rules(args.json);
    }

    let mut settings = match &args.config {
        Some(path) => match load_config_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                error!("{}", e);
                return ExitCode::from(EXIT_FAILURE);
            }
        },
        None => load_config(),
    };
    args.apply_to(&mut settings);

    if args.save_config {
        if let Err(e) = save_config(&settings) {
            error!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    let options = settings.to_options();

    if args.paths.is_empty() {
        run_stdin(&options, args.stats)
    } else {
        run_files(&args, &settings, &options)
    }
}

fn print_rules(json: bool) -> ExitCode {
    let rules = list_default_rules();

    if json {
        match serde_json::to_string_pretty(&rules) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                error!("Failed to serialize rules: {}", e);
                return ExitCode::from(EXIT_FAILURE);
            }
        }
    } else {
        for rule in &rules {
            println!("{:<32} {:<14} {}", rule.name, rule.scope.label(), rule.description);
        }
    }
    ExitCode::SUCCESS
}

fn run_stdin(options: &PreprocessOptions, print_stats: bool) -> ExitCode {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        error!("Failed to read stdin: {}", e);
        return ExitCode::from(EXIT_FAILURE);
    }

    let result = preprocess_with_stats(&input, options);

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout
        .write_all(result.text.as_bytes())
        .and_then(|()| stdout.flush())
    {
        error!("Failed to write stdout: {}", e);
        return ExitCode::from(EXIT_FAILURE);
    }

    if print_stats {
        report_stats(&result.stats);
    }
    ExitCode::SUCCESS
}

fn run_files(args: &Args, settings: &Settings, options: &PreprocessOptions) -> ExitCode {
    let files = collect_files(&args.paths, settings);
    let mut totals = FixStats::new();
    let mut changed = 0usize;
    let mut failures = 0usize;

    for path in &files {
        match process_file(path, options, args.write) {
            Ok(outcome) => {
                totals.merge(&outcome.stats);
                if outcome.changed {
                    changed += 1;
                    if !outcome.written {
                        println!(
                            "would fix {} ({})",
                            outcome.path.display(),
                            outcome.stats.format_compact()
                        );
                    }
                }
            }
            Err(e) => {
                error!("{}", e);
                failures += 1;
            }
        }
    }

    info!(
        "{}: {} file(s) checked, {} {}, {}",
        APP_NAME,
        files.len(),
        changed,
        if args.write { "fixed" } else { "need fixes" },
        totals.format_compact()
    );

    if args.stats {
        report_stats(&totals);
    }

    if failures > 0 {
        ExitCode::from(EXIT_FAILURE)
    } else if args.check && changed > 0 {
        ExitCode::from(EXIT_NEEDS_FIXES)
    } else {
        ExitCode::SUCCESS
    }
}

fn report_stats(stats: &FixStats) {
    match serde_json::to_string(stats) {
        Ok(json) => eprintln!("{}", json),
        Err(e) => error!("Failed to serialize statistics: {}", e),
    }
}
