//! CLI entry point for licenseguard.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, I/O, and exit
//! codes. All business logic lives in the `licenseguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use licenseguard_app::{
    ScanInput, parse_report_json, render_summary, run_scan, runtime_error_report,
    verdict_exit_code, write_report,
};
use licenseguard_finder::ScanLocation;
use licenseguard_settings::Overrides;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "licenseguard.toml";

#[derive(Parser, Debug)]
#[command(
    name = "licenseguard",
    version,
    about = "License identification and compliance checks for packaged libraries"
)]
struct Cli {
    /// Path to licenseguard config TOML (default: ./licenseguard.toml if present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Override profile (strict|default|report).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// License knowledge base XML.
    #[arg(long, global = true)]
    licenses: Option<Utf8PathBuf>,

    /// Providers XML.
    #[arg(long, global = true)]
    providers: Option<Utf8PathBuf>,

    /// Notices XML.
    #[arg(long, global = true)]
    notices: Option<Utf8PathBuf>,

    /// Checked-archives override CSV.
    #[arg(long, global = true)]
    checked_archives: Option<Utf8PathBuf>,

    /// Content digest algorithm (SHA-1|SHA-256|SHA-384|SHA-512).
    #[arg(long, global = true)]
    digest_algorithm: Option<String>,

    /// Lowest legal status that fails the run (not_accepted|conflicting|unknown|never).
    #[arg(long, global = true)]
    fail_on: Option<String>,

    /// Archive types to scan (java|javascript); repeatable or comma separated.
    #[arg(long = "finder", global = true, value_delimiter = ',')]
    finders: Vec<String>,

    /// Deepest nested container to open.
    #[arg(long, global = true)]
    max_nesting_depth: Option<u32>,

    /// Log at debug level (RUST_LOG still wins).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan archives, evaluate their licenses, and write the report.
    Scan {
        /// A directory to walk, or an explicit list of files.
        #[arg(default_value = ".")]
        paths: Vec<Utf8PathBuf>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "licenseguard-report.json")]
        report_out: Utf8PathBuf,

        /// Do not print the summary to stdout.
        #[arg(long)]
        quiet: bool,
    },

    /// Print the summary of an existing JSON report.
    Summary {
        /// Path to the JSON report file.
        #[arg(long, default_value = "licenseguard-report.json")]
        report: Utf8PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.cmd {
        Commands::Scan {
            paths,
            report_out,
            quiet,
        } => cmd_scan(&cli, paths, report_out, *quiet),
        Commands::Summary { report } => cmd_summary(report),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "licenseguard=debug"
    } else {
        "licenseguard=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_scan(
    cli: &Cli,
    paths: &[Utf8PathBuf],
    report_out: &Utf8Path,
    quiet: bool,
) -> anyhow::Result<()> {
    let location = scan_location(paths);

    let result = (|| -> anyhow::Result<i32> {
        let (config_text, config_dir) = read_config(cli.config.as_deref())?;
        let input = ScanInput {
            location: location.clone(),
            config_text: &config_text,
            config_dir: config_dir.as_deref(),
            overrides: overrides(cli),
        };
        let output = run_scan(input)?;

        write_report(report_out, &output.report).context("write report json")?;
        if !quiet {
            print!("{}", render_summary(&output.report));
        }
        Ok(verdict_exit_code(&output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&location.describe(), &format!("{err:#}"));
            let _ = write_report(report_out, &report);
            eprintln!("licenseguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_summary(report_path: &Utf8Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&text)?;
    print!("{}", render_summary(&report));
    Ok(())
}

/// A single directory is walked; anything else is an explicit file list.
fn scan_location(paths: &[Utf8PathBuf]) -> ScanLocation {
    match paths {
        [] => ScanLocation::Directory(Utf8PathBuf::from(".")),
        [one] if one.is_dir() => ScanLocation::Directory(one.clone()),
        _ => ScanLocation::Files(paths.to_vec()),
    }
}

/// Config text and the directory its relative paths resolve against.
///
/// An explicit `--config` must be readable; the default file is optional.
fn read_config(path: Option<&Utf8Path>) -> anyhow::Result<(String, Option<Utf8PathBuf>)> {
    let path = match path {
        Some(p) => p,
        None if Utf8Path::new(DEFAULT_CONFIG).is_file() => Utf8Path::new(DEFAULT_CONFIG),
        None => return Ok((String::new(), None)),
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("read config: {path}"))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .map(Utf8Path::to_path_buf);
    Ok((text, dir))
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        digest_algorithm: cli.digest_algorithm.clone(),
        licenses: cli.licenses.clone(),
        providers: cli.providers.clone(),
        notices: cli.notices.clone(),
        checked_archives: cli.checked_archives.clone(),
        max_nesting_depth: cli.max_nesting_depth,
        fail_on: cli.fail_on.clone(),
        finders: (!cli.finders.is_empty()).then(|| cli.finders.clone()),
    }
}
