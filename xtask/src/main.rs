//! Developer tasks (golden fixture checks and updates).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use licenseguard_test_util::normalize_nondeterministic;
use std::fs;
use std::path::{Path, PathBuf};

const FIXTURE_CONFIG: &str = "licenseguard.toml";
const GOLDEN_REPORT: &str = "expected.report.json";

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        return Ok(parent.to_path_buf());
    }
    Ok(manifest_dir)
}

fn licenseguard_bin(root: &Path) -> anyhow::Result<PathBuf> {
    let bin = root.join("target").join("debug").join("licenseguard");

    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "licenseguard binary not found at {}.\n\
            Run `cargo build -p licenseguard-cli` first.",
            bin.display()
        );
    }
    Ok(bin)
}

/// Fixture directories under `tests/fixtures` that carry their own config.
fn fixture_dirs(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let fixtures = root.join("tests").join("fixtures");
    let mut dirs = Vec::new();
    for entry in fs::read_dir(&fixtures).context("read tests/fixtures/")? {
        let path = entry?.path();
        if path.is_dir() && path.join(FIXTURE_CONFIG).exists() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn fixture_name(dir: &Path) -> String {
    dir.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Run the CLI on `fixture` and return the normalized report.
fn scan_fixture(bin: &Path, fixture: &Path) -> anyhow::Result<serde_json::Value> {
    let temp_dir = tempfile::tempdir().context("create temp dir")?;
    let report_out = temp_dir.path().join("report.json");

    let output = std::process::Command::new(bin)
        .current_dir(temp_dir.path())
        .arg("--config")
        .arg(fixture.join(FIXTURE_CONFIG))
        .arg("scan")
        .arg("--quiet")
        .arg(fixture)
        .arg("--report-out")
        .arg(&report_out)
        .output()
        .with_context(|| format!("run licenseguard on fixture '{}'", fixture_name(fixture)))?;

    // 0 and 2 both mean a report was produced; 1 is a runtime error.
    if !matches!(output.status.code(), Some(0) | Some(2)) {
        bail!(
            "fixture '{}': licenseguard exited with {:?}: {}",
            fixture_name(fixture),
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let text = fs::read_to_string(&report_out)
        .with_context(|| format!("fixture '{}': no report written", fixture_name(fixture)))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse report for fixture '{}'", fixture_name(fixture)))?;
    Ok(normalize_nondeterministic(value))
}

fn check_goldens() -> anyhow::Result<()> {
    let root = project_root()?;
    let bin = licenseguard_bin(&root)?;
    let mut errors = Vec::new();

    for fixture in fixture_dirs(&root)? {
        let name = fixture_name(&fixture);
        let golden_path = fixture.join(GOLDEN_REPORT);
        if !golden_path.exists() {
            errors.push(format!("fixture '{name}': missing {GOLDEN_REPORT}"));
            continue;
        }
        let actual = scan_fixture(&bin, &fixture)?;
        let golden: serde_json::Value = serde_json::from_str(&fs::read_to_string(&golden_path)?)
            .with_context(|| format!("parse {}", golden_path.display()))?;
        if actual == golden {
            println!("  ok fixture '{name}' matches {GOLDEN_REPORT}");
        } else {
            errors.push(format!("fixture '{name}': output differs from {GOLDEN_REPORT}"));
        }
    }

    if !errors.is_empty() {
        eprintln!("\nGolden report errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("golden check failed with {} errors", errors.len());
    }
    Ok(())
}

fn update_goldens() -> anyhow::Result<()> {
    let root = project_root()?;
    let bin = licenseguard_bin(&root)?;

    for fixture in fixture_dirs(&root)? {
        let report = scan_fixture(&bin, &fixture)?;
        let golden_path = fixture.join(GOLDEN_REPORT);
        let mut text = serde_json::to_string_pretty(&report)?;
        text.push('\n');
        fs::write(&golden_path, text)
            .with_context(|| format!("write {}", golden_path.display()))?;
        println!("  wrote {}", golden_path.display());
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        "xtask commands:\n\
         \x20 check-goldens    Scan every fixture with a {FIXTURE_CONFIG} and compare to {GOLDEN_REPORT}\n\
         \x20 update-goldens   Rewrite {GOLDEN_REPORT} for every fixture\n\
         \x20 help             Show this message"
    );
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "check-goldens" => check_goldens(),
        "update-goldens" => update_goldens(),
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
