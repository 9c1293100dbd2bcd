//! The `scan` use case: find archives, evaluate them, and produce a report.

use crate::inputs::load_inputs;
use anyhow::Context;
use camino::Utf8Path;
use licenseguard_domain::{Archive, evaluate, summarize};
use licenseguard_finder::{
    ArtifactResolver, FinderContext, NoopResolver, ScanLocation, finder_for,
};
use licenseguard_settings::{FailOn, LicenseguardConfigV1, Overrides, ResolvedConfig};
use licenseguard_types::{SCHEMA_REPORT_V1, ScanReport, ToolMeta, Verdict, ids};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

/// Input for the scan use case.
#[derive(Clone, Debug)]
pub struct ScanInput<'a> {
    /// What to scan.
    pub location: ScanLocation,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Directory relative config paths resolve against.
    pub config_dir: Option<&'a Utf8Path>,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the scan use case.
#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub report: ScanReport,
    /// Evaluated archives, in report order.
    pub archives: Vec<Archive>,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the scan without ancestor metadata resolution.
pub fn run_scan(input: ScanInput<'_>) -> anyhow::Result<ScanOutput> {
    run_scan_with(input, Arc::new(NoopResolver))
}

/// Run the scan use case: parse config, load inputs, run finders, evaluate, produce report.
pub fn run_scan_with(
    input: ScanInput<'_>,
    resolver: Arc<dyn ArtifactResolver>,
) -> anyhow::Result<ScanOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        LicenseguardConfigV1::default()
    } else {
        licenseguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved =
        licenseguard_settings::resolve_config(cfg, input.config_dir, input.overrides.clone())
            .context("resolve config")?;
    let effective = &resolved.effective;

    let inputs = load_inputs(effective)?;
    let ctx = FinderContext {
        knowledge: inputs.knowledge.clone(),
        digest_algorithm: effective.digest_algorithm,
        max_nesting_depth: effective.max_nesting_depth,
        resolver,
    };

    let mut archives = Vec::new();
    for archive_type in &effective.finders {
        let finder = finder_for(*archive_type, input.location.clone(), ctx.clone());
        let result = finder
            .find_licenses()
            .with_context(|| format!("{archive_type} finder"))?;
        archives.extend(result.archives);
    }

    evaluate(&mut archives, &inputs.checked);
    let counts = summarize(&archives);
    let (verdict, reasons) = verdict_for(&archives, effective.fail_on);

    info!(
        archives = archives.len(),
        accepted = counts.accepted,
        not_accepted = counts.not_accepted,
        conflicting = counts.conflicting,
        unknown = counts.unknown,
        verdict = ?verdict,
        "scan finished"
    );

    let report = ScanReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        scan_location: input.location.describe(),
        verdict,
        reasons,
        counts,
        archives: archives.iter().map(Archive::to_record).collect(),
    };

    Ok(ScanOutput {
        report,
        archives,
        resolved_config: resolved,
    })
}

/// `Fail` with one reason per archive at or beyond the threshold; `Pass` otherwise.
pub fn verdict_for(archives: &[Archive], fail_on: FailOn) -> (Verdict, Vec<String>) {
    let reasons: Vec<String> = archives
        .iter()
        .filter_map(|a| {
            let status = a.legal_status()?;
            fail_on
                .fails(status)
                .then(|| format!("{}: {}", a.path, status.as_str()))
        })
        .collect();
    let verdict = if reasons.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    (verdict, reasons)
}

/// Map verdict to exit code: 0 = pass, 2 = fail.
pub fn verdict_exit_code(verdict: &Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}
