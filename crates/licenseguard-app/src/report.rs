use anyhow::Context;
use camino::Utf8Path;
use licenseguard_types::{
    LegalCounts, LegalStatus, SCHEMA_REPORT_V1, ScanReport, ToolMeta, Verdict, ids,
};
use std::fmt::Write as _;
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ScanReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;
    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }
    serde_json::from_value(value).context("parse licenseguard report")
}

pub fn serialize_report(report: &ScanReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Serialize `report` to `path`, creating parent directories.
pub fn write_report(path: &Utf8Path, report: &ScanReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

/// Report for a run that could not complete: failing, with the error as the only reason.
pub fn runtime_error_report(scan_location: &str, message: &str) -> ScanReport {
    let now = OffsetDateTime::now_utc();
    ScanReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        scan_location: scan_location.to_string(),
        verdict: Verdict::Fail,
        reasons: vec![format!("{}: {message}", ids::CODE_RUNTIME_ERROR)],
        counts: LegalCounts::default(),
        archives: Vec::new(),
    }
}

/// Plain-text summary: the verdict, counts per legal status, then every archive that is not
/// accepted.
pub fn render_summary(report: &ScanReport) -> String {
    let mut out = String::new();
    let verdict = match report.verdict {
        Verdict::Pass => "PASS",
        Verdict::Fail => "FAIL",
    };
    let c = &report.counts;
    let _ = writeln!(
        out,
        "licenseguard: {verdict} ({} archives: {} accepted, {} not accepted, {} conflicting, {} unknown)",
        c.total(),
        c.accepted,
        c.not_accepted,
        c.conflicting,
        c.unknown
    );
    for a in report
        .archives
        .iter()
        .filter(|a| a.legal_status != LegalStatus::Accepted)
    {
        let licenses = if a.resulting_licenses.is_empty() {
            "-".to_string()
        } else {
            a.resulting_licenses.join(", ")
        };
        let _ = writeln!(
            out,
            "  {:<12} {} [{}]",
            a.legal_status.as_str(),
            a.path,
            licenses
        );
    }
    for reason in report
        .reasons
        .iter()
        .filter(|r| r.starts_with(ids::CODE_RUNTIME_ERROR))
    {
        let _ = writeln!(out, "  {reason}");
    }
    out
}
