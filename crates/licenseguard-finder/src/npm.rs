//! Script-package finder: one archive per `package.json` that names a package.

use crate::location::{FoundFile, ScanLocation, collect_files, simple_name};
use crate::{Finder, FinderContext, FinderError, FinderResult};
use camino::Utf8Path;
use licenseguard_domain::{Archive, TextMatch, is_candidate_license_file};
use licenseguard_types::{ArchiveType, ScanPath};
use serde_json::Value;
use tracing::{debug, info, warn};

const PACKAGE_JSON: &str = "package.json";

/// Tokens of an SPDX expression that are operators, not license ids.
const OPERATORS: &[&str] = &["OR", "AND"];

pub struct NpmFinder {
    location: ScanLocation,
    ctx: FinderContext,
}

impl NpmFinder {
    pub fn new(location: ScanLocation, ctx: FinderContext) -> Self {
        Self { location, ctx }
    }

    fn scan_manifest(&self, file: &FoundFile) -> Option<Archive> {
        let bytes = std::fs::read(&file.abs)
            .inspect_err(|e| warn!(path = %file.abs, error = %e, "unreadable package.json skipped"))
            .ok()?;
        let manifest: Value = serde_json::from_slice(&bytes)
            .inspect_err(|e| warn!(path = %file.abs, error = %e, "malformed package.json skipped"))
            .ok()?;
        let Some(name) = string_field(&manifest, "name") else {
            debug!(path = %file.abs, "package.json without a name skipped");
            return None;
        };

        let dir = file.abs.parent().unwrap_or(Utf8Path::new("."));
        let mut archive = Archive::new(ArchiveType::JavaScript, package_path(file, dir));
        archive.name = name.to_string();
        archive.version = string_field(&manifest, "version").map(str::to_string);
        archive.vendor = author_name(manifest.get("author"));
        archive.documentation_url = string_field(&manifest, "homepage").map(str::to_string);
        archive.digest = Some(self.ctx.digest_algorithm.digest_bytes(&bytes));

        for id in declared_licenses(&manifest) {
            match self.ctx.knowledge.license_by_name_or_url(&id) {
                Some(l) => archive.add_license(l, PACKAGE_JSON),
                None => debug!(package = %archive.name, license = %id, "unknown declared license"),
            }
        }
        self.apply_license_files(&mut archive, dir);

        debug!(
            path = %archive.path,
            name = %archive.name,
            licenses = archive.detected().len(),
            "package found"
        );
        Some(archive)
    }

    fn apply_license_files(&self, archive: &mut Archive, dir: &Utf8Path) {
        let mut files: Vec<_> = match dir.read_dir_utf8() {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
                .map(|e| e.path().to_path_buf())
                .filter(|p| is_candidate_license_file(simple_name(p.as_str())))
                .collect(),
            Err(e) => {
                warn!(path = %dir, error = %e, "package directory not readable");
                return;
            }
        };
        files.sort();

        for path in files {
            let entry = simple_name(path.as_str()).to_string();
            let text = match std::fs::read(&path) {
                Ok(raw) => String::from_utf8_lossy(&raw).into_owned(),
                Err(e) => {
                    warn!(path = %path, error = %e, "unreadable license file skipped");
                    continue;
                }
            };
            match self.ctx.knowledge.match_license_text(&text) {
                TextMatch::Exact(l) | TextMatch::Fallback(l) => archive.add_license(l, entry),
                TextMatch::None => archive.add_unmatched_license_file(entry),
            }
        }
    }
}

impl Finder for NpmFinder {
    fn archive_type(&self) -> ArchiveType {
        ArchiveType::JavaScript
    }

    fn find_licenses(&self) -> Result<FinderResult, FinderError> {
        let files = collect_files(&self.location, |name| name == PACKAGE_JSON)?;
        info!(manifests = files.len(), location = %self.location.describe(), "scanning npm packages");
        let archives = files.iter().filter_map(|f| self.scan_manifest(f)).collect();
        Ok(FinderResult {
            scan_location: self.location.clone(),
            archives,
        })
    }
}

/// The package directory's scan path; the directory name itself when the manifest sits at the
/// scan root.
fn package_path(file: &FoundFile, dir: &Utf8Path) -> ScanPath {
    let manifest_path = file.path.as_str();
    match manifest_path.rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => ScanPath::new(parent),
        _ => ScanPath::new(dir.file_name().unwrap_or(".")),
    }
}

fn string_field<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `"Jane Doe <jane@example.org> (https://example.org)"` or `{ "name": "Jane Doe" }`.
fn author_name(author: Option<&Value>) -> Option<String> {
    let name = match author? {
        Value::String(s) => s
            .split(['<', '('])
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        Value::Object(o) => o.get("name")?.as_str()?.trim().to_string(),
        _ => return None,
    };
    (!name.is_empty()).then_some(name)
}

/// License ids from `license` (SPDX expression or `{ "type" }`) and legacy `licenses`.
pub(crate) fn declared_licenses(manifest: &Value) -> Vec<String> {
    let mut out = Vec::new();
    match manifest.get("license") {
        Some(Value::String(expr)) => out.extend(expression_ids(expr)),
        Some(Value::Object(o)) => out.extend(o.get("type").and_then(Value::as_str).map(expression_ids).unwrap_or_default()),
        _ => {}
    }
    if let Some(Value::Array(items)) = manifest.get("licenses") {
        for item in items {
            let id = match item {
                Value::String(s) => Some(s.as_str()),
                Value::Object(o) => o.get("type").and_then(Value::as_str),
                _ => None,
            };
            out.extend(id.map(expression_ids).unwrap_or_default());
        }
    }
    let mut seen = Vec::new();
    out.retain(|id| {
        let fresh = !seen.contains(id);
        if fresh {
            seen.push(id.clone());
        }
        fresh
    });
    out
}

/// License ids in an SPDX expression; `WITH` exceptions are dropped.
fn expression_ids(expr: &str) -> Vec<String> {
    let cleaned = expr.replace(['(', ')'], " ");
    let mut tokens = cleaned.split_whitespace();
    let mut out = Vec::new();
    while let Some(token) = tokens.next() {
        if token.eq_ignore_ascii_case("WITH") {
            tokens.next();
            continue;
        }
        if OPERATORS.iter().any(|op| token.eq_ignore_ascii_case(op)) {
            continue;
        }
        out.push(token.trim_end_matches('+').to_string());
    }
    out
}
