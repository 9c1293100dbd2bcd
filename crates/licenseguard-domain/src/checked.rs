//! Manually curated override list ("checked archives").
//!
//! The list is a headerless CSV with `#` comments:
//!
//! ```text
//! # type, mode, name, key, licenses[, provider[, notice]]
//! java, version, commons-io, 2.11.0, Apache-2.0
//! java, digest, dual, 3A4B…, MIT|Apache-2.0, apache
//! java, name-pattern, ignored, internal-.*\.jar, -
//! ```
//!
//! Licenses are separated by `|`, or by `,` inside a quoted field. Rows with bad data are logged
//! and skipped. An invalid pattern fails the whole load.

use crate::error::LoadError;
use crate::identifier::{ArchiveIdentifier, PatternTarget};
use crate::knowledge::KnowledgeBase;
use crate::license::{Notices, Providers};
use crate::model::{Archive, LicenseResult};
use licenseguard_digest::{DigestAlgorithm, DigestValue};
use licenseguard_types::{ArchiveType, ids};
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

const MIN_COLUMNS: usize = 5;
const MAX_COLUMNS: usize = 7;

/// Everything a row can refer to.
#[derive(Clone, Copy, Debug)]
pub struct CheckedArchivesContext<'a> {
    pub knowledge: &'a KnowledgeBase,
    pub providers: &'a Providers,
    pub notices: &'a Notices,
    pub digest_algorithm: DigestAlgorithm,
}

type VersionKey = (ArchiveType, String, String);
type DigestKey = (ArchiveType, String, DigestValue);

#[derive(Clone, Debug, Default)]
pub struct CheckedArchives {
    by_version: HashMap<VersionKey, LicenseResult>,
    by_digest: HashMap<DigestKey, LicenseResult>,
    patterns: Vec<(ArchiveIdentifier, LicenseResult)>,
}

enum Mode {
    Version,
    Digest,
    Pattern(PatternTarget),
}

impl CheckedArchives {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load<R: Read>(reader: R, ctx: &CheckedArchivesContext<'_>) -> Result<Self, LoadError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut out = CheckedArchives::default();
        for row in csv.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(LoadError::Csv(e)),
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    warn!(line, error = %e, "unreadable override row skipped");
                    continue;
                }
            };
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            if row.iter().all(str::is_empty) {
                continue;
            }
            out.insert_row(&row, line, ctx)?;
        }
        debug!(
            versions = out.by_version.len(),
            digests = out.by_digest.len(),
            patterns = out.patterns.len(),
            "override list loaded"
        );
        Ok(out)
    }

    fn insert_row(
        &mut self,
        row: &csv::StringRecord,
        line: u64,
        ctx: &CheckedArchivesContext<'_>,
    ) -> Result<(), LoadError> {
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&row.len()) {
            warn!(line, columns = row.len(), "override row has the wrong number of columns; skipped");
            return Ok(());
        }
        let field = |i: usize| row.get(i).unwrap_or_default();

        let archive_type = match field(0).parse::<ArchiveType>() {
            Ok(t) => t,
            Err(e) => {
                warn!(line, error = %e, "override row skipped");
                return Ok(());
            }
        };
        let mode = match field(1).to_ascii_lowercase().as_str() {
            ids::MODE_VERSION => Mode::Version,
            ids::MODE_DIGEST => Mode::Digest,
            ids::MODE_NAME_PATTERN => Mode::Pattern(PatternTarget::Name),
            ids::MODE_PATH_PATTERN => Mode::Pattern(PatternTarget::Path),
            other => {
                warn!(line, mode = other, "override row has an unknown mode; skipped");
                return Ok(());
            }
        };
        let (name, key) = (field(2), field(3));
        if key.is_empty() {
            warn!(line, "override row has an empty key; skipped");
            return Ok(());
        }
        let Some(result) = parse_result(row, line, ctx) else {
            return Ok(());
        };

        match mode {
            Mode::Version => {
                let k = (archive_type, name.to_string(), key.to_string());
                if self.by_version.insert(k, result).is_some() {
                    warn!(line, archive = name, version = key, "duplicate version override; the last row wins");
                }
            }
            Mode::Digest => {
                let digest = match DigestValue::from_hex(key) {
                    Ok(d) if d.len() == ctx.digest_algorithm.digest_length() => d,
                    Ok(d) => {
                        warn!(
                            line,
                            expected = ctx.digest_algorithm.digest_length(),
                            actual = d.len(),
                            algorithm = %ctx.digest_algorithm,
                            "override digest has the wrong length; skipped"
                        );
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(line, error = %e, "override digest is not valid hex; skipped");
                        return Ok(());
                    }
                };
                let k = (archive_type, name.to_string(), digest);
                if self.by_digest.insert(k, result).is_some() {
                    warn!(line, archive = name, "duplicate digest override; the last row wins");
                }
            }
            Mode::Pattern(target) => {
                let identifier = ArchiveIdentifier::pattern(archive_type, key, target)
                    .map_err(|source| LoadError::Pattern { line, source })?;
                self.patterns.push((identifier, result));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_version.len() + self.by_digest.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn manual_license_by_version(
        &self,
        archive_type: ArchiveType,
        name: &str,
        version: &str,
    ) -> Option<&LicenseResult> {
        self.by_version
            .get(&(archive_type, name.to_string(), version.to_string()))
    }

    pub fn manual_license_by_digest(
        &self,
        archive_type: ArchiveType,
        name: &str,
        digest: &DigestValue,
    ) -> Option<&LicenseResult> {
        self.by_digest
            .get(&(archive_type, name.to_string(), digest.clone()))
    }

    /// First pattern in file order that matches.
    pub fn manual_license_by_pattern(
        &self,
        archive_type: ArchiveType,
        file_name: &str,
        path: &str,
    ) -> Option<&LicenseResult> {
        self.patterns
            .iter()
            .find(|(id, _)| id.matches_name_or_path(archive_type, file_name, path))
            .map(|(_, r)| r)
    }

    /// Override for `archive`: digest first, then version, then patterns.
    pub fn lookup(&self, archive: &Archive) -> Option<&LicenseResult> {
        let by_digest = archive.digest.as_ref().and_then(|d| {
            self.manual_license_by_digest(archive.archive_type, &archive.name, d)
        });
        let by_version = || {
            archive.version.as_deref().and_then(|v| {
                self.manual_license_by_version(archive.archive_type, &archive.name, v)
            })
        };
        by_digest.or_else(by_version).or_else(|| {
            self.manual_license_by_pattern(
                archive.archive_type,
                &archive.file_name,
                archive.path.as_str(),
            )
        })
    }
}

/// Licenses, provider and notice columns. `None` when any reference is unknown.
fn parse_result(
    row: &csv::StringRecord,
    line: u64,
    ctx: &CheckedArchivesContext<'_>,
) -> Option<LicenseResult> {
    let licenses_field = row.get(4).unwrap_or_default();
    let mut result = if licenses_field == ids::NO_LICENSE_SENTINEL {
        LicenseResult::no_license()
    } else {
        let mut licenses = Vec::new();
        for id in licenses_field
            .split(['|', ','])
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match ctx.knowledge.license_by_spdx_identifier(id) {
                Some(l) => licenses.push(l),
                None => {
                    warn!(line, license = id, "override row names an unknown license; skipped");
                    return None;
                }
            }
        }
        if licenses.is_empty() {
            warn!(line, "override row lists no licenses; use '-' for none. Skipped");
            return None;
        }
        LicenseResult::new(licenses)
    };

    if let Some(id) = row.get(5).filter(|s| !s.is_empty()) {
        match ctx.providers.get(id) {
            Some(p) => result.provider = Some(p.clone()),
            None => {
                warn!(line, provider = id, "override row names an unknown provider; skipped");
                return None;
            }
        }
    }
    if let Some(id) = row.get(6).filter(|s| !s.is_empty()) {
        match ctx.notices.get(id) {
            Some(n) => result.notice = Some(n.clone()),
            None => {
                warn!(line, notice = id, "override row names an unknown notice; skipped");
                return None;
            }
        }
    }
    Some(result)
}
