//! Candidate license file detection and license text matching.

use crate::knowledge::KnowledgeBase;
use crate::license::License;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use licenseguard_types::LegalStatus;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;

const CANDIDATE_GLOBS: &[&str] = &[
    "license",
    "license.*",
    "license-*",
    "licence",
    "licence.*",
    "copying",
    "copying.*",
    "unlicense",
    "unlicense.*",
    "mit-license*",
];

static CANDIDATES: LazyLock<GlobSet> = LazyLock::new(|| {
    let mut builder = GlobSetBuilder::new();
    for glob in CANDIDATE_GLOBS
        .iter()
        .filter_map(|g| GlobBuilder::new(g).case_insensitive(true).build().ok())
    {
        builder.add(glob);
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
});

static VERSION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*VERSION (\d+(\.\d+)?).*$").expect("static regex")
});

static VERSION_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^.* V (\d+(\.\d+)?).*$").expect("static regex"));

/// Lines after a family hint that may still carry its version.
const VERSION_LOOKAHEAD: usize = 3;

/// Family hints in match order; more specific titles come before the ones they contain.
const FAMILIES: &[(&str, &str, &str)] = &[
    (
        "GNU LESSER GENERAL PUBLIC LICENSE",
        "LGPL",
        "GNU Lesser General Public License",
    ),
    (
        "GNU LIBRARY GENERAL PUBLIC LICENSE",
        "LGPL",
        "GNU Library General Public License",
    ),
    (
        "GNU AFFERO GENERAL PUBLIC LICENSE",
        "AGPL",
        "GNU Affero General Public License",
    ),
    (
        "GNU GENERAL PUBLIC LICENSE",
        "GPL",
        "GNU General Public License",
    ),
    ("APACHE LICENSE", "Apache", "Apache License"),
    ("MOZILLA PUBLIC LICENSE", "MPL", "Mozilla Public License"),
    ("ECLIPSE PUBLIC LICENSE", "EPL", "Eclipse Public License"),
    (
        "COMMON DEVELOPMENT AND DISTRIBUTION LICENSE",
        "CDDL",
        "Common Development and Distribution License",
    ),
    ("ARTISTIC LICENSE", "Artistic", "Artistic License"),
];

/// Whether a file's simple name looks like a conventional license file.
pub fn is_candidate_license_file(simple_name: &str) -> bool {
    CANDIDATES.is_match(simple_name)
}

/// Lower-case, collapse whitespace runs to one space, trim.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Version token from a line such as `Version 2, June 1991` or `GPL v 3`.
pub fn extract_version(line: &str) -> Option<String> {
    [&*VERSION_WORD, &*VERSION_LETTER]
        .iter()
        .find_map(|re| re.captures(line))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextMatch {
    /// Normalized text equals a known license's canonical text.
    Exact(Arc<License>),
    /// Selected from a family hint and version token; may be an ad-hoc entry.
    Fallback(Arc<License>),
    None,
}

impl TextMatch {
    pub fn license(&self) -> Option<&Arc<License>> {
        match self {
            TextMatch::Exact(l) | TextMatch::Fallback(l) => Some(l),
            TextMatch::None => None,
        }
    }
}

impl KnowledgeBase {
    pub fn match_license_text(&self, text: &str) -> TextMatch {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return TextMatch::None;
        }
        if let Some(license) = self.license_by_normalized_text(&normalized) {
            return TextMatch::Exact(license);
        }
        match self.match_family_hint(text) {
            Some(license) => TextMatch::Fallback(license),
            None => TextMatch::None,
        }
    }

    fn match_family_hint(&self, text: &str) -> Option<Arc<License>> {
        let lines: Vec<&str> = text.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            let upper = line.to_uppercase();
            let Some((_, family, title)) = FAMILIES.iter().find(|(hint, _, _)| upper.contains(hint))
            else {
                continue;
            };
            let end = (i + 1 + VERSION_LOOKAHEAD).min(lines.len());
            let Some(version) = lines[i..end].iter().find_map(|l| extract_version(l)) else {
                continue;
            };

            let candidates = [
                format!("{family}-{version}"),
                format!("{family}-{version}.0"),
                format!("{family}-{version}-only"),
                format!("{family}-{version}.0-only"),
            ];
            if let Some(license) = candidates
                .iter()
                .find_map(|id| self.license_by_spdx_identifier(id))
            {
                debug!(license = %license.spdx_id, "license selected from family hint");
                return Some(license);
            }

            let id = format!("{family}-{version}");
            debug!(license = %id, "unknown license version; using an ad-hoc entry");
            return Some(Arc::new(License::new(
                id,
                format!("{title} {version}"),
                LegalStatus::Unknown,
            )));
        }
        None
    }
}
