//! License knowledge base and the providers/notices lists.

use crate::error::LoadError;
use crate::license::{License, Notice, Notices, Provider, Providers};
use crate::matching::normalize_text;
use crate::xml::read_records;
use licenseguard_types::LegalStatus;
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, warn};

/// Parse `<licenses><license id="…">…</license></licenses>`.
///
/// Entries without an id or name, or with an unknown status, are logged and skipped. When an id
/// repeats, the last entry wins.
pub fn load_licenses<R: BufRead>(reader: R) -> Result<BTreeMap<String, License>, LoadError> {
    let mut out = BTreeMap::new();
    for record in read_records(reader, "license")? {
        let Some(id) = record
            .attribute("id")
            .or_else(|| record.field("id"))
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            warn!(position = record.position, "license entry without id skipped");
            continue;
        };
        let Some(name) = record.field("name") else {
            warn!(license = id, "license entry without name skipped");
            continue;
        };
        let legal_status = match record.field("status").map(str::parse::<LegalStatus>) {
            None => LegalStatus::Unknown,
            Some(Ok(status)) => status,
            Some(Err(e)) => {
                warn!(license = id, error = %e, "license entry with invalid status skipped");
                continue;
            }
        };

        let license = License {
            spdx_id: id.to_string(),
            name: name.to_string(),
            legal_status,
            author: record.field("author").map(str::to_string),
            version: record.field("version").map(str::to_string),
            url: record.field("url").map(str::to_string),
            text: record.field("text").unwrap_or_default().to_string(),
            notice: record.field("notice").map(str::to_string),
            aliases: record
                .fields_named("alias")
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
        };

        if out.insert(id.to_string(), license).is_some() {
            warn!(license = id, "duplicate license id; the last entry wins");
        }
    }
    debug!(count = out.len(), "licenses loaded");
    Ok(out)
}

/// Parse `<providers><provider id="…"><name/><url/></provider></providers>`.
pub fn load_providers<R: BufRead>(reader: R) -> Result<Providers, LoadError> {
    let mut out = Providers::new();
    for record in read_records(reader, "provider")? {
        let (Some(id), Some(name)) = (record.attribute("id"), record.field("name")) else {
            warn!(position = record.position, "provider entry without id or name skipped");
            continue;
        };
        let provider = Provider {
            id: id.to_string(),
            name: name.to_string(),
            url: record.field("url").map(str::to_string),
        };
        if out.insert(id.to_string(), Arc::new(provider)).is_some() {
            warn!(provider = id, "duplicate provider id; the last entry wins");
        }
    }
    Ok(out)
}

/// Parse `<notices><notice id="…">text</notice></notices>`.
pub fn load_notices<R: BufRead>(reader: R) -> Result<Notices, LoadError> {
    let mut out = Notices::new();
    for record in read_records(reader, "notice")? {
        let Some(id) = record.attribute("id") else {
            warn!(position = record.position, "notice entry without id skipped");
            continue;
        };
        let text = match record.field("text") {
            Some(t) => t.to_string(),
            None => record.text.trim().to_string(),
        };
        let notice = Notice {
            id: id.to_string(),
            text,
        };
        if out.insert(id.to_string(), Arc::new(notice)).is_some() {
            warn!(notice = id, "duplicate notice id; the last entry wins");
        }
    }
    Ok(out)
}

/// All known licenses, indexed for constant-time lookup by id, canonical text, and alias.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
    licenses: BTreeMap<String, Arc<License>>,
    by_text: HashMap<String, String>,
    by_alias: HashMap<String, String>,
}

impl KnowledgeBase {
    pub fn new(licenses: impl IntoIterator<Item = License>) -> Self {
        let mut kb = KnowledgeBase::default();
        for license in licenses {
            kb.insert(license);
        }
        kb
    }

    pub fn from_xml<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        Ok(Self::new(load_licenses(reader)?.into_values()))
    }

    fn insert(&mut self, license: License) {
        let id = license.spdx_id.clone();
        let normalized = normalize_text(&license.text);
        if !normalized.is_empty() {
            if let Some(previous) = self.by_text.get(&normalized)
                && previous != &id
            {
                warn!(
                    license = %id,
                    previous = %previous,
                    "two licenses share the same canonical text; the later one wins text matches"
                );
            }
            self.by_text.insert(normalized, id.clone());
        }

        let keys = std::iter::once(license.spdx_id.as_str())
            .chain(std::iter::once(license.name.as_str()))
            .chain(license.url.as_deref())
            .chain(license.aliases.iter().map(String::as_str));
        for key in keys {
            let key = alias_key(key);
            if !key.is_empty() {
                self.by_alias.entry(key).or_insert_with(|| id.clone());
            }
        }

        self.licenses.insert(id, Arc::new(license));
    }

    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }

    pub fn licenses(&self) -> impl Iterator<Item = &Arc<License>> {
        self.licenses.values()
    }

    pub fn license_by_spdx_identifier(&self, id: &str) -> Option<Arc<License>> {
        self.licenses.get(id.trim()).cloned()
    }

    /// Loose lookup used for metadata: SPDX id, display name, URL, or alias (case-insensitive;
    /// URL scheme, `www.` and trailing slashes ignored).
    pub fn license_by_name_or_url(&self, s: &str) -> Option<Arc<License>> {
        if let Some(l) = self.license_by_spdx_identifier(s) {
            return Some(l);
        }
        let id = self.by_alias.get(&alias_key(s))?;
        self.licenses.get(id).cloned()
    }

    pub(crate) fn license_by_normalized_text(&self, normalized: &str) -> Option<Arc<License>> {
        let id = self.by_text.get(normalized)?;
        self.licenses.get(id).cloned()
    }
}

fn alias_key(s: &str) -> String {
    let lower = s.trim().to_lowercase();
    let stripped = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let stripped = stripped.strip_prefix("www.").unwrap_or(stripped);
    let stripped = stripped.trim_end_matches('/');
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
