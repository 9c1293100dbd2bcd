//! `META-INF/MANIFEST.MF` and `pom.properties` parsing.

use std::collections::BTreeMap;

/// Main-section attributes of a JAR manifest.
///
/// Lines starting with a single space continue the previous value. The main section ends at the
/// first blank line; per-entry sections are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: BTreeMap<String, String>,
}

impl Manifest {
    pub fn parse(text: &str) -> Self {
        let mut attributes: BTreeMap<String, String> = BTreeMap::new();
        let mut last: Option<String> = None;
        for line in text.lines() {
            if line.is_empty() {
                if attributes.is_empty() {
                    continue;
                }
                break;
            }
            if let Some(rest) = line.strip_prefix(' ') {
                if let Some(value) = last.as_ref().and_then(|k| attributes.get_mut(k)) {
                    value.push_str(rest);
                }
                continue;
            }
            match line.split_once(':') {
                Some((key, value)) => {
                    let key = key.trim().to_string();
                    attributes.insert(key.clone(), value.trim_start().to_string());
                    last = Some(key);
                }
                None => last = None,
            }
        }
        Self { attributes }
    }

    /// Non-empty value of `key`; attribute names compare case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// `Bundle-SymbolicName` without `;directives`.
    pub fn symbolic_name(&self) -> Option<&str> {
        self.get("Bundle-SymbolicName")
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// `Bundle-License` clauses without parameters.
    pub fn bundle_licenses(&self) -> Vec<String> {
        self.get("Bundle-License")
            .map(split_header_clauses)
            .unwrap_or_default()
    }
}

/// Split an OSGi header into clauses on top-level commas, keeping each clause's first element.
fn split_header_clauses(value: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in value.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => clauses.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    clauses.push(current);

    clauses
        .iter()
        .filter_map(|clause| {
            let head = clause.split(';').next().unwrap_or_default();
            let head = head.trim().trim_matches('"').trim();
            (!head.is_empty()).then(|| head.to_string())
        })
        .collect()
}

/// `key=value` properties (Maven's `pom.properties`). `#`/`!` lines are comments.
pub fn parse_properties(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('!'))
        .filter_map(|l| {
            let idx = l.find(['=', ':'])?;
            let (k, v) = (l[..idx].trim(), l[idx + 1..].trim());
            (!k.is_empty()).then(|| (k.to_string(), v.to_string()))
        })
        .collect()
}
