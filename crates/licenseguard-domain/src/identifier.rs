//! The three ways an archive can be named in the override list.

use crate::model::Archive;
use licenseguard_digest::DigestValue;
use licenseguard_types::ArchiveType;
use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    #[error("invalid archive pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// What a pattern identifier is matched against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternTarget {
    /// The archive's simple file name.
    Name,
    /// The archive's full path in the scan tree.
    Path,
}

/// Compiled pattern. Equality and hashing use the source text.
#[derive(Clone)]
pub struct ArchivePattern {
    source: String,
    regex: Regex,
}

impl ArchivePattern {
    /// Compile `source` so that it must match the whole input.
    pub fn new(source: &str) -> Result<Self, IdentifierError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            IdentifierError::InvalidPattern {
                pattern: source.to_string(),
                source: e,
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}

impl fmt::Debug for ArchivePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArchivePattern").field(&self.source).finish()
    }
}

impl PartialEq for ArchivePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for ArchivePattern {}

impl Hash for ArchivePattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

/// Structural, variant-aware identity: two identifiers are equal only when they share the
/// archive type, the variant, and the payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveIdentifier {
    Version {
        archive_type: ArchiveType,
        name: String,
        version: String,
    },
    Digest {
        archive_type: ArchiveType,
        name: String,
        digest: DigestValue,
    },
    Pattern {
        archive_type: ArchiveType,
        pattern: ArchivePattern,
        target: PatternTarget,
    },
}

impl ArchiveIdentifier {
    pub fn version(
        archive_type: ArchiveType,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ArchiveIdentifier::Version {
            archive_type,
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn digest(archive_type: ArchiveType, name: impl Into<String>, digest: DigestValue) -> Self {
        ArchiveIdentifier::Digest {
            archive_type,
            name: name.into(),
            digest,
        }
    }

    /// Compiles eagerly; a bad pattern is rejected here rather than at match time.
    pub fn pattern(
        archive_type: ArchiveType,
        pattern: &str,
        target: PatternTarget,
    ) -> Result<Self, IdentifierError> {
        Ok(ArchiveIdentifier::Pattern {
            archive_type,
            pattern: ArchivePattern::new(pattern)?,
            target,
        })
    }

    pub fn archive_type(&self) -> ArchiveType {
        match self {
            ArchiveIdentifier::Version { archive_type, .. }
            | ArchiveIdentifier::Digest { archive_type, .. }
            | ArchiveIdentifier::Pattern { archive_type, .. } => *archive_type,
        }
    }

    /// Name for version/digest identifiers, the pattern source for pattern identifiers.
    pub fn name(&self) -> &str {
        match self {
            ArchiveIdentifier::Version { name, .. } | ArchiveIdentifier::Digest { name, .. } => {
                name
            }
            ArchiveIdentifier::Pattern { pattern, .. } => pattern.as_str(),
        }
    }

    /// Pattern test against already extracted archive name and path.
    pub fn matches_name_or_path(&self, archive_type: ArchiveType, file_name: &str, path: &str) -> bool {
        match self {
            ArchiveIdentifier::Pattern {
                archive_type: t,
                pattern,
                target,
            } => {
                *t == archive_type
                    && match target {
                        PatternTarget::Name => pattern.is_match(file_name),
                        PatternTarget::Path => pattern.is_match(path),
                    }
            }
            _ => false,
        }
    }

    pub fn matches(&self, archive: &Archive) -> bool {
        if self.archive_type() != archive.archive_type {
            return false;
        }
        match self {
            ArchiveIdentifier::Version { name, version, .. } => {
                archive.name == *name && archive.version.as_deref() == Some(version.as_str())
            }
            ArchiveIdentifier::Digest { name, digest, .. } => {
                archive.name == *name && archive.digest.as_ref() == Some(digest)
            }
            ArchiveIdentifier::Pattern { .. } => self.matches_name_or_path(
                archive.archive_type,
                &archive.file_name,
                archive.path.as_str(),
            ),
        }
    }
}
