//! Filesystem finders: discover archives under a scan location and detect their licenses.
//!
//! This crate is allowed to do filesystem IO. It should not spawn external processes or reach the
//! network; ancestor metadata comes through the [`ArtifactResolver`] seam supplied by the caller.

#![forbid(unsafe_code)]

mod error;
mod java;
mod location;
mod manifest;
mod npm;
mod pom;
mod resolver;

use licenseguard_digest::DigestAlgorithm;
use licenseguard_domain::{Archive, KnowledgeBase};
use licenseguard_types::ArchiveType;
use std::sync::Arc;

pub use error::FinderError;
pub use java::JavaFinder;
pub use location::{FoundFile, ScanLocation, collect_files, simple_name};
pub use npm::NpmFinder;
pub use resolver::{ArtifactCoordinates, ArtifactResolver, NoopResolver, ResolvedMetadata};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    /// Parse arbitrary text as a JAR manifest and read the attributes the finder uses.
    pub fn parse_manifest(text: &str) {
        let m = crate::manifest::Manifest::parse(text);
        let _ = m.symbolic_name();
        let _ = m.bundle_licenses();
    }

    /// Parse arbitrary text as `pom.properties`.
    pub fn parse_properties(text: &str) -> usize {
        crate::manifest::parse_properties(text).len()
    }

    /// Parse arbitrary text as a `pom.xml`. **Never panics** on any input.
    pub fn parse_pom(text: &str) -> anyhow::Result<()> {
        crate::pom::parse_pom(text)?;
        Ok(())
    }

    /// Parse arbitrary bytes as `package.json` and extract declared licenses.
    pub fn parse_package_json(bytes: &[u8]) -> anyhow::Result<Vec<String>> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        Ok(crate::npm::declared_licenses(&value))
    }
}

/// Shared, read-only inputs of every finder.
#[derive(Clone)]
pub struct FinderContext {
    pub knowledge: Arc<KnowledgeBase>,
    pub digest_algorithm: DigestAlgorithm,
    /// Containers nested deeper than this are logged and skipped; 0 opens none.
    pub max_nesting_depth: usize,
    pub resolver: Arc<dyn ArtifactResolver>,
}

impl FinderContext {
    pub fn new(knowledge: Arc<KnowledgeBase>, digest_algorithm: DigestAlgorithm) -> Self {
        Self {
            knowledge,
            digest_algorithm,
            max_nesting_depth: 8,
            resolver: Arc::new(NoopResolver),
        }
    }
}

impl std::fmt::Debug for FinderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderContext")
            .field("licenses", &self.knowledge.len())
            .field("digest_algorithm", &self.digest_algorithm)
            .field("max_nesting_depth", &self.max_nesting_depth)
            .finish_non_exhaustive()
    }
}

/// Archives found in one scan location, in discovery order.
#[derive(Clone, Debug)]
pub struct FinderResult {
    pub scan_location: ScanLocation,
    pub archives: Vec<Archive>,
}

pub trait Finder: Send + Sync {
    fn archive_type(&self) -> ArchiveType;

    /// Scan the location given at construction. Only a bad scan location is an error.
    fn find_licenses(&self) -> Result<FinderResult, FinderError>;
}

/// The finder producing `archive_type` archives.
pub fn finder_for(
    archive_type: ArchiveType,
    location: ScanLocation,
    ctx: FinderContext,
) -> Box<dyn Finder> {
    match archive_type {
        ArchiveType::Java => Box::new(JavaFinder::new(location, ctx)),
        ArchiveType::JavaScript => Box::new(NpmFinder::new(location, ctx)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fuzz_parsers_never_panic(input in ".*") {
            fuzz::parse_manifest(&input);
            let _ = fuzz::parse_properties(&input);
            let _ = fuzz::parse_pom(&input);
            let _ = fuzz::parse_package_json(input.as_bytes());
        }
    }

    #[test]
    fn finder_for_matches_archive_type() {
        let ctx = FinderContext::new(Arc::new(KnowledgeBase::default()), DigestAlgorithm::Sha256);
        for t in [ArchiveType::Java, ArchiveType::JavaScript] {
            let finder = finder_for(t, ScanLocation::Files(Vec::new()), ctx.clone());
            assert_eq!(finder.archive_type(), t);
            let result = finder.find_licenses().expect("empty file list");
            assert!(result.archives.is_empty());
        }
    }
}
