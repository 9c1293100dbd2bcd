//! Seam to an external artifact repository that can supply metadata a container lacks.

use std::fmt;

/// Maven-style coordinates of a packaged library.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl fmt::Display for ArtifactCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Metadata inherited from parent or ancestor descriptors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub vendor: Option<String>,
    /// License names or URLs, looked up in the knowledge base by the caller.
    pub licenses: Vec<String>,
    pub documentation_url: Option<String>,
}

/// Resolves ancestor metadata. Implementations own their timeouts; errors are treated by
/// callers as "metadata unavailable".
pub trait ArtifactResolver: Send + Sync {
    fn resolve(&self, coordinates: &ArtifactCoordinates) -> anyhow::Result<Option<ResolvedMetadata>>;
}

/// Resolver that never knows anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopResolver;

impl ArtifactResolver for NoopResolver {
    fn resolve(&self, _coordinates: &ArtifactCoordinates) -> anyhow::Result<Option<ResolvedMetadata>> {
        Ok(None)
    }
}
