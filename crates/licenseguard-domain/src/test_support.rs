use crate::license::License;
use crate::model::Archive;
use licenseguard_types::{ArchiveType, LegalStatus, ScanPath};
use std::sync::Arc;

pub fn license(id: &str, status: LegalStatus) -> Arc<License> {
    Arc::new(License::new(id, format!("{id} License"), status))
}

/// Java archive at `path`; name and version are left for the test to set.
pub fn archive(path: &str) -> Archive {
    Archive::new(ArchiveType::Java, ScanPath::new(path))
}
