//! License identification and evaluation (no filesystem IO).
//!
//! Input: license/provider/notice XML and the override CSV as caller-provided streams, plus
//! archives produced elsewhere.
//! Output: per-archive detection and legal verdicts.

#![forbid(unsafe_code)]

pub mod checked;
pub mod error;
pub mod identifier;
pub mod knowledge;
pub mod license;
pub mod matching;
pub mod model;

mod engine;
mod xml;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;

pub use checked::{CheckedArchives, CheckedArchivesContext};
pub use engine::{evaluate, evaluate_archive, legal_status_of, summarize};
pub use error::LoadError;
pub use identifier::{ArchiveIdentifier, ArchivePattern, IdentifierError, PatternTarget};
pub use knowledge::{KnowledgeBase, load_licenses, load_notices, load_providers};
pub use license::{License, Notice, Notices, Provider, Providers};
pub use matching::{TextMatch, extract_version, is_candidate_license_file, normalize_text};
pub use model::{Archive, DetectedLicense, Evaluation, LicenseResult};
