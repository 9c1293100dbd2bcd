use camino::Utf8PathBuf;
use licenseguard_digest::DigestAlgorithm;
use licenseguard_types::{ArchiveType, LegalStatus};

/// Lowest archive legal status that fails the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    NotAccepted,
    Conflicting,
    Unknown,
    Never,
}

impl FailOn {
    pub fn parse(v: &str) -> anyhow::Result<Self> {
        match v.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "not_accepted" => Ok(FailOn::NotAccepted),
            "conflicting" => Ok(FailOn::Conflicting),
            "unknown" => Ok(FailOn::Unknown),
            "never" => Ok(FailOn::Never),
            other => anyhow::bail!(
                "unknown fail_on: {other} (expected not_accepted|conflicting|unknown|never)"
            ),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailOn::NotAccepted => "not_accepted",
            FailOn::Conflicting => "conflicting",
            FailOn::Unknown => "unknown",
            FailOn::Never => "never",
        }
    }

    /// Whether an archive with `status` fails the run.
    pub fn fails(self, status: LegalStatus) -> bool {
        let threshold = match self {
            FailOn::NotAccepted => LegalStatus::NotAccepted,
            FailOn::Conflicting => LegalStatus::Conflicting,
            FailOn::Unknown => LegalStatus::Unknown,
            FailOn::Never => return false,
        };
        status.severity_rank() >= threshold.severity_rank()
    }
}

/// Fully resolved settings the scan runs with.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveConfig {
    pub profile: String,
    pub digest_algorithm: DigestAlgorithm,
    pub licenses: Option<Utf8PathBuf>,
    pub providers: Option<Utf8PathBuf>,
    pub notices: Option<Utf8PathBuf>,
    pub checked_archives: Option<Utf8PathBuf>,
    pub max_nesting_depth: usize,
    pub fail_on: FailOn,
    pub finders: Vec<ArchiveType>,
}
