use crate::policy::{EffectiveConfig, FailOn};
use licenseguard_digest::DigestAlgorithm;
use licenseguard_types::ArchiveType;

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 8;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    let fail_on = match profile {
        "strict" => FailOn::Unknown,
        "default" => FailOn::Conflicting,
        "report" => FailOn::Never,
        other => anyhow::bail!("unknown profile: {other} (expected strict|default|report)"),
    };
    Ok(EffectiveConfig {
        profile: profile.to_string(),
        digest_algorithm: DigestAlgorithm::default(),
        licenses: None,
        providers: None,
        notices: None,
        checked_archives: None,
        max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        fail_on,
        finders: vec![ArchiveType::Java, ArchiveType::JavaScript],
    })
}
