use crate::model::LicenseguardConfigV1;
use crate::policy::{EffectiveConfig, FailOn};
use crate::presets;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use licenseguard_digest::DigestAlgorithm;
use licenseguard_types::ArchiveType;

/// Command-line values; each one set here beats the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub digest_algorithm: Option<String>,
    pub licenses: Option<Utf8PathBuf>,
    pub providers: Option<Utf8PathBuf>,
    pub notices: Option<Utf8PathBuf>,
    pub checked_archives: Option<Utf8PathBuf>,
    pub max_nesting_depth: Option<u32>,
    pub fail_on: Option<String>,
    pub finders: Option<Vec<String>>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: LicenseguardConfigV1,
    config_dir: Option<&Utf8Path>,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let mut effective = presets::preset(&profile)?;

    if let Some(name) = overrides
        .digest_algorithm
        .as_deref()
        .or(cfg.digest_algorithm.as_deref())
    {
        effective.digest_algorithm = name
            .parse::<DigestAlgorithm>()
            .with_context(|| format!("invalid digest_algorithm: {name}"))?;
    }

    let from_file = |p: &Option<String>| p.as_deref().map(|p| relative_to(config_dir, p));
    effective.licenses = overrides.licenses.or_else(|| from_file(&cfg.licenses));
    effective.providers = overrides.providers.or_else(|| from_file(&cfg.providers));
    effective.notices = overrides.notices.or_else(|| from_file(&cfg.notices));
    effective.checked_archives = overrides
        .checked_archives
        .or_else(|| from_file(&cfg.checked_archives));

    if let Some(depth) = overrides.max_nesting_depth.or(cfg.max_nesting_depth) {
        effective.max_nesting_depth = depth as usize;
    }

    if let Some(fail_on) = overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        effective.fail_on = FailOn::parse(fail_on)?;
    }

    if let Some(finders) = overrides.finders.or(cfg.finders) {
        effective.finders = parse_finders(&finders)?;
    }

    Ok(ResolvedConfig { effective })
}

fn relative_to(config_dir: Option<&Utf8Path>, path: &str) -> Utf8PathBuf {
    let path = Utf8Path::new(path);
    match config_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

fn parse_finders(names: &[String]) -> anyhow::Result<Vec<ArchiveType>> {
    let mut out = Vec::new();
    for name in names {
        let t = name
            .parse::<ArchiveType>()
            .with_context(|| format!("unknown finder: {name} (expected java|javascript)"))?;
        if !out.contains(&t) {
            out.push(t);
        }
    }
    if out.is_empty() {
        anyhow::bail!("finders must name at least one archive type");
    }
    Ok(out)
}
