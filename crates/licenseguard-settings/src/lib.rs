//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod policy;
mod presets;
mod resolve;

use camino::Utf8Path;

pub use model::LicenseguardConfigV1;
pub use policy::{EffectiveConfig, FailOn};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `licenseguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<LicenseguardConfigV1> {
    let cfg: LicenseguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config (preset, then file, then overrides).
///
/// Relative paths from the file are joined to `config_dir`; paths in `overrides` are used as given.
pub fn resolve_config(
    cfg: LicenseguardConfigV1,
    config_dir: Option<&Utf8Path>,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, config_dir, overrides)
}
