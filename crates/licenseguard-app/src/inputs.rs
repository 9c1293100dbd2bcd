//! Loading of the knowledge base, provider and notice lists, and the override list.

use anyhow::Context;
use camino::Utf8Path;
use licenseguard_domain::{
    CheckedArchives, CheckedArchivesContext, KnowledgeBase, Notices, Providers, load_notices,
    load_providers,
};
use licenseguard_settings::EffectiveConfig;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tracing::info;

/// Everything the scan reads before touching the scan location. Immutable once loaded.
#[derive(Debug)]
pub struct Inputs {
    pub knowledge: Arc<KnowledgeBase>,
    pub providers: Providers,
    pub notices: Notices,
    pub checked: CheckedArchives,
}

/// Load the inputs named by `cfg`. The license knowledge base is required; the rest are optional.
pub fn load_inputs(cfg: &EffectiveConfig) -> anyhow::Result<Inputs> {
    let licenses = cfg
        .licenses
        .as_deref()
        .context("no license knowledge base configured (set `licenses` or pass --licenses)")?;
    let knowledge = KnowledgeBase::from_xml(open(licenses)?)
        .with_context(|| format!("load licenses: {licenses}"))?;

    let providers = match cfg.providers.as_deref() {
        Some(path) => {
            load_providers(open(path)?).with_context(|| format!("load providers: {path}"))?
        }
        None => Providers::new(),
    };
    let notices = match cfg.notices.as_deref() {
        Some(path) => load_notices(open(path)?).with_context(|| format!("load notices: {path}"))?,
        None => Notices::new(),
    };

    let checked = match cfg.checked_archives.as_deref() {
        Some(path) => {
            let ctx = CheckedArchivesContext {
                knowledge: &knowledge,
                providers: &providers,
                notices: &notices,
                digest_algorithm: cfg.digest_algorithm,
            };
            CheckedArchives::load(open(path)?, &ctx)
                .with_context(|| format!("load checked archives: {path}"))?
        }
        None => CheckedArchives::empty(),
    };

    info!(
        licenses = knowledge.len(),
        providers = providers.len(),
        notices = notices.len(),
        overrides = checked.len(),
        "inputs loaded"
    );

    Ok(Inputs {
        knowledge: Arc::new(knowledge),
        providers,
        notices,
        checked,
    })
}

fn open(path: &Utf8Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("open: {path}"))?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use licenseguard_settings::{LicenseguardConfigV1, Overrides, resolve_config};

    const LICENSES: &str = r#"<licenses>
  <license id="MIT">
    <name>MIT License</name>
    <status>ACCEPTED</status>
    <text>Permission is hereby granted</text>
  </license>
</licenses>"#;

    fn write_file(dir: &Utf8Path, name: &str, contents: &str) -> Utf8PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    fn config(overrides: Overrides) -> EffectiveConfig {
        resolve_config(LicenseguardConfigV1::default(), None, overrides)
            .expect("resolve")
            .effective
    }

    #[test]
    fn missing_knowledge_base_is_an_error() {
        let err = load_inputs(&config(Overrides::default())).expect_err("licenses required");
        assert!(err.to_string().contains("no license knowledge base"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8");
        let missing = dir.join("nope.xml");
        let err = load_inputs(&config(Overrides {
            licenses: Some(missing.clone()),
            ..Overrides::default()
        }))
        .expect_err("missing file");
        assert!(format!("{err:#}").contains(missing.as_str()));
    }

    #[test]
    fn loads_all_inputs() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8");
        let licenses = write_file(dir, "licenses.xml", LICENSES);
        let providers = write_file(
            dir,
            "providers.xml",
            r#"<providers><provider id="acme"><name>Acme Corp</name></provider></providers>"#,
        );
        let checked = write_file(dir, "checked.csv", "java, version, a, 1.0, MIT, acme\n");

        let inputs = load_inputs(&config(Overrides {
            licenses: Some(licenses),
            providers: Some(providers),
            checked_archives: Some(checked),
            ..Overrides::default()
        }))
        .expect("load");
        assert_eq!(inputs.knowledge.len(), 1);
        assert_eq!(inputs.providers.len(), 1);
        assert!(inputs.notices.is_empty());
        assert_eq!(inputs.checked.len(), 1);
    }

    #[test]
    fn malformed_knowledge_base_is_fatal() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8");
        let licenses = write_file(dir, "licenses.xml", "<licenses><license></licenses>");
        let err = load_inputs(&config(Overrides {
            licenses: Some(licenses),
            ..Overrides::default()
        }))
        .expect_err("malformed xml");
        assert!(err.to_string().starts_with("load licenses"));
    }
}
