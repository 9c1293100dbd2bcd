//! npm finder tests against package trees written at test time.

use camino::{Utf8Path, Utf8PathBuf};
use licenseguard_digest::DigestAlgorithm;
use licenseguard_domain::{KnowledgeBase, License};
use licenseguard_finder::{Finder, FinderContext, NpmFinder, ScanLocation};
use licenseguard_types::{ArchiveType, LegalStatus};
use std::sync::Arc;
use tempfile::TempDir;

const ISC_TEXT: &str = "Permission to use, copy, modify, and/or distribute this software for any purpose";

fn ctx() -> FinderContext {
    let mut isc = License::new("ISC", "ISC License", LegalStatus::Accepted);
    isc.text = ISC_TEXT.to_string();
    let kb = KnowledgeBase::new(vec![
        isc,
        License::new("MIT", "MIT License", LegalStatus::Accepted),
        License::new("Apache-2.0", "Apache License 2.0", LegalStatus::Accepted),
    ]);
    FinderContext::new(Arc::new(kb), DigestAlgorithm::Sha1)
}

fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
}

fn write_file(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, contents).expect("write file");
}

#[test]
fn packages_with_declared_and_file_licenses() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    let manifest = r#"{
  "name": "left-pad",
  "version": "1.3.0",
  "license": "(MIT OR Apache-2.0)",
  "author": "Jane Doe <jane@example.org>",
  "homepage": "https://example.org/left-pad"
}"#;
    write_file(&root.join("node_modules/left-pad/package.json"), manifest);
    write_file(&root.join("node_modules/left-pad/LICENSE"), ISC_TEXT);
    write_file(&root.join("node_modules/left-pad/README.md"), "# left-pad");

    let result = NpmFinder::new(ScanLocation::Directory(root.clone()), ctx())
        .find_licenses()
        .expect("scan");
    assert_eq!(result.archives.len(), 1);
    let a = &result.archives[0];
    assert_eq!(a.archive_type, ArchiveType::JavaScript);
    assert_eq!(a.file_name, "left-pad");
    assert_eq!(a.path.as_str(), "node_modules/left-pad");
    assert_eq!(a.name, "left-pad");
    assert_eq!(a.version.as_deref(), Some("1.3.0"));
    assert_eq!(a.vendor.as_deref(), Some("Jane Doe"));
    assert_eq!(a.documentation_url.as_deref(), Some("https://example.org/left-pad"));
    assert_eq!(
        a.digest.as_ref(),
        Some(&DigestAlgorithm::Sha1.digest_bytes(manifest.as_bytes()))
    );

    let ids: Vec<&str> = a.detected().iter().map(|d| d.license.spdx_id.as_str()).collect();
    assert_eq!(ids, vec!["MIT", "Apache-2.0", "ISC"]);
    assert_eq!(a.detected_license_paths("ISC"), &["LICENSE".to_string()]);
    assert_eq!(a.detected_license_paths("MIT"), &["package.json".to_string()]);
}

#[test]
fn unnamed_and_malformed_manifests_are_skipped() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    write_file(&root.join("a/package.json"), r#"{ "private": true }"#);
    write_file(&root.join("b/package.json"), "{ not json");
    write_file(&root.join("c/package.json"), r#"{ "name": "c", "license": "WTFPL" }"#);
    write_file(&root.join("c/COPYING"), "Do what you want.");

    let result = NpmFinder::new(ScanLocation::Directory(root), ctx())
        .find_licenses()
        .expect("scan");
    assert_eq!(result.archives.len(), 1);
    let c = &result.archives[0];
    assert_eq!(c.name, "c");
    assert!(!c.has_detected_licenses());
    assert_eq!(c.unmatched_license_files, vec!["COPYING".to_string()]);
}

#[test]
fn manifest_at_scan_root_uses_the_directory_name() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp).join("my-app");
    write_file(&root.join("package.json"), r#"{ "name": "my-app", "version": "0.1.0" }"#);

    let result = NpmFinder::new(ScanLocation::Directory(root), ctx())
        .find_licenses()
        .expect("scan");
    assert_eq!(result.archives[0].file_name, "my-app");
    assert_eq!(result.archives[0].path.as_str(), "my-app");
}
