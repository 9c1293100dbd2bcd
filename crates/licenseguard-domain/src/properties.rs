//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Identifier equality and hashing
//! - Evaluation idempotence and status derivation
//! - Override precedence

use crate::checked::{CheckedArchives, CheckedArchivesContext};
use crate::engine::{evaluate, evaluate_archive, legal_status_of};
use crate::identifier::{ArchiveIdentifier, PatternTarget};
use crate::knowledge::KnowledgeBase;
use crate::license::{License, Notices, Providers};
use crate::matching::{extract_version, normalize_text};
use crate::test_support::{archive, license};
use licenseguard_digest::DigestAlgorithm;
use licenseguard_types::{ArchiveType, DetectionStatus, LegalStatus};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// ============================================================================
// Strategies
// ============================================================================

const LICENSE_IDS: &[&str] = &["MIT", "Apache-2.0", "GPL-3.0-only", "LGPL-2.1", "EPL-2.0"];

fn arb_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,15}").expect("valid regex")
}

fn arb_version() -> impl Strategy<Value = String> {
    (0u32..20, 0u32..20, 0u32..20).prop_map(|(a, b, c)| format!("{a}.{b}.{c}"))
}

fn arb_archive_type() -> impl Strategy<Value = ArchiveType> {
    prop_oneof![Just(ArchiveType::Java), Just(ArchiveType::JavaScript)]
}

fn arb_legal_status() -> impl Strategy<Value = LegalStatus> {
    prop_oneof![
        Just(LegalStatus::Accepted),
        Just(LegalStatus::NotAccepted),
        Just(LegalStatus::Conflicting),
        Just(LegalStatus::Unknown),
    ]
}

/// Subset of the known license ids, in a random order.
fn arb_license_ids() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(LICENSE_IDS, 0..=LICENSE_IDS.len()).prop_shuffle()
}

fn knowledge() -> KnowledgeBase {
    KnowledgeBase::new(vec![
        License::new("MIT", "MIT License", LegalStatus::Accepted),
        License::new("Apache-2.0", "Apache License 2.0", LegalStatus::Accepted),
        License::new("GPL-3.0-only", "GPL v3", LegalStatus::NotAccepted),
        License::new("LGPL-2.1", "LGPL v2.1", LegalStatus::Conflicting),
        License::new("EPL-2.0", "EPL 2.0", LegalStatus::Unknown),
    ])
}

fn load(kb: &KnowledgeBase, csv: &str) -> CheckedArchives {
    let providers = Providers::new();
    let notices = Notices::new();
    let ctx = CheckedArchivesContext {
        knowledge: kb,
        providers: &providers,
        notices: &notices,
        digest_algorithm: DigestAlgorithm::Sha256,
    };
    CheckedArchives::load(csv.as_bytes(), &ctx).expect("load overrides")
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut h = DefaultHasher::new();
    value.hash(&mut h);
    h.finish()
}

// ============================================================================
// Identifier properties
// ============================================================================

proptest! {
    #[test]
    fn version_identifiers_equal_iff_fields_equal(
        t1 in arb_archive_type(),
        t2 in arb_archive_type(),
        n1 in arb_name(),
        n2 in arb_name(),
        v1 in arb_version(),
        v2 in arb_version()
    ) {
        let a = ArchiveIdentifier::version(t1, n1.clone(), v1.clone());
        let b = ArchiveIdentifier::version(t2, n2.clone(), v2.clone());
        prop_assert_eq!(a == b, t1 == t2 && n1 == n2 && v1 == v2);
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }

    #[test]
    fn version_and_pattern_identifiers_never_equal(
        t in arb_archive_type(),
        name in arb_name(),
        version in arb_version()
    ) {
        let v = ArchiveIdentifier::version(t, name.clone(), version);
        let p = ArchiveIdentifier::pattern(t, &regex::escape(&name), PatternTarget::Name)
            .expect("escaped pattern compiles");
        prop_assert_ne!(v, p);
    }

    #[test]
    fn escaped_name_pattern_matches_only_that_name(name in arb_name(), other in arb_name()) {
        let p = ArchiveIdentifier::pattern(ArchiveType::Java, &regex::escape(&name), PatternTarget::Name)
            .expect("escaped pattern compiles");
        prop_assert!(p.matches_name_or_path(ArchiveType::Java, &name, "x"));
        prop_assert_eq!(
            p.matches_name_or_path(ArchiveType::Java, &other, "x"),
            name == other
        );
    }
}

// ============================================================================
// Evaluation properties
// ============================================================================

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        detected in arb_license_ids(),
        manual in prop::option::of(arb_license_ids())
    ) {
        let kb = knowledge();
        let csv = match &manual {
            Some(ids) if ids.is_empty() => "java, version, a, 1.0, -\n".to_string(),
            Some(ids) => format!("java, version, a, 1.0, {}\n", ids.join("|")),
            None => String::new(),
        };
        let checked = load(&kb, &csv);

        let mut a = archive("lib/a-1.0.jar");
        a.name = "a".to_string();
        a.version = Some("1.0".to_string());
        for id in &detected {
            let l = kb.license_by_spdx_identifier(id).expect("known id");
            a.add_license(l, "LICENSE");
        }

        let first = evaluate_archive(&a, &checked);
        let second = evaluate_archive(&a, &checked);
        prop_assert_eq!(&first, &second);

        let mut archives = vec![a];
        evaluate(&mut archives, &checked);
        evaluate(&mut archives, &checked);
        prop_assert_eq!(archives[0].evaluation(), Some(&first));
    }

    #[test]
    fn detection_status_follows_override_and_detection(
        detected in arb_license_ids(),
        manual in prop::option::of(arb_license_ids())
    ) {
        let kb = knowledge();
        let csv = match &manual {
            Some(ids) if ids.is_empty() => "java, version, a, 1.0, -\n".to_string(),
            Some(ids) => format!("java, version, a, 1.0,\"{}\"\n", ids.join(",")),
            None => String::new(),
        };
        let checked = load(&kb, &csv);

        let mut a = archive("lib/a-1.0.jar");
        a.name = "a".to_string();
        a.version = Some("1.0".to_string());
        for id in &detected {
            a.add_license(kb.license_by_spdx_identifier(id).expect("known id"), "LICENSE");
        }
        let e = evaluate_archive(&a, &checked);

        let expected = match (&manual, detected.len()) {
            (None, 0) => DetectionStatus::NotDetected,
            (None, 1) => DetectionStatus::Detected,
            (None, _) => DetectionStatus::MultipleDetected,
            (Some(_), 0) => DetectionStatus::ManualDetected,
            (Some(_), _) => DetectionStatus::ManualSelected,
        };
        prop_assert_eq!(e.detection_status, expected);

        let resulting: Vec<&str> = e.resulting_licenses.iter().map(|l| l.spdx_id.as_str()).collect();
        match &manual {
            Some(ids) => prop_assert_eq!(resulting, ids.clone()),
            None => prop_assert_eq!(resulting, detected.clone()),
        }
        prop_assert_eq!(e.legal_status, legal_status_of(&e.resulting_licenses));
    }

    #[test]
    fn legal_status_accepted_iff_all_accepted(statuses in prop::collection::vec(arb_legal_status(), 0..6)) {
        let licenses: Vec<_> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| license(&format!("L{i}"), *s))
            .collect();
        let status = legal_status_of(&licenses);
        let all_accepted = !statuses.is_empty() && statuses.iter().all(|s| *s == LegalStatus::Accepted);
        prop_assert_eq!(status == LegalStatus::Accepted, all_accepted);
        if statuses.contains(&LegalStatus::NotAccepted) {
            prop_assert_eq!(status, LegalStatus::NotAccepted);
        }
    }

    #[test]
    fn digest_override_always_beats_version_override(
        version_ids in arb_license_ids(),
        digest_ids in arb_license_ids(),
        bytes in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        prop_assume!(!version_ids.is_empty() && !digest_ids.is_empty());
        let kb = knowledge();
        let digest = DigestAlgorithm::Sha256.digest_bytes(&bytes);
        let csv = format!(
            "java, version, a, 1.0, {}\njava, digest, a, {}, {}\n",
            version_ids.join("|"),
            digest.to_hex(),
            digest_ids.join("|"),
        );
        let checked = load(&kb, &csv);

        let mut a = archive("lib/a-1.0.jar");
        a.name = "a".to_string();
        a.version = Some("1.0".to_string());
        a.digest = Some(digest);
        let result = checked.lookup(&a).expect("override");
        let ids: Vec<&str> = result.licenses.iter().map(|l| l.spdx_id.as_str()).collect();
        prop_assert_eq!(ids, digest_ids);
    }
}

// ============================================================================
// Text matching properties
// ============================================================================

proptest! {
    #[test]
    fn normalize_text_is_idempotent(text in "[ a-zA-Z\t\n.,]{0,80}") {
        let once = normalize_text(&text);
        prop_assert_eq!(normalize_text(&once), once.clone());
        prop_assert!(!once.contains("  "));
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn extract_version_finds_version_word(major in 0u32..100, minor in prop::option::of(0u32..100)) {
        let v = match minor {
            Some(m) => format!("{major}.{m}"),
            None => major.to_string(),
        };
        prop_assert_eq!(extract_version(&format!("Version {v}, June 1991")), Some(v));
    }
}
