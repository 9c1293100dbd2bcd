use crate::checked::CheckedArchives;
use crate::license::License;
use crate::model::{Archive, Evaluation};
use licenseguard_types::{DetectionStatus, LegalCounts, LegalStatus};
use std::sync::Arc;
use tracing::debug;

/// Reconcile automatic detection with the override list. Pure; safe to call repeatedly.
pub fn evaluate_archive(archive: &Archive, checked: &CheckedArchives) -> Evaluation {
    let detected = archive.detected_licenses();

    let (resulting_licenses, detection_status, provider, notice) = match checked.lookup(archive) {
        None => {
            let status = match detected.len() {
                0 => DetectionStatus::NotDetected,
                1 => DetectionStatus::Detected,
                _ => DetectionStatus::MultipleDetected,
            };
            (detected, status, None, None)
        }
        Some(manual) => {
            // Overrides replace detection; they never merge with it.
            let status = if detected.is_empty() {
                DetectionStatus::ManualDetected
            } else {
                DetectionStatus::ManualSelected
            };
            (
                manual.licenses.clone(),
                status,
                manual.provider.clone(),
                manual.notice.clone(),
            )
        }
    };

    Evaluation {
        legal_status: legal_status_of(&resulting_licenses),
        resulting_licenses,
        detection_status,
        provider,
        notice,
    }
}

/// Evaluate every archive that has no evaluation yet. Evaluated archives are left untouched.
pub fn evaluate(archives: &mut [Archive], checked: &CheckedArchives) {
    for archive in archives.iter_mut() {
        if archive.evaluation().is_some() {
            continue;
        }
        let evaluation = evaluate_archive(archive, checked);
        debug!(
            archive = %archive.path,
            detection = ?evaluation.detection_status,
            legal = ?evaluation.legal_status,
            "archive evaluated"
        );
        archive.record_evaluation(evaluation);
    }
}

/// Aggregate status of a license set.
pub fn legal_status_of(licenses: &[Arc<License>]) -> LegalStatus {
    if licenses.is_empty() {
        return LegalStatus::Unknown;
    }
    if licenses
        .iter()
        .all(|l| l.legal_status == LegalStatus::Accepted)
    {
        return LegalStatus::Accepted;
    }
    if licenses
        .iter()
        .any(|l| l.legal_status == LegalStatus::NotAccepted)
    {
        return LegalStatus::NotAccepted;
    }
    LegalStatus::Conflicting
}

/// Archives per legal status. Unevaluated archives count as unknown.
pub fn summarize(archives: &[Archive]) -> LegalCounts {
    let mut counts = LegalCounts::default();
    for archive in archives {
        counts.add(archive.legal_status().unwrap_or(LegalStatus::Unknown));
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checked::CheckedArchivesContext;
    use crate::knowledge::KnowledgeBase;
    use crate::license::{Notices, Providers};
    use crate::test_support::{archive, license};
    use licenseguard_digest::{DigestAlgorithm, DigestValue};

    fn knowledge() -> KnowledgeBase {
        KnowledgeBase::new(vec![
            License::new("MIT", "MIT License", LegalStatus::Accepted),
            License::new("Apache-2.0", "Apache License 2.0", LegalStatus::Accepted),
            License::new("GPL-3.0-only", "GPL v3", LegalStatus::NotAccepted),
        ])
    }

    fn checked(csv: &str) -> CheckedArchives {
        let kb = knowledge();
        let providers = Providers::new();
        let notices = Notices::new();
        let ctx = CheckedArchivesContext {
            knowledge: &kb,
            providers: &providers,
            notices: &notices,
            digest_algorithm: DigestAlgorithm::Sha1,
        };
        CheckedArchives::load(csv.as_bytes(), &ctx).expect("load overrides")
    }

    fn jar(name: &str, version: &str) -> Archive {
        let mut a = archive(&format!("lib/{name}-{version}.jar"));
        a.name = name.to_string();
        a.version = Some(version.to_string());
        a
    }

    fn ids(e: &Evaluation) -> Vec<&str> {
        e.resulting_licenses
            .iter()
            .map(|l| l.spdx_id.as_str())
            .collect()
    }

    #[test]
    fn nothing_detected_and_no_override() {
        let e = evaluate_archive(&jar("a", "1.0"), &CheckedArchives::empty());
        assert_eq!(e.detection_status, DetectionStatus::NotDetected);
        assert_eq!(e.legal_status, LegalStatus::Unknown);
        assert!(e.resulting_licenses.is_empty());
    }

    #[test]
    fn one_accepted_license_detected() {
        let mut a = jar("a", "1.0");
        a.add_license(license("MIT", LegalStatus::Accepted), "META-INF/LICENSE");
        let e = evaluate_archive(&a, &CheckedArchives::empty());
        assert_eq!(e.detection_status, DetectionStatus::Detected);
        assert_eq!(e.legal_status, LegalStatus::Accepted);
        assert_eq!(ids(&e), vec!["MIT"]);
    }

    #[test]
    fn two_detected_one_not_accepted() {
        let mut a = jar("a", "1.0");
        a.add_license(license("MIT", LegalStatus::Accepted), "LICENSE");
        a.add_license(license("GPL-3.0-only", LegalStatus::NotAccepted), "COPYING");
        let e = evaluate_archive(&a, &CheckedArchives::empty());
        assert_eq!(e.detection_status, DetectionStatus::MultipleDetected);
        assert_eq!(e.legal_status, LegalStatus::NotAccepted);
    }

    #[test]
    fn override_without_detection_is_manual_detected() {
        let c = checked("java, version, a, 1.0, Apache-2.0\n");
        let e = evaluate_archive(&jar("a", "1.0"), &c);
        assert_eq!(e.detection_status, DetectionStatus::ManualDetected);
        assert_eq!(e.legal_status, LegalStatus::Accepted);
        assert_eq!(ids(&e), vec!["Apache-2.0"]);
    }

    #[test]
    fn override_replaces_detection() {
        let c = checked("java, version, a, 1.0, Apache-2.0\n");
        let mut a = jar("a", "1.0");
        a.add_license(license("GPL-3.0-only", LegalStatus::NotAccepted), "COPYING");
        let e = evaluate_archive(&a, &c);
        assert_eq!(e.detection_status, DetectionStatus::ManualSelected);
        assert_eq!(e.legal_status, LegalStatus::Accepted);
        assert_eq!(ids(&e), vec!["Apache-2.0"]);
        // Detection itself is preserved for reporting.
        assert_eq!(a.detected_licenses().len(), 1);
    }

    #[test]
    fn explicit_no_license_override() {
        let c = checked("java, version, a, 1.0, -\n");
        let mut a = jar("a", "1.0");
        a.add_license(license("MIT", LegalStatus::Accepted), "LICENSE");
        let e = evaluate_archive(&a, &c);
        assert_eq!(e.detection_status, DetectionStatus::ManualSelected);
        assert_eq!(e.legal_status, LegalStatus::Unknown);
        assert!(e.resulting_licenses.is_empty());
    }

    #[test]
    fn name_pattern_no_license_replaces_detection() {
        let c = checked("java, name-pattern, ignored, internal-.*\\.jar, -\n");
        let mut a = jar("internal-utils", "3.1");
        a.add_license(license("Apache-2.0", LegalStatus::Accepted), "META-INF/LICENSE");
        let e = evaluate_archive(&a, &c);
        assert_eq!(e.detection_status, DetectionStatus::ManualSelected);
        assert_eq!(e.legal_status, LegalStatus::Unknown);
        assert!(e.resulting_licenses.is_empty());
    }

    #[test]
    fn name_pattern_no_license_without_detection() {
        let c = checked("java, name-pattern, ignored, internal-.*\\.jar, -\n");
        let e = evaluate_archive(&jar("internal-utils", "3.1"), &c);
        assert_eq!(e.detection_status, DetectionStatus::ManualDetected);
        assert_eq!(e.legal_status, LegalStatus::Unknown);
        assert!(e.resulting_licenses.is_empty());

        let other = evaluate_archive(&jar("utils", "3.1"), &c);
        assert_eq!(other.detection_status, DetectionStatus::NotDetected);
    }

    #[test]
    fn digest_override_wins_over_version_override() {
        let digest = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
        let c = checked(&format!(
            "java, version, a, 1.0, MIT\njava, digest, a, {digest}, GPL-3.0-only\n"
        ));
        let mut a = jar("a", "1.0");
        a.digest = Some(DigestValue::from_hex(digest).expect("hex"));
        let e = evaluate_archive(&a, &c);
        assert_eq!(ids(&e), vec!["GPL-3.0-only"]);
        assert_eq!(e.legal_status, LegalStatus::NotAccepted);
    }

    #[test]
    fn legal_status_aggregation() {
        let ok = license("MIT", LegalStatus::Accepted);
        let bad = license("GPL-3.0-only", LegalStatus::NotAccepted);
        let unknown = license("X", LegalStatus::Unknown);
        let conflicting = license("Y", LegalStatus::Conflicting);

        assert_eq!(legal_status_of(&[]), LegalStatus::Unknown);
        assert_eq!(legal_status_of(&[ok.clone()]), LegalStatus::Accepted);
        assert_eq!(
            legal_status_of(&[ok.clone(), bad.clone()]),
            LegalStatus::NotAccepted
        );
        assert_eq!(
            legal_status_of(&[ok.clone(), unknown.clone()]),
            LegalStatus::Conflicting
        );
        assert_eq!(legal_status_of(&[unknown]), LegalStatus::Conflicting);
        assert_eq!(legal_status_of(&[conflicting, bad]), LegalStatus::NotAccepted);
    }

    #[test]
    fn evaluate_records_once_and_summarizes() {
        let c = checked("java, version, b, 1.0, GPL-3.0-only\n");
        let mut a = jar("a", "1.0");
        a.add_license(license("MIT", LegalStatus::Accepted), "LICENSE");
        let mut archives = vec![a, jar("b", "1.0"), jar("c", "1.0")];

        evaluate(&mut archives, &c);
        let first: Vec<_> = archives.iter().map(|a| a.evaluation().cloned()).collect();
        evaluate(&mut archives, &CheckedArchives::empty());
        let second: Vec<_> = archives.iter().map(|a| a.evaluation().cloned()).collect();
        assert_eq!(first, second);

        let counts = summarize(&archives);
        assert_eq!(counts.accepted, 1);
        assert_eq!(counts.not_accepted, 1);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total(), 3);
    }
}
