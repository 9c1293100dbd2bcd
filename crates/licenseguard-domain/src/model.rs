use crate::license::{License, Notice, Provider};
use licenseguard_digest::DigestValue;
use licenseguard_types::{
    ArchiveRecord, ArchiveType, DetectedLicenseRecord, DetectionStatus, LegalStatus, ScanPath, ids,
};
use std::sync::Arc;

/// A detected license together with the files it was detected from, in detection order.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedLicense {
    pub license: Arc<License>,
    pub paths: Vec<String>,
}

/// Outcome of an override lookup.
///
/// An empty `licenses` list is a deliberate "no license" decision, which is different from
/// "no override" (`None` at the lookup site).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LicenseResult {
    pub licenses: Vec<Arc<License>>,
    pub notice: Option<Arc<Notice>>,
    pub provider: Option<Arc<Provider>>,
}

impl LicenseResult {
    /// Build a result, dropping repeated licenses while keeping the first occurrence's position.
    pub fn new(licenses: impl IntoIterator<Item = Arc<License>>) -> Self {
        let mut out: Vec<Arc<License>> = Vec::new();
        for l in licenses {
            if !out.iter().any(|x| x.spdx_id == l.spdx_id) {
                out.push(l);
            }
        }
        Self {
            licenses: out,
            notice: None,
            provider: None,
        }
    }

    pub fn no_license() -> Self {
        Self::default()
    }

    pub fn is_no_license(&self) -> bool {
        self.licenses.is_empty()
    }
}

/// Final verdict for one archive.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub resulting_licenses: Vec<Arc<License>>,
    pub detection_status: DetectionStatus,
    pub legal_status: LegalStatus,
    pub provider: Option<Arc<Provider>>,
    pub notice: Option<Arc<Notice>>,
}

/// One discovered artifact.
#[derive(Clone, Debug)]
pub struct Archive {
    pub archive_type: ArchiveType,
    /// Simple name of the container file or package directory.
    pub file_name: String,
    /// Artifact name from metadata; the file name when none was found.
    pub name: String,
    pub version: Option<String>,
    pub path: ScanPath,
    pub digest: Option<DigestValue>,
    /// Candidate license files whose text matched no known license.
    pub unmatched_license_files: Vec<String>,
    pub vendor: Option<String>,
    pub provider: Option<Arc<Provider>>,
    pub notice: Option<Arc<Notice>>,
    pub documentation_url: Option<String>,
    detected: Vec<DetectedLicense>,
    evaluation: Option<Evaluation>,
}

impl Archive {
    pub fn new(archive_type: ArchiveType, path: ScanPath) -> Self {
        let file_name = path.file_name().to_string();
        Self {
            archive_type,
            name: file_name.clone(),
            file_name,
            version: None,
            path,
            digest: None,
            unmatched_license_files: Vec::new(),
            vendor: None,
            provider: None,
            notice: None,
            documentation_url: None,
            detected: Vec::new(),
            evaluation: None,
        }
    }

    /// Record `license` as detected from `source`. Repeated sources are kept once.
    pub fn add_license(&mut self, license: Arc<License>, source: impl Into<String>) {
        let source = source.into();
        match self
            .detected
            .iter_mut()
            .find(|d| d.license.spdx_id == license.spdx_id)
        {
            Some(entry) => {
                if !entry.paths.contains(&source) {
                    entry.paths.push(source);
                }
            }
            None => self.detected.push(DetectedLicense {
                license,
                paths: vec![source],
            }),
        }
    }

    pub fn add_unmatched_license_file(&mut self, source: impl Into<String>) {
        let source = source.into();
        if !self.unmatched_license_files.contains(&source) {
            self.unmatched_license_files.push(source);
        }
    }

    pub fn detected(&self) -> &[DetectedLicense] {
        &self.detected
    }

    /// Detected licenses (pre-override), in detection order.
    pub fn detected_licenses(&self) -> Vec<Arc<License>> {
        self.detected.iter().map(|d| d.license.clone()).collect()
    }

    pub fn detected_license_paths(&self, spdx_id: &str) -> &[String] {
        self.detected
            .iter()
            .find(|d| d.license.spdx_id == spdx_id)
            .map(|d| d.paths.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_detected_licenses(&self) -> bool {
        !self.detected.is_empty()
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    /// Store the evaluation. Returns `false` (and keeps the first one) if already evaluated.
    pub fn record_evaluation(&mut self, evaluation: Evaluation) -> bool {
        if self.evaluation.is_some() {
            return false;
        }
        self.evaluation = Some(evaluation);
        true
    }

    pub fn detection_status(&self) -> Option<DetectionStatus> {
        self.evaluation.as_ref().map(|e| e.detection_status)
    }

    pub fn legal_status(&self) -> Option<LegalStatus> {
        self.evaluation.as_ref().map(|e| e.legal_status)
    }

    pub fn resulting_licenses(&self) -> &[Arc<License>] {
        self.evaluation
            .as_ref()
            .map(|e| e.resulting_licenses.as_slice())
            .unwrap_or(&[])
    }

    /// Override decisions win over metadata found during the scan.
    pub fn effective_provider(&self) -> Option<&Arc<Provider>> {
        self.evaluation
            .as_ref()
            .and_then(|e| e.provider.as_ref())
            .or(self.provider.as_ref())
    }

    pub fn effective_notice(&self) -> Option<&Arc<Notice>> {
        self.evaluation
            .as_ref()
            .and_then(|e| e.notice.as_ref())
            .or(self.notice.as_ref())
    }

    /// Single display name for the resulting licenses.
    ///
    /// `None` when there is no resulting license, the `"not unique"` placeholder when there is
    /// more than one.
    pub fn license_display_name(&self) -> Option<String> {
        match self.resulting_licenses() {
            [] => None,
            [only] => Some(only.name.clone()),
            _ => Some(ids::NOT_UNIQUE.to_string()),
        }
    }

    /// Report form. Unevaluated archives are reported as undetected and unknown.
    pub fn to_record(&self) -> ArchiveRecord {
        ArchiveRecord {
            archive_type: self.archive_type,
            file_name: self.file_name.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            path: self.path.clone(),
            digest: self.digest.as_ref().map(DigestValue::to_hex),
            detected_licenses: self
                .detected
                .iter()
                .map(|d| DetectedLicenseRecord {
                    spdx_id: d.license.spdx_id.clone(),
                    paths: d.paths.clone(),
                })
                .collect(),
            unmatched_license_files: self.unmatched_license_files.clone(),
            resulting_licenses: self
                .resulting_licenses()
                .iter()
                .map(|l| l.spdx_id.clone())
                .collect(),
            license_name: self.license_display_name(),
            detection_status: self
                .detection_status()
                .unwrap_or(DetectionStatus::NotDetected),
            legal_status: self.legal_status().unwrap_or(LegalStatus::Unknown),
            vendor: self.vendor.clone(),
            provider: self.effective_provider().map(|p| p.name.clone()),
            notice: self.effective_notice().map(|n| n.id.clone()),
            documentation_url: self.documentation_url.clone(),
        }
    }
}
