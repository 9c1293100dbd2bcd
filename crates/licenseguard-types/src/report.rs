use crate::{ArchiveType, DetectionStatus, LegalStatus, ScanPath};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for licenseguard reports.
pub const SCHEMA_REPORT_V1: &str = "licenseguard.report.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Number of archives per legal status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalCounts {
    pub accepted: u32,
    pub not_accepted: u32,
    pub conflicting: u32,
    pub unknown: u32,
}

impl LegalCounts {
    pub fn add(&mut self, status: LegalStatus) {
        match status {
            LegalStatus::Accepted => self.accepted += 1,
            LegalStatus::NotAccepted => self.not_accepted += 1,
            LegalStatus::Conflicting => self.conflicting += 1,
            LegalStatus::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.accepted + self.not_accepted + self.conflicting + self.unknown
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedLicenseRecord {
    pub spdx_id: String,
    /// Files (inside the archive) the license was detected from.
    pub paths: Vec<String>,
}

/// One evaluated archive as it appears in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub archive_type: ArchiveType,
    pub file_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub path: ScanPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    pub detected_licenses: Vec<DetectedLicenseRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched_license_files: Vec<String>,
    pub resulting_licenses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_name: Option<String>,
    pub detection_status: DetectionStatus,
    pub legal_status: LegalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Versioned schema identifier for the report shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    /// Scan root, or the explicit file list joined with `, `.
    pub scan_location: String,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    pub counts: LegalCounts,
    pub archives: Vec<ArchiveRecord>,
}
