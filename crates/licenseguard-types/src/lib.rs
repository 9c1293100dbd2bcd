//! Stable DTOs and IDs used across the licenseguard workspace.
//!
//! This crate is intentionally boring:
//! - status enums shared by the engine and the report
//! - canonical scan-tree path handling
//! - data types for the emitted scan report
//! - stable string IDs

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod report;
pub mod status;

pub use path::ScanPath;
pub use report::{
    ArchiveRecord, DetectedLicenseRecord, LegalCounts, SCHEMA_REPORT_V1, ScanReport, ToolMeta,
    Verdict,
};
pub use status::{ArchiveType, DetectionStatus, LegalStatus, ParseStatusError};
