//! Status enums shared by the engine, the override list, and the report.

use crate::ids;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseStatusError {}

/// Kind of artifact a finder produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveType {
    /// Packaged library (JAR, WAR, EAR).
    Java,
    /// Script package (npm `package.json`).
    JavaScript,
}

impl ArchiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveType::Java => ids::ARCHIVE_TYPE_JAVA,
            ArchiveType::JavaScript => ids::ARCHIVE_TYPE_JAVASCRIPT,
        }
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveType {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "java" | "jar" => Ok(ArchiveType::Java),
            "javascript" | "npm" | "js" => Ok(ArchiveType::JavaScript),
            _ => Err(ParseStatusError {
                kind: "archive type",
                value: s.to_string(),
            }),
        }
    }
}

/// How the resulting licenses of an archive were determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionStatus {
    NotDetected,
    Detected,
    MultipleDetected,
    ManualDetected,
    ManualSelected,
}

impl DetectionStatus {
    pub fn is_manual(self) -> bool {
        matches!(
            self,
            DetectionStatus::ManualDetected | DetectionStatus::ManualSelected
        )
    }
}

/// Compliance classification of a license, and (derived) of an archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalStatus {
    Accepted,
    NotAccepted,
    Conflicting,
    Unknown,
}

impl LegalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LegalStatus::Accepted => "ACCEPTED",
            LegalStatus::NotAccepted => "NOT_ACCEPTED",
            LegalStatus::Conflicting => "CONFLICTING",
            LegalStatus::Unknown => "UNKNOWN",
        }
    }

    /// Rank used for fail thresholds: higher is worse.
    pub fn severity_rank(self) -> u8 {
        match self {
            LegalStatus::Accepted => 0,
            LegalStatus::Unknown => 1,
            LegalStatus::Conflicting => 2,
            LegalStatus::NotAccepted => 3,
        }
    }
}

impl FromStr for LegalStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "ACCEPTED" => Ok(LegalStatus::Accepted),
            "NOT_ACCEPTED" => Ok(LegalStatus::NotAccepted),
            "CONFLICTING" => Ok(LegalStatus::Conflicting),
            "UNKNOWN" => Ok(LegalStatus::Unknown),
            _ => Err(ParseStatusError {
                kind: "legal status",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_type_parses_aliases() {
        assert_eq!("JAVA".parse::<ArchiveType>(), Ok(ArchiveType::Java));
        assert_eq!("npm".parse::<ArchiveType>(), Ok(ArchiveType::JavaScript));
        assert!("cobol".parse::<ArchiveType>().is_err());
    }

    #[test]
    fn legal_status_parses_spellings() {
        assert_eq!("accepted".parse::<LegalStatus>(), Ok(LegalStatus::Accepted));
        assert_eq!(
            "not-accepted".parse::<LegalStatus>(),
            Ok(LegalStatus::NotAccepted)
        );
        assert_eq!(
            "NOT_ACCEPTED".parse::<LegalStatus>(),
            Ok(LegalStatus::NotAccepted)
        );
        assert!("maybe".parse::<LegalStatus>().is_err());
    }

    #[test]
    fn statuses_serialize_in_screaming_snake_case() {
        let json = serde_json::to_string(&DetectionStatus::MultipleDetected).expect("serialize");
        assert_eq!(json, "\"MULTIPLE_DETECTED\"");
        let json = serde_json::to_string(&LegalStatus::NotAccepted).expect("serialize");
        assert_eq!(json, "\"NOT_ACCEPTED\"");
    }
}
