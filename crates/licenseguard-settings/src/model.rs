use serde::{Deserialize, Serialize};

/// `licenseguard.toml` schema v1.
///
/// Every field is optional; unset fields come from the profile preset. Unknown keys are ignored
/// so newer files still load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseguardConfigV1 {
    /// Optional schema string for tooling (`licenseguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict`, `default` or `report`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Digest algorithm name such as `SHA-256`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_algorithm: Option<String>,

    /// License knowledge base XML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notices: Option<String>,

    /// Override list CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_archives: Option<String>,

    /// How deep containers nested in containers are opened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nesting_depth: Option<u32>,

    /// `not_accepted`, `conflicting`, `unknown` or `never`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Archive types to scan for (`java`, `javascript`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finders: Option<Vec<String>>,
}
