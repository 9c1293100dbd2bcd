use licenseguard_types::LegalStatus;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Knowledge-base entry. Identity, equality and ordering are by SPDX identifier.
#[derive(Clone, Debug)]
pub struct License {
    pub spdx_id: String,
    pub name: String,
    pub legal_status: LegalStatus,
    pub author: Option<String>,
    pub version: Option<String>,
    pub url: Option<String>,
    /// Canonical license text.
    pub text: String,
    /// Id of a notice in the notices list.
    pub notice: Option<String>,
    /// Alternative names and URLs used by metadata-based detection.
    pub aliases: Vec<String>,
}

impl License {
    /// Minimal entry with no text or metadata.
    pub fn new(spdx_id: impl Into<String>, name: impl Into<String>, status: LegalStatus) -> Self {
        Self {
            spdx_id: spdx_id.into(),
            name: name.into(),
            legal_status: status,
            author: None,
            version: None,
            url: None,
            text: String::new(),
            notice: None,
            aliases: Vec::new(),
        }
    }
}

impl PartialEq for License {
    fn eq(&self, other: &Self) -> bool {
        self.spdx_id == other.spdx_id
    }
}

impl Eq for License {}

impl Hash for License {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.spdx_id.hash(state);
    }
}

impl Ord for License {
    fn cmp(&self, other: &Self) -> Ordering {
        self.spdx_id.cmp(&other.spdx_id)
    }
}

impl PartialOrd for License {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: String,
    pub text: String,
}

pub type Providers = BTreeMap<String, Arc<Provider>>;
pub type Notices = BTreeMap<String, Arc<Notice>>;
