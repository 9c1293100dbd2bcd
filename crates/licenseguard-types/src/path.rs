use crate::ids::NESTED_SEPARATOR;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Canonical path of an artifact inside the scan tree.
///
/// Normalization rules are intentionally simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - entries inside a container are appended after `!/` (`lib/a.war!/WEB-INF/lib/b.jar`)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanPath(String);

impl Default for ScanPath {
    fn default() -> Self {
        ScanPath::new(".")
    }
}

impl ScanPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    /// Path of `root`-relative `path`, falling back to `path` itself when it is outside `root`.
    pub fn relative_to(root: &Utf8Path, path: &Utf8Path) -> Self {
        ScanPath::new(path.strip_prefix(root).unwrap_or(path).as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    /// Path of an entry stored inside the container at `self`.
    pub fn nested(&self, entry: &str) -> ScanPath {
        let entry = entry.trim_start_matches('/');
        ScanPath(format!("{}{}{}", self.0, NESTED_SEPARATOR, entry.replace('\\', "/")))
    }

    /// Last segment of the path, looking through container separators.
    pub fn file_name(&self) -> &str {
        let innermost = self
            .0
            .rsplit(NESTED_SEPARATOR)
            .next()
            .unwrap_or(self.0.as_str());
        innermost
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(innermost)
    }

    /// How many containers enclose this path.
    pub fn nesting_depth(&self) -> usize {
        self.0.matches(NESTED_SEPARATOR).count()
    }
}

impl std::fmt::Display for ScanPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for ScanPath {
    fn from(value: &Utf8Path) -> Self {
        ScanPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for ScanPath {
    fn from(value: Utf8PathBuf) -> Self {
        ScanPath::new(value.as_str())
    }
}
