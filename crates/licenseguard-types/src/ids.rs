//! Stable identifiers shared by the override list, the report, and log messages.

// Archive types (override CSV, report, config `finders`)
pub const ARCHIVE_TYPE_JAVA: &str = "java";
pub const ARCHIVE_TYPE_JAVASCRIPT: &str = "javascript";

// Override list match modes
pub const MODE_VERSION: &str = "version";
pub const MODE_DIGEST: &str = "digest";
pub const MODE_NAME_PATTERN: &str = "name-pattern";
pub const MODE_PATH_PATTERN: &str = "path-pattern";

/// Override list license column value meaning "explicitly no license".
pub const NO_LICENSE_SENTINEL: &str = "-";

/// Display name used when more than one resulting license exists.
pub const NOT_UNIQUE: &str = "not unique";

/// Separator between a container path and an entry path inside it.
pub const NESTED_SEPARATOR: &str = "!/";

// Tool-level
pub const TOOL_NAME: &str = "licenseguard";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
