use camino::Utf8PathBuf;

/// Fatal finder errors. Problems with a single container or manifest are logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("scan location {path} is not readable: {source}")]
    ScanLocation {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
