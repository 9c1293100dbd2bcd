use crate::identifier::IdentifierError;

/// Fatal errors while loading the knowledge base, providers, notices, or the override list.
///
/// Problems confined to one entry or row are logged and skipped instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("read override list: {0}")]
    Csv(#[source] csv::Error),

    #[error("override list line {line}: {source}")]
    Pattern {
        line: u64,
        #[source]
        source: IdentifierError,
    },
}
