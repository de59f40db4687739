use thiserror::Error;

/// Errors raised while acquiring or decoding a row source.
///
/// These are setup-time failures: the CLI exits non-zero on any of them
/// before a single write occurs. Per-row and per-batch problems are never
/// expressed as `ImportError`; they are defaulted or counted instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read source file {path}")]
    SourceIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("source '{source_name}' contained no data rows")]
    EmptySource { source_name: String },
    #[error("failed to write artifact {path}")]
    ArtifactIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
