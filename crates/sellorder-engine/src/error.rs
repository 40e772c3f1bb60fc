use thiserror::Error;

/// Fatal problems reading the sales export. Bad individual rows are skipped,
/// not reported here.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read sales export {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read sales export header row: {0}")]
    Header(#[from] csv::Error),

    #[error("sales export is missing required column \"{0}\"")]
    MissingColumn(&'static str),
}
