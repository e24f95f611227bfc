use std::path::PathBuf;

/// Errors that abort a report run.
///
/// Anything wrong with the result files or the coverage export is absorbed
/// into zero/empty defaults during aggregation and never shows up here.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The HTML template does not exist; nothing can be rendered without it.
    #[error(
        "template not found: {}\nplace the report template at this path or pass --template",
        path.display()
    )]
    MissingTemplate { path: PathBuf },

    /// Reading the template or writing an output file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON summary could not be serialized.
    #[error("JSON serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
