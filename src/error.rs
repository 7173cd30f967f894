use crate::options::ParseError;
use std::path::PathBuf;

/// Errors that occurred while preparing a report.
///
/// Formatting itself never fails. These errors surface from configuration, and internally from
/// report sections that are then left out.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The source file of an error could not be read. The code excerpt is left out of the report
    /// because of this.
    #[error("reading source file {} failed with {source}", .path.display())]
    ReadSource {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Request parameters failed to serialize to JSON. A placeholder is rendered instead.
    ///
    /// Note: This is an error in this crate. If you spot this, please open an issue.
    #[error("serializing request parameters failed with {0}")]
    SerializeParameters(serde_json::Error),

    /// Formatter options could not be parsed.
    #[error("invalid formatter options: {0}")]
    Options(#[from] ParseError),

    /// The options environment variable is set but not valid unicode.
    #[error("reading formatter options from environment failed with {0}")]
    Env(std::env::VarError),
}
